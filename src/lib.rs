//! Snake for tiny RGB LED grids.
//!
//! A fixed-rate tick loop advances an immutable [`game::GameState`] and paints
//! it onto an abstract [`surface::Surface`], while a second thread turns key
//! presses into direction requests.

pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod runtime;
pub mod snake;
pub mod surface;
pub mod terminal_runtime;

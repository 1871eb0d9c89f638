use std::io;

use thiserror::Error;

use crate::config::{COLOR_BACKGROUND, GridSize};
use crate::snake::Position;

/// Linear RGB color, each channel nominally in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Quantizes the channels to 8 bits, clamping out-of-range values.
    #[must_use]
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        (quantize(self.r), quantize(self.g), quantize(self.b))
    }
}

fn quantize(channel: f32) -> u8 {
    // Truncation after the clamp keeps 1.0 at 255.
    (channel.clamp(0.0, 1.0) * 255.0) as u8
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("failed to present frame: {0}")]
    Io(#[from] io::Error),
}

/// Pixel grid that the renderer paints onto.
///
/// Width and height are fixed for the lifetime of the surface. Writes become
/// visible only after [`Surface::flush`].
pub trait Surface {
    fn width(&self) -> u16;

    fn height(&self) -> u16;

    /// Paints one cell. `position` must lie inside the grid.
    fn set_color(&mut self, position: Position, color: Rgb);

    /// Presents all writes since the previous flush.
    fn flush(&mut self) -> Result<(), SurfaceError>;

    fn grid(&self) -> GridSize {
        GridSize {
            width: self.width(),
            height: self.height(),
        }
    }

    fn contains(&self, position: Position) -> bool {
        position.is_within_bounds(self.grid())
    }

    fn fill(&mut self, color: Rgb) {
        for y in 0..i32::from(self.height()) {
            for x in 0..i32::from(self.width()) {
                self.set_color(Position { x, y }, color);
            }
        }
    }
}

/// In-memory surface, stored column by column.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    grid: GridSize,
    cells: Vec<Rgb>,
    flushes: usize,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(grid: GridSize) -> Self {
        Self {
            grid,
            cells: vec![COLOR_BACKGROUND; grid.total_cells()],
            flushes: 0,
        }
    }

    /// Returns the color at `position`, or `None` outside the grid.
    #[must_use]
    pub fn color_at(&self, position: Position) -> Option<Rgb> {
        self.index(position).map(|index| self.cells[index])
    }

    /// Returns every cell currently painted with `color`, in row-major order.
    #[must_use]
    pub fn positions_with(&self, color: Rgb) -> Vec<Position> {
        let mut positions = Vec::new();
        for y in 0..i32::from(self.grid.height) {
            for x in 0..i32::from(self.grid.width) {
                let position = Position { x, y };
                if self.color_at(position) == Some(color) {
                    positions.push(position);
                }
            }
        }
        positions
    }

    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    fn index(&self, position: Position) -> Option<usize> {
        if !position.is_within_bounds(self.grid) {
            return None;
        }

        let x = usize::try_from(position.x).ok()?;
        let y = usize::try_from(position.y).ok()?;
        Some(x * usize::from(self.grid.height) + y)
    }
}

impl Surface for FrameBuffer {
    fn width(&self) -> u16 {
        self.grid.width
    }

    fn height(&self) -> u16 {
        self.grid.height
    }

    fn set_color(&mut self, position: Position, color: Rgb) {
        debug_assert!(
            self.contains(position),
            "set_color outside the {}x{} grid: {position:?}",
            self.grid.width,
            self.grid.height,
        );

        if let Some(index) = self.index(position) {
            self.cells[index] = color;
        }
    }

    fn flush(&mut self) -> Result<(), SurfaceError> {
        self.flushes += 1;
        Ok(())
    }
}

use std::panic;
use std::path::PathBuf;
use std::process::{self, ExitCode};
use std::time::Duration;

use clap::Parser;
use rgb_snake::config::{ConfigError, Frontend, GameConfig, GridSize, TICK_DURATION};
use rgb_snake::input::CrosstermInput;
use rgb_snake::logging::{default_log_path, init_logging};
use rgb_snake::runtime::{RuntimeError, Scheduler, Shutdown};
use rgb_snake::terminal_runtime::{TerminalSurface, restore_terminal, show_exit_prompt};

#[derive(Debug, Parser)]
#[command(version, about = "Snake on a tiny RGB grid")]
struct Cli {
    /// Output preset to play on.
    #[arg(long, value_enum, default_value_t = Frontend::Small)]
    frontend: Frontend,

    /// Override the preset grid width.
    #[arg(long)]
    width: Option<u16>,

    /// Override the preset grid height.
    #[arg(long)]
    height: Option<u16>,

    /// Milliseconds between two game ticks.
    #[arg(long = "tick-ms", default_value_t = TICK_DURATION.as_millis() as u64)]
    tick_ms: u64,

    /// Seed food placement for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig, ConfigError> {
        let preset = self.frontend.grid();
        let grid = GridSize {
            width: self.width.unwrap_or(preset.width),
            height: self.height.unwrap_or(preset.height),
        };

        GameConfig::new(grid, Duration::from_millis(self.tick_ms), self.seed)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    println!("Starting RGB Snake...");
    println!();

    let config = match cli.game_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Invalid settings: {error}");
            return ExitCode::FAILURE;
        }
    };

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    let _log_guard = match init_logging(&log_path) {
        Ok(guard) => Some(guard),
        Err(error) => {
            eprintln!("Logging disabled: {error}");
            None
        }
    };

    println!("Frontend: {}", cli.frontend.name());
    println!("Press the Escape (Esc) key to exit");

    install_panic_hook();

    let result = run(&config);

    println!();
    println!("Exiting...");

    match result {
        Ok(Shutdown::Clean) => ExitCode::SUCCESS,
        // The input thread is parked in a read that cannot be cancelled.
        Ok(Shutdown::InputStuck) => process::exit(1),
        Err(error) => {
            eprintln!("Game crashed :(");
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &GameConfig) -> Result<Shutdown, RuntimeError> {
    let mut surface = TerminalSurface::enter(config.grid)?;
    tracing::info!(?config, "terminal ready");

    Scheduler::from_config(config)
        .with_input_wait_hint(|| {
            if let Err(error) = show_exit_prompt() {
                tracing::warn!(%error, "failed to show exit prompt");
            }
        })
        .run(&mut surface, CrosstermInput)
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));
}

mod cli;
mod terminal;

use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use slider_game::controller::GridController;
use slider_game::{Game, GameConfig, GridLayout};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    let config = cli.apply(base);

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    if cli.print_scramble {
        print_scramble(&config);
        return Ok(());
    }

    info!(?config, "starting slider game");
    let mut game = Game::new(&config, GridLayout::default());
    terminal::run(&mut game)
}

fn print_scramble(config: &GameConfig) {
    let layout = GridLayout::default();
    let mut controller = match config.seed {
        Some(seed) => GridController::with_seed(config.grid_size, layout, seed),
        None => GridController::new(config.grid_size, layout),
    };

    println!("Initial Puzzle:\n{}", controller.grid());

    let report = controller.scramble(config.scramble_multiplier);
    println!("Scrambled Puzzle ({} moves):\n{}", report.moves, controller.grid());
}

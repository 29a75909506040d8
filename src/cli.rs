//! Command-line flags for the terminal game.

use std::path::PathBuf;

use clap::Parser;
use slider_game::{GameConfig, GameType};

/// Slide the tiles back into place, freely or against the clock.
#[derive(Parser, Debug)]
#[command(name = "slider-game", version, about, long_about = None)]
pub struct Cli {
    /// TOML file with default settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Tiles per side (2-10)
    #[arg(short, long)]
    pub size: Option<usize>,

    /// Game type to preselect in the menu
    #[arg(short = 't', long, value_enum)]
    pub game_type: Option<GameType>,

    /// Seconds a challenge starts from (10-600)
    #[arg(long)]
    pub max_time: Option<f32>,

    /// Random moves per cell when scrambling
    #[arg(long)]
    pub scramble_multiplier: Option<usize>,

    /// Seed for reproducible scrambles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Show tile numbers
    #[arg(long)]
    pub numbers: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    pub log_filter: Option<String>,

    /// Print a solved and a scrambled grid, then exit
    #[arg(long)]
    pub print_scramble: bool,
}

impl Cli {
    /// Layers the flags that were given over `config`.
    pub fn apply(&self, mut config: GameConfig) -> GameConfig {
        if let Some(size) = self.size {
            config.grid_size = size;
        }
        if let Some(game_type) = self.game_type {
            config.game_type = game_type;
        }
        if let Some(max_time) = self.max_time {
            config.max_challenge_time = max_time;
        }
        if let Some(multiplier) = self.scramble_multiplier {
            config.scramble_multiplier = multiplier;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.numbers {
            config.show_tile_numbers = true;
        }
        if let Some(filter) = &self.log_filter {
            config.log_filter = filter.clone();
        }
        config.normalized()
    }
}

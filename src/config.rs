use std::path::Path;

use serde::Deserialize;

use crate::catalog::PUZZLES;
use crate::controller::{DEFAULT_GRID_SIZE, MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::error::ConfigError;
use crate::game::GameType;
use crate::timer::{CHALLENGE_TIME_STEP, DEFAULT_CHALLENGE_TIME, MAX_CHALLENGE_TIME, MIN_CHALLENGE_TIME};

pub const DEFAULT_SCRAMBLE_MULTIPLIER: usize = 20;

/// Session settings. Every field is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub grid_size: usize,
    pub game_type: GameType,
    /// Seconds a challenge starts from.
    pub max_challenge_time: f32,
    pub scramble_multiplier: usize,
    /// Fixes the scramble sequence when set.
    pub seed: Option<u64>,
    pub puzzle_index: usize,
    pub invert_controls: bool,
    pub show_tile_numbers: bool,
    pub log_filter: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            game_type: GameType::Freeplay,
            max_challenge_time: DEFAULT_CHALLENGE_TIME,
            scramble_multiplier: DEFAULT_SCRAMBLE_MULTIPLIER,
            seed: None,
            puzzle_index: 0,
            invert_controls: false,
            show_tile_numbers: false,
            log_filter: "info".to_string(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(contents)?;
        Ok(config.normalized())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Clamps every value into its supported range instead of rejecting it.
    pub fn normalized(mut self) -> Self {
        self.grid_size = self.grid_size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);

        let time = if self.max_challenge_time.is_finite() {
            self.max_challenge_time
        } else {
            DEFAULT_CHALLENGE_TIME
        };
        let snapped = (time / CHALLENGE_TIME_STEP).round() * CHALLENGE_TIME_STEP;
        self.max_challenge_time = snapped.clamp(MIN_CHALLENGE_TIME, MAX_CHALLENGE_TIME);

        self.scramble_multiplier = self.scramble_multiplier.max(1);
        self.puzzle_index %= PUZZLES.len();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = GameConfig::from_toml_str(
            r#"
            grid_size = 42
            game_type = "challenge"
            max_challenge_time = 3.0
            scramble_multiplier = 0
            puzzle_index = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.grid_size, MAX_GRID_SIZE);
        assert_eq!(config.game_type, GameType::Challenge);
        assert_eq!(config.max_challenge_time, MIN_CHALLENGE_TIME);
        assert_eq!(config.scramble_multiplier, 1);
        assert_eq!(config.puzzle_index, 2);
    }

    #[test]
    fn challenge_time_snaps_to_step() {
        let config = GameConfig {
            max_challenge_time: 94.0,
            ..GameConfig::default()
        }
        .normalized();
        assert_eq!(config.max_challenge_time, 90.0);
    }

    #[test]
    fn unknown_keys_are_errors() {
        let err = GameConfig::from_toml_str("grid = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GameConfig::load(Path::new("/nonexistent/slider.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/slider.toml"));
    }
}

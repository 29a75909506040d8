//! A sliding-tile puzzle: the grid model, its move rules and scramble, a
//! challenge timer, and the play-state machine tying them together.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod grid;
pub mod puzzle;
pub mod tile;
pub mod timer;

pub use config::GameConfig;
pub use controller::{GridController, MoveOutcome, MoveSource};
pub use error::ConfigError;
pub use game::{Game, GameEvent, GameMode, GameType, Input, PlayState, RequestOutcome};
pub use grid::{Grid, GridLayout, TileId};
pub use puzzle::{Coord, Direction};
pub use tile::Tile;
pub use timer::Timer;

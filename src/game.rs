//! The play-state machine wrapping the grid.
//!
//! [`Game`] owns the [`GridController`] and [`Timer`] and is the only thing
//! allowed to change [`PlayState`]. The controller and timer report facts
//! (a move landed, the grid is solved, time ran out) and `Game` decides what
//! happens next. Front-ends feed it [`Input`] values once per frame through
//! [`Game::frame`] and drain the resulting [`GameEvent`]s.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, info};

use crate::catalog::{self, PuzzleSkin, PUZZLES};
use crate::config::GameConfig;
use crate::controller::{ClickOutcome, GridController, MoveOutcome, MoveSource};
use crate::grid::{Grid, GridLayout};
use crate::puzzle::{Coord, Direction};
use crate::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// Untimed.
    Freeplay,
    /// Against a countdown; running out fails the attempt.
    Challenge,
}

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Menu,
    Info,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Ready,
    Playing,
    Solved,
    Failed,
}

/// A request coming from the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// An arrow key. The tile behind the blank slides the way the arrow
    /// points; inverted controls flip this.
    Arrow(Direction),
    /// Move the tile next to the blank in this direction.
    Move(Direction),
    ClickTile(Coord),
    Hover(Option<Coord>),
    /// The start button: starts from Ready, otherwise returns to Ready.
    StartOrReset,
    ResizeGrid { grow: bool },
    CyclePuzzle { forward: bool },
    ChangeMaxTime { increase: bool },
    SetGameType(GameType),
    SetGameMode(GameMode),
    ToggleInvertControls,
    ToggleTileNumbers,
}

/// How a request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Applied,
    /// The move is illegal from the current arrangement.
    Rejected,
    /// The request does not apply in the current state.
    Ignored,
}

/// Facts emitted for feedback subscribers such as audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    MoveSucceeded { from: Coord, to: Coord },
    MoveRejected,
    ScrambleComplete { moves: usize },
    Solved { moves: u32 },
    Failed { moves: u32 },
    PlayStateChanged { from: PlayState, to: PlayState },
}

/// Summary shown after an attempt ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    Solved { moves: u32, time: String },
    Failed { moves: u32 },
}

impl fmt::Display for AttemptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptResult::Solved { moves, time } => {
                write!(f, "Puzzle solved!\nTotal moves: {}\nTime taken: {}", moves, time)
            }
            AttemptResult::Failed { moves } => {
                write!(f, "Challenge failed!\nYou made {} moves", moves)
            }
        }
    }
}

/// Which controls the front-end should offer right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    pub start_label: &'static str,
    /// Puzzle cycling, grid resizing and max-time changes.
    pub settings_enabled: bool,
    pub time_controls_visible: bool,
}

pub struct Game {
    game_type: GameType,
    game_mode: GameMode,
    play_state: PlayState,
    move_count: u32,
    puzzle_index: usize,
    timer: Timer,
    controller: GridController,
    scramble_multiplier: usize,
    invert_controls: bool,
    result: Option<AttemptResult>,
    events: Vec<GameEvent>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(&GameConfig::default(), GridLayout::default())
    }
}

impl Game {
    pub fn new(config: &GameConfig, layout: GridLayout) -> Self {
        let config = config.clone().normalized();
        let mut controller = match config.seed {
            Some(seed) => GridController::with_seed(config.grid_size, layout, seed),
            None => GridController::new(config.grid_size, layout),
        };
        controller.set_show_tile_numbers(config.show_tile_numbers);

        let mut timer = Timer::new(config.max_challenge_time);
        timer.reset(config.game_type);

        Self {
            game_type: config.game_type,
            game_mode: GameMode::Menu,
            play_state: PlayState::Ready,
            move_count: 0,
            puzzle_index: config.puzzle_index,
            timer,
            controller,
            scramble_multiplier: config.scramble_multiplier,
            invert_controls: config.invert_controls,
            result: None,
            events: Vec::new(),
        }
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn play_state(&self) -> PlayState {
        self.play_state
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn puzzle_index(&self) -> usize {
        self.puzzle_index
    }

    pub fn puzzle(&self) -> &PuzzleSkin {
        &PUZZLES[self.puzzle_index]
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn controller(&self) -> &GridController {
        &self.controller
    }

    pub fn grid(&self) -> &Grid {
        self.controller.grid()
    }

    pub fn invert_controls(&self) -> bool {
        self.invert_controls
    }

    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn affordances(&self) -> Affordances {
        let start_label = match self.play_state {
            PlayState::Ready => "Start",
            PlayState::Playing => "Reset",
            PlayState::Solved | PlayState::Failed => "Play again",
        };
        Affordances {
            start_label,
            settings_enabled: self.play_state != PlayState::Playing,
            time_controls_visible: self.game_type == GameType::Challenge,
        }
    }

    /// Runs one frame: inputs first, then the solved/expiry check, the timer
    /// and finally tile animation.
    pub fn frame(&mut self, inputs: &[Input], delta_seconds: f32) {
        for &input in inputs {
            let _ = self.handle_input(input);
        }

        if self.game_mode != GameMode::Game {
            return;
        }
        self.check_attempt();
        self.timer.tick(delta_seconds, self.game_type);
        self.controller.update(delta_seconds);
    }

    pub fn handle_input(&mut self, input: Input) -> RequestOutcome {
        match input {
            Input::Arrow(arrow) => {
                let direction = if self.invert_controls {
                    arrow
                } else {
                    arrow.opposite()
                };
                self.request_move(direction)
            }
            Input::Move(direction) => self.request_move(direction),
            Input::ClickTile(cell) => self.click_tile(cell),
            Input::Hover(cell) => self.hover(cell),
            Input::StartOrReset => self.start_or_reset(),
            Input::ResizeGrid { grow } => self.change_grid_size(grow),
            Input::CyclePuzzle { forward } => self.cycle_puzzle(forward),
            Input::ChangeMaxTime { increase } => self.change_max_challenge_time(increase),
            Input::SetGameType(game_type) => self.change_game_type(game_type),
            Input::SetGameMode(mode) => self.change_game_mode(mode),
            Input::ToggleInvertControls => {
                self.invert_controls = !self.invert_controls;
                RequestOutcome::Applied
            }
            Input::ToggleTileNumbers => {
                let show = !self.controller.show_tile_numbers();
                self.controller.set_show_tile_numbers(show);
                RequestOutcome::Applied
            }
        }
    }

    fn is_playing(&self) -> bool {
        self.game_mode == GameMode::Game && self.play_state == PlayState::Playing
    }

    /// A player move. Ignored unless an attempt is in progress.
    pub fn request_move(&mut self, direction: Direction) -> RequestOutcome {
        if !self.is_playing() {
            return RequestOutcome::Ignored;
        }
        let outcome = self.controller.move_tile_to_blank(direction, MoveSource::Player);
        self.record_player_move(outcome)
    }

    pub fn click_tile(&mut self, cell: Coord) -> RequestOutcome {
        if !self.is_playing() {
            return RequestOutcome::Ignored;
        }
        match self.controller.slide_tile_at(cell) {
            ClickOutcome::Moved(outcome) => self.record_player_move(outcome),
            ClickOutcome::Rejected { .. } => {
                self.events.push(GameEvent::MoveRejected);
                RequestOutcome::Rejected
            }
            ClickOutcome::Ignored => RequestOutcome::Ignored,
        }
    }

    fn record_player_move(&mut self, outcome: MoveOutcome) -> RequestOutcome {
        match outcome {
            MoveOutcome::Moved { from, to, .. } => {
                self.move_count += 1;
                self.events.push(GameEvent::MoveSucceeded { from, to });
                RequestOutcome::Applied
            }
            MoveOutcome::Rejected => {
                self.events.push(GameEvent::MoveRejected);
                RequestOutcome::Rejected
            }
        }
    }

    pub fn hover(&mut self, cell: Option<Coord>) -> RequestOutcome {
        if !self.is_playing() {
            return RequestOutcome::Ignored;
        }
        self.controller.highlight_tile_at(cell);
        RequestOutcome::Applied
    }

    pub fn start_or_reset(&mut self) -> RequestOutcome {
        if self.game_mode != GameMode::Game {
            return RequestOutcome::Ignored;
        }
        if self.play_state == PlayState::Ready {
            self.change_play_state(PlayState::Playing);
        } else {
            self.change_play_state(PlayState::Ready);
        }
        RequestOutcome::Applied
    }

    pub fn change_grid_size(&mut self, grow: bool) -> RequestOutcome {
        if self.play_state == PlayState::Playing {
            return RequestOutcome::Ignored;
        }
        let size = self.controller.resize(if grow { 1 } else { -1 });
        info!(size, "grid size changed");
        self.change_play_state(PlayState::Ready);
        RequestOutcome::Applied
    }

    pub fn cycle_puzzle(&mut self, forward: bool) -> RequestOutcome {
        if self.play_state == PlayState::Playing {
            return RequestOutcome::Ignored;
        }
        self.puzzle_index = catalog::cycle_index(self.puzzle_index, forward);
        info!(puzzle = self.puzzle().name, "puzzle changed");
        self.change_play_state(PlayState::Ready);
        RequestOutcome::Applied
    }

    pub fn change_max_challenge_time(&mut self, increase: bool) -> RequestOutcome {
        if self.play_state == PlayState::Playing {
            return RequestOutcome::Ignored;
        }
        self.timer.change_max_challenge_time(increase);
        self.timer.reset(GameType::Challenge);
        self.change_play_state(PlayState::Ready);
        RequestOutcome::Applied
    }

    /// Only possible from the menu.
    pub fn change_game_type(&mut self, game_type: GameType) -> RequestOutcome {
        if self.game_mode != GameMode::Menu {
            return RequestOutcome::Ignored;
        }
        self.game_type = game_type;
        self.timer.reset(game_type);
        info!(?game_type, "game type changed");
        RequestOutcome::Applied
    }

    /// Switches screens. Entering or leaving the game screen abandons any
    /// attempt and starts over from Ready.
    pub fn change_game_mode(&mut self, mode: GameMode) -> RequestOutcome {
        if mode == self.game_mode {
            return RequestOutcome::Ignored;
        }
        if self.game_mode == GameMode::Game {
            self.change_play_state(PlayState::Ready);
        }
        info!(from = ?self.game_mode, to = ?mode, "game mode changed");
        self.game_mode = mode;
        if mode == GameMode::Game {
            self.change_play_state(PlayState::Ready);
        }
        RequestOutcome::Applied
    }

    fn check_attempt(&mut self) {
        if self.play_state != PlayState::Playing {
            return;
        }
        if self.controller.grid().is_solved() {
            self.change_play_state(PlayState::Solved);
        } else if self.game_type == GameType::Challenge && self.timer.is_expired() {
            self.change_play_state(PlayState::Failed);
        }
    }

    fn change_play_state(&mut self, new_state: PlayState) {
        let old_state = self.play_state;
        self.play_state = new_state;
        info!(from = ?old_state, to = ?new_state, "play state changed");
        self.events.push(GameEvent::PlayStateChanged {
            from: old_state,
            to: new_state,
        });

        match new_state {
            PlayState::Ready => {
                self.result = None;
                self.reset_attempt();
            }
            PlayState::Playing => {
                self.timer.start();
                let report = self.controller.scramble(self.scramble_multiplier);
                self.events.push(GameEvent::ScrambleComplete { moves: report.moves });
            }
            PlayState::Solved => {
                let time = self
                    .timer
                    .format_time(self.game_type == GameType::Challenge);
                info!(moves = self.move_count, %time, "puzzle solved");
                self.events.push(GameEvent::Solved {
                    moves: self.move_count,
                });
                self.result = Some(AttemptResult::Solved {
                    moves: self.move_count,
                    time,
                });
                self.reset_attempt();
            }
            PlayState::Failed => {
                info!(moves = self.move_count, "challenge failed");
                self.events.push(GameEvent::Failed {
                    moves: self.move_count,
                });
                self.result = Some(AttemptResult::Failed {
                    moves: self.move_count,
                });
                self.reset_attempt();
            }
        }
    }

    fn reset_attempt(&mut self) {
        self.move_count = 0;
        self.timer.reset(self.game_type);
        self.controller.reset();
        debug!(size = self.controller.grid().size(), "attempt reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(game_type: GameType) -> Game {
        let config = GameConfig {
            game_type,
            seed: Some(3),
            ..GameConfig::default()
        };
        let mut game = Game::new(&config, GridLayout::default());
        game.change_game_mode(GameMode::Game);
        game
    }

    #[test]
    fn starts_in_menu_and_ready() {
        let game = Game::default();
        assert_eq!(game.game_mode(), GameMode::Menu);
        assert_eq!(game.play_state(), PlayState::Ready);
        assert_eq!(game.grid().size(), 4);
        assert_eq!(game.puzzle_index(), 0);
    }

    #[test]
    fn moves_are_ignored_outside_playing() {
        let mut game = game(GameType::Freeplay);
        assert_eq!(game.request_move(Direction::Up), RequestOutcome::Ignored);
        assert!(game.grid().is_solved());
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn start_scrambles_and_counts_player_moves_only() {
        let mut game = game(GameType::Freeplay);
        game.start_or_reset();
        assert_eq!(game.play_state(), PlayState::Playing);
        assert!(!game.grid().is_solved());
        assert_eq!(game.move_count(), 0);
        assert!(game.timer().is_counting());

        let outcomes: Vec<_> = Direction::ALL
            .into_iter()
            .map(|dir| game.request_move(dir))
            .collect();
        let applied = outcomes
            .iter()
            .filter(|&&o| o == RequestOutcome::Applied)
            .count();
        assert_eq!(game.move_count() as usize, applied);
    }

    #[test]
    fn illegal_move_is_rejected_not_ignored() {
        let mut game = game(GameType::Freeplay);
        game.start_or_reset();
        let blank = game.grid().blank_coord();
        let size = game.grid().size();
        let off_board = Direction::ALL
            .into_iter()
            .find(|&dir| blank.step(dir, size).is_none());

        if let Some(direction) = off_board {
            let _ = game.drain_events();
            assert_eq!(game.request_move(direction), RequestOutcome::Rejected);
            assert_eq!(game.drain_events(), vec![GameEvent::MoveRejected]);
            assert_eq!(game.move_count(), 0);
        }
    }

    #[test]
    fn settings_are_locked_while_playing() {
        let mut game = game(GameType::Challenge);
        game.start_or_reset();
        assert_eq!(game.change_grid_size(true), RequestOutcome::Ignored);
        assert_eq!(game.cycle_puzzle(true), RequestOutcome::Ignored);
        assert_eq!(game.change_max_challenge_time(true), RequestOutcome::Ignored);
        assert!(!game.affordances().settings_enabled);
        assert_eq!(game.affordances().start_label, "Reset");
    }

    #[test]
    fn resize_forces_ready_with_fresh_grid() {
        let mut game = game(GameType::Freeplay);
        assert_eq!(game.change_grid_size(false), RequestOutcome::Applied);
        assert_eq!(game.grid().size(), 3);
        assert_eq!(game.play_state(), PlayState::Ready);
        assert!(game.grid().is_solved());
    }

    #[test]
    fn game_type_only_changes_in_menu() {
        let mut game = game(GameType::Freeplay);
        assert_eq!(game.change_game_type(GameType::Challenge), RequestOutcome::Ignored);

        game.change_game_mode(GameMode::Menu);
        assert_eq!(game.change_game_type(GameType::Challenge), RequestOutcome::Applied);
        assert!(game.affordances().time_controls_visible);
        assert_eq!(game.timer().value(), 60.0);
    }

    #[test]
    fn challenge_fails_when_time_runs_out() {
        let mut game = game(GameType::Challenge);
        game.start_or_reset();
        game.frame(&[], 59.5);
        assert_eq!(game.play_state(), PlayState::Playing);

        game.frame(&[], 0.0);
        assert_eq!(game.play_state(), PlayState::Failed);
        assert_eq!(game.result(), Some(&AttemptResult::Failed { moves: 0 }));
        assert!(game.grid().is_solved());
        assert_eq!(game.timer().value(), 60.0);
        assert_eq!(game.affordances().start_label, "Play again");

        game.start_or_reset();
        assert_eq!(game.play_state(), PlayState::Ready);
        assert_eq!(game.result(), None);
    }

    #[test]
    fn freeplay_never_fails() {
        let mut game = game(GameType::Freeplay);
        game.start_or_reset();
        for _ in 0..100 {
            game.frame(&[], 30.0);
        }
        assert_eq!(game.play_state(), PlayState::Playing);
    }

    #[test]
    fn max_time_change_resets_to_ready() {
        let mut game = game(GameType::Challenge);
        game.change_max_challenge_time(true);
        assert_eq!(game.timer().max_challenge_time(), 70.0);
        assert_eq!(game.timer().value(), 70.0);
        assert_eq!(game.play_state(), PlayState::Ready);
    }

    #[test]
    fn arrows_slide_toward_the_blank_unless_inverted() {
        let mut game = game(GameType::Freeplay);
        game.start_or_reset();

        let blank = game.grid().blank_coord();
        let size = game.grid().size();
        let arrow = Direction::ALL
            .into_iter()
            .find(|arrow| blank.step(arrow.opposite(), size).is_some())
            .unwrap();

        assert_eq!(game.handle_input(Input::Arrow(arrow)), RequestOutcome::Applied);
        assert_eq!(game.grid().blank_coord(), blank.step(arrow.opposite(), size).unwrap());

        game.handle_input(Input::ToggleInvertControls);
        assert_eq!(game.handle_input(Input::Arrow(arrow)), RequestOutcome::Applied);
        assert_eq!(game.grid().blank_coord(), blank);
    }

    #[test]
    fn result_text_matches_outcome() {
        let solved = AttemptResult::Solved {
            moves: 12,
            time: "00:42".to_string(),
        };
        assert_eq!(
            solved.to_string(),
            "Puzzle solved!\nTotal moves: 12\nTime taken: 00:42"
        );
        assert_eq!(
            AttemptResult::Failed { moves: 3 }.to_string(),
            "Challenge failed!\nYou made 3 moves"
        );
    }
}

//! Grid lifecycle, move resolution, scrambling and per-frame tile effects.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::grid::{Grid, GridLayout, TileId};
use crate::puzzle::{Coord, Direction};

pub const MIN_GRID_SIZE: usize = 2;
pub const MAX_GRID_SIZE: usize = 10;
pub const DEFAULT_GRID_SIZE: usize = 4;

const MAX_TILE_SHAKE: f32 = 5.0;
const TILE_SHAKE_REDUCTION_SPEED: f32 = 18.0;
const ANIMATION_SPEED: f32 = 10.0;
// Kept high so the shake does not get smoothed out.
const SHAKE_ANIMATION_SPEED: f32 = 100.0;
const SNAP_DISTANCE: f32 = 1.0;

/// Who asked for a move. Scramble moves are not counted and make no sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    Player,
    Scramble,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// `tile` slid from `from` into the blank, which now sits at `from`.
    Moved { tile: TileId, from: Coord, to: Coord },
    /// The cell next to the blank in that direction is off the board.
    Rejected,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Result of clicking a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Moved(MoveOutcome),
    /// The tile is not next to the blank; it starts shaking.
    Rejected { tile: TileId },
    /// The blank or an off-board cell was clicked.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrambleReport {
    pub moves: usize,
    /// Moves added because the walk ended back on the solved arrangement.
    pub forced: usize,
}

pub struct GridController {
    grid: Grid,
    layout: GridLayout,
    rng: StdRng,
    effect_tile: Option<TileId>,
    shake_amount: f32,
    show_tile_numbers: bool,
}

impl GridController {
    pub fn new(size: usize, layout: GridLayout) -> Self {
        Self::with_rng(size, layout, StdRng::from_entropy())
    }

    /// A controller whose scrambles are reproducible.
    pub fn with_seed(size: usize, layout: GridLayout, seed: u64) -> Self {
        Self::with_rng(size, layout, StdRng::seed_from_u64(seed))
    }

    fn with_rng(size: usize, layout: GridLayout, rng: StdRng) -> Self {
        let size = size.clamp(MIN_GRID_SIZE, MAX_GRID_SIZE);
        Self {
            grid: Grid::new(size, &layout),
            layout,
            rng,
            effect_tile: None,
            shake_amount: MAX_TILE_SHAKE,
            show_tile_numbers: false,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn effect_tile(&self) -> Option<TileId> {
        self.effect_tile
    }

    pub fn shake_amount(&self) -> f32 {
        self.shake_amount
    }

    pub fn show_tile_numbers(&self) -> bool {
        self.show_tile_numbers
    }

    pub fn set_show_tile_numbers(&mut self, show: bool) {
        self.show_tile_numbers = show;
    }

    /// Slides the tile next to the blank in `direction` into the blank.
    ///
    /// This is the only legality check: the move is legal iff that neighbour
    /// exists. Counting and feedback are left to the caller via `source`.
    pub fn move_tile_to_blank(&mut self, direction: Direction, source: MoveSource) -> MoveOutcome {
        let blank = self.grid.blank_coord();
        let Some(target) = blank.step(direction, self.grid.size()) else {
            return MoveOutcome::Rejected;
        };

        let tile = self.grid.tile_id_at(target);
        self.grid.swap_tiles(blank, target);
        trace!(tile, %target, %blank, ?source, "tile moved");

        MoveOutcome::Moved {
            tile,
            from: target,
            to: blank,
        }
    }

    /// Performs `size² × multiplier` random legal moves, then keeps going
    /// until the grid is no longer solved.
    pub fn scramble(&mut self, multiplier: usize) -> ScrambleReport {
        let size = self.grid.size();
        let planned = size * size * multiplier.max(1);
        let mut moves = 0;

        while moves < planned || self.grid.is_solved() {
            let direction = *Direction::ALL
                .choose(&mut self.rng)
                .unwrap_or(&Direction::Up);
            if self.move_tile_to_blank(direction, MoveSource::Scramble).is_moved() {
                moves += 1;
            }
        }

        let report = ScrambleReport {
            moves,
            forced: moves - planned,
        };
        debug!(size, moves = report.moves, forced = report.forced, "grid scrambled");
        report
    }

    /// Resolves a click on `cell` into a player move toward the blank.
    pub fn slide_tile_at(&mut self, cell: Coord) -> ClickOutcome {
        if !cell.in_bounds(self.grid.size()) {
            return ClickOutcome::Ignored;
        }

        let tile = self.grid.tile_id_at(cell);
        if tile == self.grid.blank_id() {
            return ClickOutcome::Ignored;
        }

        match Direction::between(self.grid.blank_coord(), cell) {
            Some(direction) => ClickOutcome::Moved(self.move_tile_to_blank(direction, MoveSource::Player)),
            None => {
                self.set_effect_tile(tile);
                ClickOutcome::Rejected { tile }
            }
        }
    }

    /// Highlights the non-blank tile at `cell`, clearing every other highlight.
    pub fn highlight_tile_at(&mut self, cell: Option<Coord>) {
        let size = self.grid.size();
        let hovered = cell
            .filter(|cell| cell.in_bounds(size))
            .map(|cell| self.grid.tile_id_at(cell))
            .filter(|&id| id != self.grid.blank_id());

        for id in 0..size * size {
            self.grid.tile_mut(id).set_highlighted(Some(id) == hovered);
        }
    }

    fn set_effect_tile(&mut self, tile: TileId) {
        self.reset_tile_shake();
        self.effect_tile = Some(tile);
    }

    fn reset_tile_shake(&mut self) {
        if let Some(tile) = self.effect_tile.take() {
            self.grid.tile_mut(tile).remove_effects();
        }
        self.shake_amount = MAX_TILE_SHAKE;
    }

    /// Replaces the grid with a fresh solved one of the same size.
    pub fn reset(&mut self) {
        self.rebuild(self.grid.size());
    }

    /// Grows or shrinks the grid by `delta`, clamped to the supported range.
    /// Returns the new size.
    pub fn resize(&mut self, delta: isize) -> usize {
        let current = self.grid.size() as isize;
        let size = (current + delta).clamp(MIN_GRID_SIZE as isize, MAX_GRID_SIZE as isize) as usize;
        if size != self.grid.size() {
            self.rebuild(size);
        }
        size
    }

    pub fn increase_size(&mut self) -> usize {
        self.resize(1)
    }

    pub fn decrease_size(&mut self) -> usize {
        self.resize(-1)
    }

    fn rebuild(&mut self, size: usize) {
        self.effect_tile = None;
        self.shake_amount = MAX_TILE_SHAKE;
        self.grid = Grid::new(size, &self.layout);
    }

    /// Advances shake decay and slide animations by `delta_seconds`.
    pub fn update(&mut self, delta_seconds: f32) {
        if let Some(tile) = self.effect_tile {
            let amount = self.shake_amount;
            self.grid.tile_mut(tile).apply_shake(amount, MAX_TILE_SHAKE, &mut self.rng);
            self.shake_amount -= delta_seconds * TILE_SHAKE_REDUCTION_SPEED;
            if self.shake_amount <= 0.0 {
                self.reset_tile_shake();
            }
        }

        let size = self.grid.size();
        for id in 0..size * size {
            let target = self.grid.target_position(id);
            let speed = if Some(id) == self.effect_tile {
                SHAKE_ANIMATION_SPEED
            } else {
                ANIMATION_SPEED
            };
            self.grid
                .tile_mut(id)
                .animate(target, delta_seconds, speed, SNAP_DISTANCE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tint;

    fn controller(size: usize) -> GridController {
        GridController::with_seed(size, GridLayout::default(), 42)
    }

    #[test]
    fn move_toward_edge_is_rejected_without_mutation() {
        let mut controller = controller(4);
        assert_eq!(
            controller.move_tile_to_blank(Direction::Down, MoveSource::Player),
            MoveOutcome::Rejected
        );
        assert_eq!(
            controller.move_tile_to_blank(Direction::Right, MoveSource::Player),
            MoveOutcome::Rejected
        );
        assert!(controller.grid().is_solved());
    }

    #[test]
    fn move_up_then_down_round_trips() {
        let mut controller = controller(4);
        let outcome = controller.move_tile_to_blank(Direction::Up, MoveSource::Player);
        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                tile: 11,
                from: Coord::new(3, 2),
                to: Coord::new(3, 3),
            }
        );

        let grid = controller.grid();
        assert_eq!(grid.blank_coord(), Coord::new(3, 2));
        let slid = grid.tile_at(Coord::new(3, 3));
        assert_eq!(slid.home(), Coord::new(3, 2));
        assert!(!grid.is_solved());

        assert!(controller
            .move_tile_to_blank(Direction::Down, MoveSource::Player)
            .is_moved());
        assert_eq!(controller.grid().blank_coord(), Coord::new(3, 3));
        assert!(controller.grid().is_solved());
    }

    #[test]
    fn scramble_never_leaves_grid_solved() {
        for size in MIN_GRID_SIZE..=MAX_GRID_SIZE {
            for seed in 0..8 {
                let mut controller = GridController::with_seed(size, GridLayout::default(), seed);
                let report = controller.scramble(1);
                assert!(report.moves >= size * size);
                assert!(!controller.grid().is_solved(), "size {size} seed {seed}");
                assert!(controller.grid().is_solvable());
            }
        }
    }

    #[test]
    fn scramble_is_deterministic_per_seed() {
        let mut a = controller(4);
        let mut b = controller(4);
        a.scramble(20);
        b.scramble(20);
        assert_eq!(a.grid().to_string(), b.grid().to_string());
    }

    #[test]
    fn resize_clamps_and_rebuilds() {
        let mut controller = controller(3);
        controller.scramble(1);
        assert_eq!(controller.decrease_size(), 2);
        assert!(controller.grid().is_solved());
        assert_eq!(controller.decrease_size(), 2);
        assert_eq!(controller.resize(100), MAX_GRID_SIZE);
        assert_eq!(controller.increase_size(), MAX_GRID_SIZE);
        assert_eq!(controller.grid().size(), MAX_GRID_SIZE);
    }

    #[test]
    fn click_adjacent_tile_moves_it() {
        let mut controller = controller(3);
        let outcome = controller.slide_tile_at(Coord::new(1, 2));
        assert_eq!(
            outcome,
            ClickOutcome::Moved(MoveOutcome::Moved {
                tile: 7,
                from: Coord::new(1, 2),
                to: Coord::new(2, 2),
            })
        );
        assert_eq!(controller.grid().blank_coord(), Coord::new(1, 2));
    }

    #[test]
    fn click_far_tile_shakes_until_decayed() {
        let mut controller = controller(3);
        assert_eq!(controller.slide_tile_at(Coord::new(0, 0)), ClickOutcome::Rejected { tile: 0 });
        assert_eq!(controller.effect_tile(), Some(0));

        controller.update(0.1);
        assert_ne!(controller.grid().tile(0).tint(), Tint::WHITE);

        controller.update(1.0);
        assert_eq!(controller.effect_tile(), None);
        assert_eq!(controller.grid().tile(0).tint(), Tint::WHITE);
        assert_eq!(controller.shake_amount(), MAX_TILE_SHAKE);
        assert!(controller.grid().is_solved());
    }

    #[test]
    fn click_on_blank_or_outside_is_ignored() {
        let mut controller = controller(3);
        assert_eq!(controller.slide_tile_at(Coord::new(2, 2)), ClickOutcome::Ignored);
        assert_eq!(controller.slide_tile_at(Coord::new(5, 0)), ClickOutcome::Ignored);
    }

    #[test]
    fn hover_highlights_one_non_blank_tile() {
        let mut controller = controller(3);
        controller.highlight_tile_at(Some(Coord::new(1, 1)));
        assert!(controller.grid().tile(4).is_highlighted());

        controller.highlight_tile_at(Some(Coord::new(2, 2)));
        assert!(controller.grid().cells().all(|(_, tile)| !tile.is_highlighted()));
    }

    #[test]
    fn animation_converges_on_new_cell() {
        let mut controller = controller(2);
        controller.move_tile_to_blank(Direction::Left, MoveSource::Player);
        let moved = controller.grid().tile_id_at(Coord::new(1, 1));
        let target = controller.grid().cell_position(Coord::new(1, 1));
        assert_ne!(controller.grid().tile(moved).visual_position(), target);

        for _ in 0..60 {
            controller.update(1.0 / 60.0);
        }
        assert_eq!(controller.grid().tile(moved).visual_position(), target);
    }
}

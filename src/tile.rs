use glam::Vec2;
use rand::Rng;

use crate::puzzle::Coord;

/// RGB multiplier applied when a tile is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Tint {
    pub const WHITE: Tint = Tint::new(1.0, 1.0, 1.0);
    pub const HIGHLIGHT: Tint = Tint::new(0.85, 0.9, 0.8);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// A single piece of the puzzle.
///
/// Only the home coordinate is stored. Where the tile currently sits is owned
/// by the [`Grid`](crate::grid::Grid) occupancy array.
#[derive(Debug, Clone)]
pub struct Tile {
    home: Coord,
    number: usize,
    blank: bool,
    visual_position: Vec2,
    effect_offset: Vec2,
    highlighted: bool,
    tint: Tint,
}

impl Tile {
    pub fn new(home: Coord, blank: bool, grid_size: usize) -> Self {
        Self {
            home,
            number: home.x + home.y * grid_size + 1,
            blank,
            visual_position: Vec2::ZERO,
            effect_offset: Vec2::ZERO,
            highlighted: false,
            tint: Tint::WHITE,
        }
    }

    /// The cell this tile occupies when the puzzle is solved. Also selects the
    /// image segment drawn on it.
    pub fn home(&self) -> Coord {
        self.home
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn is_blank(&self) -> bool {
        self.blank
    }

    /// Where the tile is drawn this frame.
    pub fn visual_position(&self) -> Vec2 {
        self.visual_position
    }

    pub fn effect_offset(&self) -> Vec2 {
        self.effect_offset
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn tint(&self) -> Tint {
        self.tint
    }

    /// Colour to draw with: an active effect tint wins over the highlight.
    pub fn draw_tint(&self) -> Tint {
        if self.highlighted && self.tint == Tint::WHITE {
            Tint::HIGHLIGHT
        } else {
            self.tint
        }
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }

    pub(crate) fn place_at(&mut self, position: Vec2) {
        self.visual_position = position;
    }

    /// Moves the visual position toward `target` (plus any effect offset),
    /// snapping once it is within `snap_distance`.
    pub(crate) fn animate(&mut self, target: Vec2, delta_seconds: f32, speed: f32, snap_distance: f32) {
        let goal = target + self.effect_offset;
        if self.visual_position.distance(goal) < snap_distance {
            self.visual_position = goal;
        } else {
            let t = (delta_seconds * speed).clamp(0.0, 1.0);
            self.visual_position = self.visual_position.lerp(goal, t);
        }
    }

    /// Jitters the tile by up to half of `intensity` on each axis and reddens
    /// it proportionally to `intensity / max_intensity`.
    pub(crate) fn apply_shake<R: Rng + ?Sized>(&mut self, intensity: f32, max_intensity: f32, rng: &mut R) {
        let intensity = intensity.max(0.0);
        let x = rng.gen::<f32>() * intensity - intensity / 2.0;
        let y = rng.gen::<f32>() * intensity - intensity / 2.0;
        self.effect_offset = Vec2::new(x, y);

        let ratio = intensity / max_intensity;
        self.tint = Tint::new(0.85, 0.9 - ratio, 0.8 - ratio);
    }

    pub(crate) fn remove_effects(&mut self) {
        self.effect_offset = Vec2::ZERO;
        self.tint = Tint::WHITE;
    }
}

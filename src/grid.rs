use std::fmt;

use glam::Vec2;

use crate::puzzle::Coord;
use crate::tile::Tile;

/// Index of a tile in the grid's arena. Equal to the row-major index of the
/// tile's home cell.
pub type TileId = usize;

/// Pixel layout used to derive where each cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Width and height of the whole grid in pixels.
    pub pixel_dimensions: u32,
    /// Empty space between neighbouring tiles in pixels.
    pub spacing: u32,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            pixel_dimensions: 500,
            spacing: 2,
            screen_width: 1280,
            screen_height: 720,
        }
    }
}

impl GridLayout {
    pub fn tile_pixel_size(&self, size: usize) -> u32 {
        (self.pixel_dimensions / size as u32).saturating_sub(self.spacing)
    }

    fn cell_positions(&self, size: usize) -> Vec<Vec2> {
        let tile = self.tile_pixel_size(size) as f32;
        let spacing = self.spacing as f32;
        let centre = Vec2::new(self.screen_width as f32 / 2.0, self.screen_height as f32 / 2.0);
        let half_grid = Vec2::splat(self.pixel_dimensions as f32 / 2.0);

        (0..size * size)
            .map(|index| {
                let cell = Coord::from_index(index, size);
                let offset = Vec2::new(
                    cell.x as f32 * (tile + spacing),
                    cell.y as f32 * (tile + spacing),
                );
                centre + offset - half_grid
            })
            .collect()
    }
}

/// An N×N board of tiles with exactly one blank.
///
/// Tiles live in an arena indexed by [`TileId`]; `slots` maps every cell to
/// the tile occupying it and is the only record of where tiles are.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    tiles: Vec<Tile>,
    slots: Vec<TileId>,
    blank: TileId,
    cell_positions: Vec<Vec2>,
    tile_pixel_size: u32,
}

impl Grid {
    /// Builds a solved grid with the blank in the bottom-right cell. Sizes
    /// below 2 are raised to 2.
    pub fn new(size: usize, layout: &GridLayout) -> Self {
        let size = size.max(2);
        let cell_positions = layout.cell_positions(size);
        let blank = size * size - 1;

        let tiles = (0..size * size)
            .map(|index| {
                let mut tile = Tile::new(Coord::from_index(index, size), index == blank, size);
                tile.place_at(cell_positions[index]);
                tile
            })
            .collect();

        Self {
            size,
            tiles,
            slots: (0..size * size).collect(),
            blank,
            cell_positions,
            tile_pixel_size: layout.tile_pixel_size(size),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn tile_pixel_size(&self) -> u32 {
        self.tile_pixel_size
    }

    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id]
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> &mut Tile {
        &mut self.tiles[id]
    }

    /// The tile currently occupying `cell`.
    pub fn tile_at(&self, cell: Coord) -> &Tile {
        &self.tiles[self.tile_id_at(cell)]
    }

    pub fn tile_id_at(&self, cell: Coord) -> TileId {
        self.slots[cell.index(self.size)]
    }

    /// Where the tile currently sits, derived from the occupancy array.
    pub fn coord_of(&self, id: TileId) -> Coord {
        let index = self
            .slots
            .iter()
            .position(|&occupant| occupant == id)
            .unwrap_or(id);
        Coord::from_index(index, self.size)
    }

    pub fn blank_id(&self) -> TileId {
        self.blank
    }

    pub fn blank_coord(&self) -> Coord {
        self.coord_of(self.blank)
    }

    /// Pixel position of `cell` computed at setup.
    pub fn cell_position(&self, cell: Coord) -> Vec2 {
        self.cell_positions[cell.index(self.size)]
    }

    /// Where `id` should be drawn once it stops moving, excluding effects.
    pub fn target_position(&self, id: TileId) -> Vec2 {
        self.cell_position(self.coord_of(id))
    }

    /// Cells in row-major order with the tile occupying each.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Tile)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(move |(index, &id)| (Coord::from_index(index, self.size), &self.tiles[id]))
    }

    /// Exchanges whatever occupies `a` and `b`. No adjacency check is made;
    /// both cells must be in bounds.
    pub fn swap_tiles(&mut self, a: Coord, b: Coord) {
        self.slots.swap(a.index(self.size), b.index(self.size));
    }

    pub fn is_solved(&self) -> bool {
        self.slots.iter().enumerate().all(|(index, &id)| index == id)
    }

    /// Whether this arrangement can be reached from the solved one by legal
    /// moves, using the inversion-count parity rule.
    pub fn is_solvable(&self) -> bool {
        let numbers: Vec<usize> = self
            .slots
            .iter()
            .filter(|&&id| id != self.blank)
            .map(|&id| self.tiles[id].number())
            .collect();
        let inversions = count_inversions(&numbers);

        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.blank_coord().y) % 2 == 1
        }
    }
}

fn count_inversions(numbers: &[usize]) -> usize {
    numbers
        .iter()
        .enumerate()
        .map(|(i, &val)| numbers[i + 1..].iter().filter(|&&next| next < val).count())
        .sum()
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let tile = self.tile_at(Coord::new(x, y));
                if tile.is_blank() {
                    write!(f, "    ")?;
                } else {
                    write!(f, "{:3} ", tile.number())?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

use std::fmt;

/// One of the four unit vectors a move request can carry.
///
/// The direction names the neighbour of the blank that slides into it: `Down`
/// picks the tile below the blank, which therefore slides up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Down, Direction::Up, Direction::Right, Direction::Left];

    /// `(dx, dy)` with `y` growing downwards.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// The direction leading from `from` to the orthogonally adjacent `to`.
    pub fn between(from: Coord, to: Coord) -> Option<Self> {
        let dx = to.x as isize - from.x as isize;
        let dy = to.y as isize - from.y as isize;
        Direction::ALL
            .into_iter()
            .find(|dir| dir.as_offset() == (dx, dy))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Left => "Left",
            Direction::Down => "Down",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// A logical cell of the grid, `x` being the column and `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Steps one cell in `dir`, or `None` when that leaves a `size`×`size` board.
    pub fn step(self, dir: Direction, size: usize) -> Option<Self> {
        let (dx, dy) = dir.as_offset();

        let new_x = self.x as isize + dx;
        let new_y = self.y as isize + dy;

        if new_x >= 0 && new_x < size as isize && new_y >= 0 && new_y < size as isize {
            Some(Coord::new(new_x as usize, new_y as usize))
        } else {
            None
        }
    }

    pub fn in_bounds(self, size: usize) -> bool {
        self.x < size && self.y < size
    }

    pub(crate) fn index(self, size: usize) -> usize {
        self.y * size + self.x
    }

    pub(crate) fn from_index(index: usize, size: usize) -> Self {
        Coord::new(index % size, index / size)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_inside_the_board() {
        let corner = Coord::new(3, 3);
        assert_eq!(corner.step(Direction::Up, 4), Some(Coord::new(3, 2)));
        assert_eq!(corner.step(Direction::Left, 4), Some(Coord::new(2, 3)));
        assert_eq!(corner.step(Direction::Down, 4), None);
        assert_eq!(corner.step(Direction::Right, 4), None);
        assert_eq!(Coord::new(0, 0).step(Direction::Up, 4), None);
    }

    #[test]
    fn opposite_undoes_offset() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.as_offset();
            let (ox, oy) = dir.opposite().as_offset();
            assert_eq!((dx + ox, dy + oy), (0, 0), "{dir}");
        }
    }

    #[test]
    fn between_finds_adjacent_direction_only() {
        let blank = Coord::new(1, 1);
        assert_eq!(Direction::between(blank, Coord::new(1, 2)), Some(Direction::Down));
        assert_eq!(Direction::between(blank, Coord::new(0, 1)), Some(Direction::Left));
        assert_eq!(Direction::between(blank, Coord::new(2, 2)), None);
        assert_eq!(Direction::between(blank, blank), None);
    }
}

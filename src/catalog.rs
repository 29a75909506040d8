/// A picture the tiles can be cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleSkin {
    pub name: &'static str,
    pub image: &'static str,
}

pub static PUZZLES: [PuzzleSkin; 5] = [
    PuzzleSkin {
        name: "Visage parfait",
        image: "images/puzzle_pierre.png",
    },
    PuzzleSkin {
        name: "Girafe majestueuse",
        image: "images/puzzle_giraffe.png",
    },
    PuzzleSkin {
        name: "Patron dans le bain",
        image: "images/puzzle_bath.png",
    },
    PuzzleSkin {
        name: "Virtual rea-lait-y",
        image: "images/puzzle_cow.png",
    },
    PuzzleSkin {
        name: "Arc-en-ciel",
        image: "images/puzzle_rainbow.png",
    },
];

/// Steps `index` by one through the catalog, wrapping at both ends.
pub fn cycle_index(index: usize, forward: bool) -> usize {
    let len = PUZZLES.len();
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

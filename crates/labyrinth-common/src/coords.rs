//! Coordinate and direction types for the cell and block grids.

use serde::{Deserialize, Serialize};

/// Offsets of the eight blocks surrounding a position, row by row.
pub const NEIGHBOR_OFFSETS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Integer grid position.
///
/// Used for both coarse maze cells and fine terrain blocks. `x` grows to the
/// right and `y` grows downwards, so "top" is `y - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by the given offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Returns the neighbouring position in the given direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        self.offset(dx, dy)
    }

    /// Manhattan distance to another position.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Squared Euclidean distance to another position.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for GridPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four sides of a cell or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards `y - 1`
    Top,
    /// Towards `x + 1`
    Right,
    /// Towards `y + 1`
    Down,
    /// Towards `x - 1`
    Left,
}

impl Direction {
    /// All four directions, clockwise from the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Down, Self::Left];

    /// Unit offset of this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Top => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// The side facing back towards this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Direction of a unit offset, if it is one.
    #[must_use]
    pub const fn from_offset(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Top),
            (1, 0) => Some(Self::Right),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_from_offset() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            assert_eq!(Direction::from_offset(dx, dy), Some(dir));
        }
        assert_eq!(Direction::from_offset(1, 1), None);
        assert_eq!(Direction::from_offset(0, 0), None);
    }

    #[test]
    fn test_step_top_decreases_y() {
        let pos = GridPos::new(3, 3);
        assert_eq!(pos.step(Direction::Top), GridPos::new(3, 2));
        assert_eq!(pos.step(Direction::Left), GridPos::new(2, 3));
    }

    proptest! {
        #[test]
        fn prop_manhattan_symmetric(ax in -500i32..500, ay in -500i32..500, bx in -500i32..500, by in -500i32..500) {
            let a = GridPos::new(ax, ay);
            let b = GridPos::new(bx, by);
            prop_assert_eq!(a.manhattan(b), b.manhattan(a));
            prop_assert!(a.distance_squared(b) >= 0);
        }
    }
}

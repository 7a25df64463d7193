//! Fine terrain blocks and the shared block grid.

use labyrinth_common::{Direction, GridPos};
use serde::{Deserialize, Serialize};

/// Set of closed sides on a cell or block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Walls(u8);

impl Walls {
    /// No closed side - bit pattern 0
    pub const NONE: Self = Self(0);
    /// Top side closed - bit 0
    pub const TOP: Self = Self(1 << 0);
    /// Right side closed - bit 1
    pub const RIGHT: Self = Self(1 << 1);
    /// Bottom side closed - bit 2
    pub const DOWN: Self = Self(1 << 2);
    /// Left side closed - bit 3
    pub const LEFT: Self = Self(1 << 3);
    /// Every side closed
    pub const ALL: Self = Self(0b1111);

    /// Flag for a single side.
    #[must_use]
    pub const fn side(direction: Direction) -> Self {
        match direction {
            Direction::Top => Self::TOP,
            Direction::Right => Self::RIGHT,
            Direction::Down => Self::DOWN,
            Direction::Left => Self::LEFT,
        }
    }

    /// Checks whether the given side is closed.
    #[must_use]
    pub const fn has(self, direction: Direction) -> bool {
        self.0 & Self::side(direction).0 != 0
    }

    /// Closes a side.
    pub fn close(&mut self, direction: Direction) {
        self.0 |= Self::side(direction).0;
    }

    /// Opens a side.
    pub fn open(&mut self, direction: Direction) {
        self.0 &= !Self::side(direction).0;
    }

    /// Checks whether no side is closed.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Terrain features carried by a block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Traits(u8);

impl Traits {
    /// Bare ground
    pub const NONE: Self = Self(0);
    /// Tree - bit 0
    pub const FOREST: Self = Self(1 << 0);
    /// Lava - bit 1
    pub const LAVA: Self = Self(1 << 1);
    /// River water - bit 2
    pub const RIVER: Self = Self(1 << 2);

    /// Checks whether every flag of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the flags of `other`.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the flags of `other`.
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Checks whether the block is bare ground.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Checks whether an agent may stand on a block with these traits.
    ///
    /// Only bare ground and plain river water are walkable; any forest or
    /// lava flag blocks the move, even when combined with river.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        self.0 == 0 || self.0 == Self::RIVER.0
    }

    /// Raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// A single terrain block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the block grid
    pub pos: GridPos,
    /// Closed sides, written only by the maze imprinter
    pub walls: Walls,
    /// Terrain features
    pub traits: Traits,
    /// Elevation in [0, 1]
    pub height: f64,
}

impl Block {
    /// Creates an open, featureless block at sea level.
    #[must_use]
    pub const fn new(pos: GridPos) -> Self {
        Self {
            pos,
            walls: Walls::NONE,
            traits: Traits::NONE,
            height: 0.0,
        }
    }
}

/// Row-major grid of blocks covering the whole map.
///
/// Created once at its final size; generation phases mutate blocks in place
/// but never resize the grid.
#[derive(Debug, Clone)]
pub struct BlockGrid {
    width: u32,
    height: u32,
    blocks: Vec<Block>,
}

impl BlockGrid {
    /// Creates a grid of open, featureless blocks.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let blocks = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Block::new(GridPos::new(x, y))))
            .collect();
        Self {
            width,
            height,
            blocks,
        }
    }

    /// Grid width in blocks.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in blocks.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Checks whether the grid has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Checks whether a position lies inside the grid.
    #[must_use]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Converts a position to an index into the block array.
    #[must_use]
    pub const fn index(&self, pos: GridPos) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width as usize + pos.x as usize)
        } else {
            None
        }
    }

    /// Converts an index back to a position.
    #[must_use]
    pub const fn pos_of(&self, index: usize) -> GridPos {
        GridPos::new(
            (index % self.width as usize) as i32,
            (index / self.width as usize) as i32,
        )
    }

    /// Gets the block at a position.
    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<&Block> {
        self.index(pos).and_then(|i| self.blocks.get(i))
    }

    /// Gets a mutable block at a position.
    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Block> {
        self.index(pos).and_then(move |i| self.blocks.get_mut(i))
    }

    /// Returns a slice of all blocks in row-major order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns a mutable slice of all blocks.
    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Traits at a position, or `None` outside the grid.
    #[must_use]
    pub fn traits(&self, pos: GridPos) -> Option<Traits> {
        self.get(pos).map(|b| b.traits)
    }

    /// Checks whether a wall stops a one-block move from `from` towards
    /// `direction`.
    ///
    /// The move is blocked when the departing block has a wall on the side
    /// of travel or the arriving block has a wall on the side facing back.
    /// Moves leaving the grid are always blocked.
    #[must_use]
    pub fn wall_blocks(&self, from: GridPos, direction: Direction) -> bool {
        let (Some(src), Some(dst)) = (self.get(from), self.get(from.step(direction))) else {
            return true;
        };
        src.walls.has(direction) || dst.walls.has(direction.opposite())
    }

    /// In-bounds 4-neighbours of a position, in the given direction order.
    pub fn neighbors4<'a>(
        &'a self,
        pos: GridPos,
        order: &'a [Direction],
    ) -> impl Iterator<Item = (Direction, GridPos)> + 'a {
        order
            .iter()
            .map(move |&d| (d, pos.step(d)))
            .filter(|&(_, p)| self.contains(p))
    }

    /// Number of blocks carrying every flag of `traits`.
    #[must_use]
    pub fn count_traits(&self, traits: Traits) -> usize {
        self.blocks
            .iter()
            .filter(|b| !traits.is_empty() && b.traits.contains(traits))
            .count()
    }
}

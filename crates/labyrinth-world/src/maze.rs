//! Perfect maze generation over the coarse cell grid.
//!
//! The maze is carved with a randomized depth-first backtracker driven by an
//! explicit stack. When the carver runs into a dead end it does not return
//! to the cell on top of the stack but removes the entry just below the top
//! and continues from there. That backtrack rule shapes the corridors and is
//! kept as is. It can discard a cell that still borders unvisited cells, so
//! if the stack ever runs dry the carver resumes from the first visited cell
//! (row-major) next to an unvisited one.

use labyrinth_common::{Direction, GridPos};
use tracing::debug;

use crate::block::Walls;

/// Neighbour scan order used while carving.
const CARVE_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Top,
    Direction::Down,
];

/// A coarse maze cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Position in the cell grid
    pub pos: GridPos,
    /// Closed sides, all closed before carving
    pub walls: Walls,
    /// Set once the carver has reached this cell
    pub visited: bool,
}

impl Cell {
    /// Creates a fully walled, unvisited cell.
    #[must_use]
    pub const fn new(pos: GridPos) -> Self {
        Self {
            pos,
            walls: Walls::ALL,
            visited: false,
        }
    }
}

/// Grid of maze cells.
#[derive(Debug, Clone)]
pub struct Maze {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Maze {
    /// Creates a maze with every wall closed.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let cells = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Cell::new(GridPos::new(x, y))))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Checks whether a position lies inside the maze.
    #[must_use]
    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Gets the cell at a position.
    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<&Cell> {
        self.index(pos).and_then(|i| self.cells.get(i))
    }

    fn get_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        self.index(pos).and_then(move |i| self.cells.get_mut(i))
    }

    fn is_visited(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|c| c.visited)
    }

    fn mark_visited(&mut self, pos: GridPos) {
        if let Some(cell) = self.get_mut(pos) {
            cell.visited = true;
        }
    }

    /// In-bounds, unvisited 4-neighbours of a cell.
    fn unvisited_neighbors(&self, pos: GridPos) -> Vec<(Direction, GridPos)> {
        CARVE_ORDER
            .iter()
            .map(|&d| (d, pos.step(d)))
            .filter(|&(_, p)| self.contains(p) && !self.is_visited(p))
            .collect()
    }

    /// Opens the wall shared by a cell and its neighbour in `direction`,
    /// on both sides.
    pub fn remove_wall(&mut self, pos: GridPos, direction: Direction) {
        let other = pos.step(direction);
        if !self.contains(pos) || !self.contains(other) {
            return;
        }
        if let Some(cell) = self.get_mut(pos) {
            cell.walls.open(direction);
        }
        if let Some(cell) = self.get_mut(other) {
            cell.walls.open(direction.opposite());
        }
    }

    /// Checks whether the passage from a cell towards `direction` is open.
    #[must_use]
    pub fn is_open(&self, pos: GridPos, direction: Direction) -> bool {
        self.contains(pos.step(direction))
            && self.get(pos).is_some_and(|c| !c.walls.has(direction))
    }

    /// Number of open passages between adjacent cells.
    #[must_use]
    pub fn open_passages(&self) -> usize {
        self.cells
            .iter()
            .map(|c| {
                usize::from(self.is_open(c.pos, Direction::Right))
                    + usize::from(self.is_open(c.pos, Direction::Down))
            })
            .sum()
    }

    /// First visited cell, in row-major order, that borders an unvisited one.
    fn hunt(&self) -> Option<GridPos> {
        self.cells
            .iter()
            .filter(|c| c.visited)
            .map(|c| c.pos)
            .find(|&p| !self.unvisited_neighbors(p).is_empty())
    }
}

/// Carves a perfect maze of `width` x `height` cells.
///
/// Every cell ends up visited and the open passages form a spanning tree
/// of the cell grid.
pub fn generate(width: u32, height: u32, rng: &mut fastrand::Rng) -> Maze {
    let mut maze = Maze::new(width, height);
    let total = maze.cells.len();
    if total == 0 {
        return maze;
    }

    let mut current = GridPos::new(0, 0);
    let mut stack = vec![current];
    let mut visited = 1;
    let mut hunts = 0usize;
    maze.mark_visited(current);

    while visited < total {
        let neighbors = maze.unvisited_neighbors(current);
        if neighbors.is_empty() {
            current = match backtrack(&mut stack) {
                Some(pos) => pos,
                None => match maze.hunt() {
                    Some(pos) => {
                        hunts += 1;
                        stack.push(pos);
                        pos
                    },
                    None => break,
                },
            };
            continue;
        }

        let (direction, next) = neighbors[rng.usize(..neighbors.len())];
        maze.remove_wall(current, direction);
        maze.mark_visited(next);
        visited += 1;
        stack.push(next);
        current = next;
    }

    debug!("Carved {width}x{height} maze ({hunts} hunt steps)");
    maze
}

/// Takes the next cell to resume from off the stack.
///
/// With more than one entry the second-from-top entry is removed and
/// returned; otherwise the sole entry is popped.
fn backtrack(stack: &mut Vec<GridPos>) -> Option<GridPos> {
    if stack.len() > 1 {
        Some(stack.remove(stack.len() - 2))
    } else {
        stack.pop()
    }
}

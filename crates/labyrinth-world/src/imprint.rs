//! Rasterizes maze walls onto the block grid.

use labyrinth_common::{Direction, GridPos};
use tracing::debug;

use crate::block::BlockGrid;
use crate::maze::Maze;

/// Closes block walls along every closed cell side.
///
/// Each cell covers a `blocks_in_cell` square of blocks. A closed side closes
/// the matching wall on every block along that edge, except on blocks that
/// carry a trait. Edges on the maze's outer boundary are closed regardless
/// of traits. Returns the number of block walls closed.
pub fn imprint_maze(maze: &Maze, grid: &mut BlockGrid, blocks_in_cell: u32) -> usize {
    let n = blocks_in_cell as i32;
    let mut closed = 0;

    for cell in maze.cells() {
        for direction in Direction::ALL {
            if !cell.walls.has(direction) {
                continue;
            }
            let boundary = !maze.contains(cell.pos.step(direction));
            for pos in edge_blocks(cell.pos, direction, n) {
                let Some(block) = grid.get_mut(pos) else {
                    continue;
                };
                if boundary || block.traits.is_empty() {
                    block.walls.close(direction);
                    closed += 1;
                }
            }
        }
    }

    debug!("Imprinted {closed} block walls from a {}x{} maze", maze.width(), maze.height());
    closed
}

/// Blocks along one side of a cell.
fn edge_blocks(cell: GridPos, direction: Direction, n: i32) -> impl Iterator<Item = GridPos> {
    let (left, top) = (cell.x * n, cell.y * n);
    let (right, bottom) = (left + n - 1, top + n - 1);
    (0..n).map(move |i| match direction {
        Direction::Top => GridPos::new(left + i, top),
        Direction::Down => GridPos::new(left + i, bottom),
        Direction::Left => GridPos::new(left, top + i),
        Direction::Right => GridPos::new(right, top + i),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Traits;
    use crate::maze;

    #[test]
    fn test_edge_blocks() {
        let top: Vec<GridPos> = edge_blocks(GridPos::new(1, 2), Direction::Top, 3).collect();
        assert_eq!(
            top,
            vec![GridPos::new(3, 6), GridPos::new(4, 6), GridPos::new(5, 6)]
        );
        let right: Vec<GridPos> = edge_blocks(GridPos::new(0, 0), Direction::Right, 2).collect();
        assert_eq!(right, vec![GridPos::new(1, 0), GridPos::new(1, 1)]);
    }

    #[test]
    fn test_closed_cell_fully_walled() {
        let maze = Maze::new(1, 1);
        let mut grid = BlockGrid::new(4, 4);
        let closed = imprint_maze(&maze, &mut grid, 4);
        assert_eq!(closed, 16);
        for y in 0..4 {
            let row_start = grid.get(GridPos::new(0, y)).expect("in bounds");
            assert!(row_start.walls.has(Direction::Left));
            let row_end = grid.get(GridPos::new(3, y)).expect("in bounds");
            assert!(row_end.walls.has(Direction::Right));
        }
        let inner = grid.get(GridPos::new(1, 1)).expect("in bounds");
        assert!(inner.walls.is_empty());
    }

    #[test]
    fn test_boundary_ignores_traits() {
        let maze = Maze::new(1, 1);
        let mut grid = BlockGrid::new(3, 3);
        for block in grid.blocks_mut() {
            block.traits.insert(Traits::LAVA);
        }
        imprint_maze(&maze, &mut grid, 3);
        let corner = grid.get(GridPos::new(0, 0)).expect("in bounds");
        assert!(corner.walls.has(Direction::Top));
        assert!(corner.walls.has(Direction::Left));
    }

    #[test]
    fn test_interior_walls_skip_featured_blocks() {
        // Two cells side by side, still separated by their shared wall.
        let maze = Maze::new(2, 1);
        let mut grid = BlockGrid::new(6, 3);
        grid.get_mut(GridPos::new(2, 1))
            .expect("in bounds")
            .traits
            .insert(Traits::FOREST);
        imprint_maze(&maze, &mut grid, 3);

        let featured = grid.get(GridPos::new(2, 1)).expect("in bounds");
        assert!(!featured.walls.has(Direction::Right));
        let bare = grid.get(GridPos::new(2, 0)).expect("in bounds");
        assert!(bare.walls.has(Direction::Right));
        let across = grid.get(GridPos::new(3, 1)).expect("in bounds");
        assert!(across.walls.has(Direction::Left));
    }

    #[test]
    fn test_open_passage_leaves_blocks_open() {
        let mut rng = fastrand::Rng::with_seed(3);
        let maze = maze::generate(1, 2, &mut rng);
        let mut grid = BlockGrid::new(2, 4);
        imprint_maze(&maze, &mut grid, 2);
        for x in 0..2 {
            let above = grid.get(GridPos::new(x, 1)).expect("in bounds");
            let below = grid.get(GridPos::new(x, 2)).expect("in bounds");
            assert!(!above.walls.has(Direction::Down));
            assert!(!below.walls.has(Direction::Top));
            assert!(!grid.wall_blocks(GridPos::new(x, 1), Direction::Down));
        }
    }

    #[test]
    fn test_boundary_closed_on_generated_maze() {
        let mut rng = fastrand::Rng::with_seed(12);
        let maze = maze::generate(6, 4, &mut rng);
        let mut grid = BlockGrid::new(24, 16);
        for block in grid.blocks_mut() {
            block.traits.insert(Traits::FOREST);
        }
        imprint_maze(&maze, &mut grid, 4);
        for x in 0..24 {
            assert!(grid.wall_blocks(GridPos::new(x, 0), Direction::Top));
            assert!(grid.wall_blocks(GridPos::new(x, 15), Direction::Down));
        }
        for y in 0..16 {
            assert!(grid.get(GridPos::new(0, y)).expect("in bounds").walls.has(Direction::Left));
            assert!(grid.get(GridPos::new(23, y)).expect("in bounds").walls.has(Direction::Right));
        }
    }
}

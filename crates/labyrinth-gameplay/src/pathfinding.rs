//! Breadth-first path finding over the block grid.
//!
//! The search is stateless: every call builds its own node arena and visited
//! set, so results always reflect the grid as it is now.

use std::collections::{HashSet, VecDeque};

use labyrinth_common::{Direction, GridPos};
use labyrinth_world::{BlockGrid, Traits};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Expansion order: +x, -x, +y, -y.
pub const SEARCH_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Top,
];

/// Trait for querying whether single-block moves are legal.
pub trait MoveQuery {
    /// Checks whether an agent standing on `from` may step towards
    /// `direction`, ignoring other agents.
    fn can_step(&self, from: GridPos, direction: Direction) -> bool;
}

impl MoveQuery for BlockGrid {
    fn can_step(&self, from: GridPos, direction: Direction) -> bool {
        if self.wall_blocks(from, direction) {
            return false;
        }
        self.traits(from.step(direction))
            .is_some_and(Traits::is_walkable)
    }
}

/// Search node; the parent is an index into the same arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathNode {
    pos: GridPos,
    parent: Option<usize>,
    depth: u32,
}

/// Result of a path search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Route to the nearest target, origin first; empty if none is reachable
    pub path: Vec<GridPos>,
    /// Route to the farthest reachable block when no target is reachable
    pub longest_path: Vec<GridPos>,
}

impl PathResult {
    /// Checks whether a target was reached.
    #[must_use]
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// The route an agent should follow: the target path if there is one,
    /// otherwise the longest path.
    #[must_use]
    pub fn route(&self) -> &[GridPos] {
        if self.found() {
            &self.path
        } else {
            &self.longest_path
        }
    }
}

/// Finds the shortest route from `origin` to any of `targets`.
///
/// Blocks in `blocked` (other agents' bodies, for instance) are never
/// entered. When no target is reachable, the result carries the route to
/// the first block discovered at the greatest depth instead.
pub fn find_path<G: MoveQuery>(
    grid: &G,
    origin: GridPos,
    blocked: &HashSet<GridPos>,
    targets: &HashSet<GridPos>,
) -> PathResult {
    let mut nodes = vec![PathNode {
        pos: origin,
        parent: None,
        depth: 0,
    }];
    let mut visited: HashSet<GridPos> = HashSet::from([origin]);
    let mut queue: VecDeque<usize> = VecDeque::from([0]);
    let mut deepest = 0;

    while let Some(current) = queue.pop_front() {
        let node = nodes[current];
        if targets.contains(&node.pos) {
            let path = trace(&nodes, current);
            debug!("Path from {origin} to {} of {} blocks", node.pos, path.len());
            return PathResult {
                path,
                longest_path: Vec::new(),
            };
        }

        for direction in SEARCH_ORDER {
            let next = node.pos.step(direction);
            if visited.contains(&next) || blocked.contains(&next) {
                continue;
            }
            if !grid.can_step(node.pos, direction) {
                continue;
            }
            visited.insert(next);
            nodes.push(PathNode {
                pos: next,
                parent: Some(current),
                depth: node.depth + 1,
            });
            let index = nodes.len() - 1;
            if nodes[index].depth > nodes[deepest].depth {
                deepest = index;
            }
            queue.push_back(index);
        }
    }

    let longest_path = trace(&nodes, deepest);
    debug!(
        "No target reachable from {origin}; longest path has {} blocks",
        longest_path.len()
    );
    PathResult {
        path: Vec::new(),
        longest_path,
    }
}

/// Ticks an agent needs to follow `route`: one per step, or
/// `speed_in_river` for each step onto river water.
#[must_use]
pub fn travel_ticks(grid: &BlockGrid, route: &[GridPos], speed_in_river: u32) -> u32 {
    route
        .iter()
        .skip(1)
        .map(|&pos| match grid.traits(pos) {
            Some(traits) if traits.contains(Traits::RIVER) => speed_in_river,
            _ => 1,
        })
        .sum()
}

/// Walks parent links back to the origin and returns the route origin first.
fn trace(nodes: &[PathNode], mut index: usize) -> Vec<GridPos> {
    let mut route = vec![nodes[index].pos];
    while let Some(parent) = nodes[index].parent {
        route.push(nodes[parent].pos);
        index = parent;
    }
    route.reverse();
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn targets(positions: &[GridPos]) -> HashSet<GridPos> {
        positions.iter().copied().collect()
    }

    fn assert_steps_legal(grid: &BlockGrid, route: &[GridPos]) {
        for pair in route.windows(2) {
            let direction = Direction::from_offset(pair[1].x - pair[0].x, pair[1].y - pair[0].y)
                .expect("adjacent steps");
            assert!(grid.can_step(pair[0], direction));
        }
    }

    #[test]
    fn test_open_grid_corner_to_corner() {
        let grid = BlockGrid::new(10, 10);
        let result = find_path(
            &grid,
            GridPos::new(0, 0),
            &HashSet::new(),
            &targets(&[GridPos::new(9, 9)]),
        );
        assert_eq!(result.path.len(), 19);
        assert_eq!(result.path.first(), Some(&GridPos::new(0, 0)));
        assert_eq!(result.path.last(), Some(&GridPos::new(9, 9)));
        assert!(result.longest_path.is_empty());
        assert_steps_legal(&grid, &result.path);
    }

    #[test]
    fn test_expansion_prefers_positive_x() {
        let grid = BlockGrid::new(10, 10);
        let result = find_path(
            &grid,
            GridPos::new(0, 0),
            &HashSet::new(),
            &targets(&[GridPos::new(2, 2)]),
        );
        // +x is expanded first, so the route runs along the top row first.
        assert_eq!(result.path[1], GridPos::new(1, 0));
        assert_eq!(result.path[2], GridPos::new(2, 0));
    }

    #[test]
    fn test_origin_is_target() {
        let grid = BlockGrid::new(3, 3);
        let origin = GridPos::new(1, 1);
        let result = find_path(&grid, origin, &HashSet::new(), &targets(&[origin]));
        assert_eq!(result.path, vec![origin]);
    }

    #[test]
    fn test_walled_pocket_falls_back_to_longest_path() {
        let mut grid = BlockGrid::new(10, 10);
        // Seal the first five blocks of the top row into a corridor.
        for x in 0..5 {
            let block = grid.get_mut(GridPos::new(x, 0)).expect("in bounds");
            block.walls.close(Direction::Down);
        }
        grid.get_mut(GridPos::new(4, 0))
            .expect("in bounds")
            .walls
            .close(Direction::Right);

        let result = find_path(
            &grid,
            GridPos::new(0, 0),
            &HashSet::new(),
            &targets(&[GridPos::new(9, 9)]),
        );
        assert!(!result.found());
        assert_eq!(result.longest_path.len(), 5);
        assert_eq!(result.longest_path.last(), Some(&GridPos::new(4, 0)));
        assert_eq!(result.route(), result.longest_path.as_slice());
    }

    #[test]
    fn test_arrival_wall_blocks_entry() {
        let mut grid = BlockGrid::new(2, 1);
        grid.get_mut(GridPos::new(1, 0))
            .expect("in bounds")
            .walls
            .close(Direction::Left);
        let result = find_path(
            &grid,
            GridPos::new(0, 0),
            &HashSet::new(),
            &targets(&[GridPos::new(1, 0)]),
        );
        assert!(!result.found());
        assert_eq!(result.longest_path, vec![GridPos::new(0, 0)]);
    }

    #[test]
    fn test_terrain_rules() {
        let mut grid = BlockGrid::new(3, 3);
        for y in 0..3 {
            grid.get_mut(GridPos::new(1, y))
                .expect("in bounds")
                .traits
                .insert(Traits::LAVA);
        }
        let goal = targets(&[GridPos::new(2, 1)]);
        let result = find_path(&grid, GridPos::new(0, 1), &HashSet::new(), &goal);
        assert!(!result.found());

        // A river bridge makes the column crossable.
        let bridge = grid.get_mut(GridPos::new(1, 1)).expect("in bounds");
        bridge.traits = Traits::RIVER;
        let result = find_path(&grid, GridPos::new(0, 1), &HashSet::new(), &goal);
        assert_eq!(result.path.len(), 3);
    }

    #[test]
    fn test_blocked_positions_avoided() {
        let grid = BlockGrid::new(3, 3);
        let blocked: HashSet<GridPos> = [GridPos::new(1, 0), GridPos::new(1, 1)].into();
        let result = find_path(
            &grid,
            GridPos::new(0, 0),
            &blocked,
            &targets(&[GridPos::new(2, 0)]),
        );
        assert_eq!(result.path.len(), 7);
        assert!(result.path.iter().all(|p| !blocked.contains(p)));
    }

    #[test]
    fn test_search_is_idempotent() {
        let mut grid = BlockGrid::new(8, 8);
        grid.get_mut(GridPos::new(3, 3))
            .expect("in bounds")
            .traits
            .insert(Traits::FOREST);
        let goal = targets(&[GridPos::new(7, 7), GridPos::new(0, 7)]);
        let first = find_path(&grid, GridPos::new(4, 0), &HashSet::new(), &goal);
        let second = find_path(&grid, GridPos::new(4, 0), &HashSet::new(), &goal);
        assert_eq!(first, second);
    }

    #[test]
    fn test_travel_ticks_slow_in_river() {
        let mut grid = BlockGrid::new(4, 1);
        grid.get_mut(GridPos::new(2, 0))
            .expect("in bounds")
            .traits
            .insert(Traits::RIVER);
        let route: Vec<GridPos> = (0..4).map(|x| GridPos::new(x, 0)).collect();
        assert_eq!(travel_ticks(&grid, &route, 3), 5);
        assert_eq!(travel_ticks(&grid, &route[..1], 3), 0);
    }

    proptest! {
        #[test]
        fn prop_open_grid_paths_are_shortest(
            width in 1u32..16,
            height in 1u32..16,
            seed in any::<u64>(),
        ) {
            let grid = BlockGrid::new(width, height);
            let mut rng = fastrand::Rng::with_seed(seed);
            let origin = GridPos::new(rng.i32(0..width as i32), rng.i32(0..height as i32));
            let goal = GridPos::new(rng.i32(0..width as i32), rng.i32(0..height as i32));

            let result = find_path(&grid, origin, &HashSet::new(), &targets(&[goal]));

            prop_assert_eq!(result.path.len() as u32, origin.manhattan(goal) + 1);
            prop_assert_eq!(result.path.first(), Some(&origin));
            prop_assert_eq!(result.path.last(), Some(&goal));
        }
    }
}

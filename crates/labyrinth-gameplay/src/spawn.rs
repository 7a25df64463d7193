//! Agent spawn selection.
//!
//! Agents start near the middle of the map, on a block with no walls and
//! no terrain features around it.

use labyrinth_common::{GridPos, NEIGHBOR_OFFSETS_8};
use labyrinth_world::BlockGrid;
use tracing::debug;

/// Finds the first clear spawn block in the central half of the map.
///
/// Columns are scanned left to right over `[W/4, 3W/4)`, and within each
/// column rows top to bottom over `[H/4, 3H/4)`. A block qualifies when it
/// has no walls and neither it nor any in-bounds 8-neighbour carries a
/// trait.
#[must_use]
pub fn find_spawn(grid: &BlockGrid) -> Option<GridPos> {
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    let spawn = (width / 4..width * 3 / 4)
        .flat_map(|x| (height / 4..height * 3 / 4).map(move |y| GridPos::new(x, y)))
        .find(|&pos| is_clear(grid, pos));

    match spawn {
        Some(pos) => debug!("Spawn block at {pos}"),
        None => debug!("No clear spawn block in the central region"),
    }
    spawn
}

fn is_clear(grid: &BlockGrid, pos: GridPos) -> bool {
    let Some(block) = grid.get(pos) else {
        return false;
    };
    if !block.walls.is_empty() || !block.traits.is_empty() {
        return false;
    }
    NEIGHBOR_OFFSETS_8
        .iter()
        .filter_map(|&(dx, dy)| grid.traits(pos.offset(dx, dy)))
        .all(|traits| traits.is_empty())
}

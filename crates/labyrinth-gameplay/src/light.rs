//! Line-of-sight light casting.
//!
//! A light source sends one ray per whole degree. Each ray advances one
//! block per unit of radius, rounding to the nearest block, and stops at the
//! grid edge, at a wall crossed between two consecutive blocks, or after
//! lighting a block that has any wall. Sides walled on the source block
//! keep every ray heading through them dark.

use std::collections::HashSet;

use labyrinth_common::{Direction, GridPos};
use labyrinth_world::{BlockGrid, Walls};
use tracing::debug;

/// Light radius used when none is configured.
pub const DEFAULT_LIGHT_RADIUS: u32 = 8;

/// Number of rays cast around the source.
const RAY_COUNT: u32 = 360;

/// Ray components below this magnitude count as zero.
const AXIS_EPSILON: f64 = 1e-9;

/// Returns every block lit by a source at `origin`.
///
/// The source block is lit only when a ray comes back to it. An origin
/// outside the grid lights nothing.
#[must_use]
pub fn cast_light(grid: &BlockGrid, origin: GridPos, radius: u32) -> HashSet<GridPos> {
    let mut lit = HashSet::new();
    let Some(source) = grid.get(origin) else {
        return lit;
    };

    for degree in 0..RAY_COUNT {
        let angle = f64::from(degree).to_radians();
        let (dx, dy) = (axis(angle.cos()), axis(angle.sin()));
        if leaves_through_wall(source.walls, dx, dy) {
            continue;
        }
        trace_ray(grid, origin, dx, dy, radius, &mut lit);
    }

    debug!("Light at {origin} reaches {} blocks", lit.len());
    lit
}

fn trace_ray(
    grid: &BlockGrid,
    origin: GridPos,
    dx: f64,
    dy: f64,
    radius: u32,
    lit: &mut HashSet<GridPos>,
) {
    let mut prev = origin;
    for r in 1..=radius {
        let pos = ray_point(origin, dx, dy, r);
        let Some(block) = grid.get(pos) else {
            break;
        };
        if r > 1 && crosses_wall(grid, prev, pos) {
            break;
        }
        lit.insert(pos);
        if !block.walls.is_empty() {
            break;
        }
        prev = pos;
    }
}

fn ray_point(origin: GridPos, dx: f64, dy: f64, r: u32) -> GridPos {
    let r = f64::from(r);
    origin.offset((dx * r).round() as i32, (dy * r).round() as i32)
}

fn axis(component: f64) -> f64 {
    if component.abs() < AXIS_EPSILON {
        0.0
    } else {
        component
    }
}

fn leaves_through_wall(walls: Walls, dx: f64, dy: f64) -> bool {
    (dy < 0.0 && walls.has(Direction::Top))
        || (dx > 0.0 && walls.has(Direction::Right))
        || (dy > 0.0 && walls.has(Direction::Down))
        || (dx < 0.0 && walls.has(Direction::Left))
}

/// Whether the step from `prev` to `next` crosses a wall on `prev`.
///
/// Diagonal steps check both axis sides.
fn crosses_wall(grid: &BlockGrid, prev: GridPos, next: GridPos) -> bool {
    let Some(block) = grid.get(prev) else {
        return false;
    };
    let horizontal = Direction::from_offset((next.x - prev.x).signum(), 0);
    let vertical = Direction::from_offset(0, (next.y - prev.y).signum());
    [horizontal, vertical]
        .into_iter()
        .flatten()
        .any(|direction| block.walls.has(direction))
}

//! River routing by steepest descent.
//!
//! Rivers start on the highest interior ground and repeatedly step to the
//! lowest eligible 4-neighbour. A step is eligible only onto featureless
//! ground outside lava territory that is not already hemmed in by the
//! river's own course.

use labyrinth_common::{Direction, GridPos};
use tracing::debug;

use crate::block::{BlockGrid, Traits};
use crate::config::RiverConfig;
use crate::territory::Territory;

/// Neighbour scan order; the first of several equally low neighbours wins.
const FLOW_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Top,
    Direction::Down,
];

/// Radius of the self-crowding check around a candidate step.
const CROWDING_RADIUS: u32 = 2;

/// Candidates near this many river blocks of the same course are rejected.
const CROWDING_LIMIT: usize = 4;

/// Outcome of river routing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiverStats {
    /// Sources selected on high ground
    pub sources: usize,
    /// Rivers kept, each from source to mouth
    pub rivers: Vec<Vec<GridPos>>,
    /// Rivers removed again for being too short
    pub rolled_back: usize,
}

/// Picks river sources: the highest interior blocks outside lava territory,
/// each at least `min_distance` (Manhattan) from every source already
/// chosen.
///
/// The interior excludes a tenth of the grid on every side.
#[must_use]
pub fn select_sources(grid: &BlockGrid, lava: &Territory, config: &RiverConfig) -> Vec<GridPos> {
    let margin_x = (grid.width() / 10) as i32;
    let margin_y = (grid.height() / 10) as i32;
    let (width, height) = (grid.width() as i32, grid.height() as i32);

    let mut candidates: Vec<(GridPos, f64)> = grid
        .blocks()
        .iter()
        .filter(|b| {
            (margin_x..width - margin_x).contains(&b.pos.x)
                && (margin_y..height - margin_y).contains(&b.pos.y)
        })
        .map(|b| (b.pos, b.height))
        .collect();
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut sources: Vec<GridPos> = Vec::new();
    for (pos, _) in candidates {
        if sources.len() >= config.count as usize {
            break;
        }
        let too_close = sources.iter().any(|s| s.manhattan(pos) < config.min_distance);
        if !too_close && !lava.contains(pos) {
            sources.push(pos);
        }
    }
    sources
}

/// Routes rivers from their sources, keeping only those that reach
/// `min_length` blocks.
pub fn route_rivers(grid: &mut BlockGrid, lava: &Territory, config: &RiverConfig) -> RiverStats {
    let sources = select_sources(grid, lava, config);
    let mut stats = RiverStats {
        sources: sources.len(),
        ..RiverStats::default()
    };

    for source in sources {
        let path = trace_river(grid, lava, source, config.max_length as usize);
        // A source already claimed by another feature yields no river at all.
        if path.is_empty() || path.len() < config.min_length as usize {
            for pos in &path {
                if let Some(block) = grid.get_mut(*pos) {
                    block.traits.remove(Traits::RIVER);
                }
            }
            stats.rolled_back += 1;
        } else {
            stats.rivers.push(path);
        }
    }

    debug!(
        "Routed {} rivers from {} sources ({} rolled back)",
        stats.rivers.len(),
        stats.sources,
        stats.rolled_back
    );
    stats
}

/// Walks downhill from `source`, marking river blocks as it goes.
fn trace_river(
    grid: &mut BlockGrid,
    lava: &Territory,
    source: GridPos,
    max_length: usize,
) -> Vec<GridPos> {
    let mut path: Vec<GridPos> = Vec::new();
    let mut current = Some(source);

    while let Some(pos) = current {
        if path.len() >= max_length {
            break;
        }
        let Some(block) = grid.get_mut(pos) else {
            break;
        };
        if !block.traits.is_empty() || lava.contains(pos) {
            break;
        }
        block.traits.insert(Traits::RIVER);
        path.push(pos);

        current = lowest_open_neighbor(grid, lava, pos, &path);
    }
    path
}

fn lowest_open_neighbor(
    grid: &BlockGrid,
    lava: &Territory,
    pos: GridPos,
    path: &[GridPos],
) -> Option<GridPos> {
    let mut best: Option<(GridPos, f64)> = None;
    for (_, next) in grid.neighbors4(pos, &FLOW_ORDER) {
        let Some(block) = grid.get(next) else {
            continue;
        };
        if !block.traits.is_empty() || lava.contains(next) {
            continue;
        }
        let crowding = path
            .iter()
            .filter(|p| p.manhattan(next) <= CROWDING_RADIUS)
            .count();
        if crowding >= CROWDING_LIMIT {
            continue;
        }
        if best.map_or(true, |(_, h)| block.height < h) {
            best = Some((next, block.height));
        }
    }
    best.map(|(p, _)| p)
}

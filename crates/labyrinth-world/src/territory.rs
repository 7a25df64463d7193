//! Territories and the features grown inside them.
//!
//! A territory is the set of blocks covered by the circles of one region
//! category. Forest territories are dotted with trees in loose pairs, lava
//! territories are carved into separate lakes.

use std::collections::HashSet;

use labyrinth_common::{GridPos, NEIGHBOR_OFFSETS_8};
use tracing::debug;

use crate::block::{BlockGrid, Traits};
use crate::config::RegionSpec;
use crate::regions::{Circle, RegionCategory};

/// Random draws allowed per territory block in a fill loop.
const ATTEMPTS_PER_BLOCK: usize = 64;

/// Lake seeds must sit farther than this from every committed lake.
const LAKE_SEED_CLEARANCE: u32 = 5;

/// Blocks added while a lake grows must sit farther than this from every
/// committed lake.
const LAKE_GROWTH_CLEARANCE: u32 = 4;

/// Frontier expansion rounds without growth before the frontier is frozen.
const MAX_STALE_ROUNDS: usize = 256;

/// Blocks belonging to one region category.
#[derive(Debug, Clone)]
pub struct Territory {
    category: RegionCategory,
    members: Vec<GridPos>,
    mask: Vec<bool>,
    width: u32,
}

impl Territory {
    /// Creates an empty territory sized for `grid`.
    #[must_use]
    pub fn new(category: RegionCategory, grid: &BlockGrid) -> Self {
        Self {
            category,
            members: Vec::new(),
            mask: vec![false; grid.len()],
            width: grid.width(),
        }
    }

    /// Rasterizes every circle of `category` into a territory.
    ///
    /// A block belongs to a circle when `(x - cx)^2 + (y - cy)^2 <= r^2`;
    /// parts of circles outside the grid are clipped.
    #[must_use]
    pub fn from_circles(category: RegionCategory, circles: &[Circle], grid: &BlockGrid) -> Self {
        let mut territory = Self::new(category, grid);
        for circle in circles.iter().filter(|c| c.category == category) {
            let r = circle.radius as i32;
            let r2 = i64::from(circle.radius) * i64::from(circle.radius);
            let c = circle.center;
            for y in (c.y - r).max(0)..=(c.y + r).min(grid.height() as i32 - 1) {
                for x in (c.x - r).max(0)..=(c.x + r).min(grid.width() as i32 - 1) {
                    let pos = GridPos::new(x, y);
                    if pos.distance_squared(c) <= r2 {
                        territory.insert(pos, grid);
                    }
                }
            }
        }
        territory
    }

    /// Adds a block; returns `false` if it was already a member or lies
    /// outside the grid.
    pub fn insert(&mut self, pos: GridPos, grid: &BlockGrid) -> bool {
        let Some(index) = grid.index(pos) else {
            return false;
        };
        if self.mask[index] {
            return false;
        }
        self.mask[index] = true;
        self.members.push(pos);
        true
    }

    /// Region category of the territory.
    #[must_use]
    pub const fn category(&self) -> RegionCategory {
        self.category
    }

    /// Checks membership.
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        if pos.x < 0 || pos.y < 0 || pos.x as u32 >= self.width {
            return false;
        }
        let index = pos.y as usize * self.width as usize + pos.x as usize;
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// Member blocks in insertion order.
    #[must_use]
    pub fn members(&self) -> &[GridPos] {
        &self.members
    }

    /// Number of member blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Checks whether the territory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Picks a uniformly random member.
    fn choose(&self, rng: &mut fastrand::Rng) -> Option<GridPos> {
        if self.members.is_empty() {
            return None;
        }
        Some(self.members[rng.usize(..self.members.len())])
    }

    /// Members among the eight blocks around `pos`.
    fn neighbors8(&self, pos: GridPos) -> Vec<GridPos> {
        NEIGHBOR_OFFSETS_8
            .iter()
            .map(|&(dx, dy)| pos.offset(dx, dy))
            .filter(|&p| self.contains(p))
            .collect()
    }
}

/// Outcome of the forest fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForestStats {
    /// Trees placed by the spaced, paired pass
    pub paired: usize,
    /// Trees in total
    pub trees: usize,
}

/// Plants trees over `fill_pct` of the forest territory.
///
/// The first pass picks a random territory block and tries to plant two of
/// its neighbours, skipping any candidate that already has a tree in its
/// 8-neighbourhood; it runs until three quarters of the target is reached.
/// The second pass tops up with uniformly random blocks, ignoring spacing.
pub fn plant_forest(
    grid: &mut BlockGrid,
    territory: &Territory,
    fill_pct: f64,
    rng: &mut fastrand::Rng,
) -> ForestStats {
    let target = territory.len() as f64 * fill_pct;
    let paired_target = target * 0.75;
    let budget = territory.len() * ATTEMPTS_PER_BLOCK;
    let mut trees = plant_spaced_pairs(grid, territory, paired_target, budget, rng);
    let paired = trees.len();

    let mut attempts = 0;
    while (trees.len() as f64) < target && attempts < budget {
        attempts += 1;
        if let Some(block) = territory.choose(rng) {
            plant(grid, &mut trees, block);
        }
    }

    debug!(
        "Planted {} trees ({} paired) over {} forest blocks",
        trees.len(),
        paired,
        territory.len()
    );
    ForestStats {
        paired,
        trees: trees.len(),
    }
}

/// Plants up to two trees around randomly chosen territory blocks, never
/// next to an existing tree, until `goal` trees stand or `budget` draws are
/// spent.
fn plant_spaced_pairs(
    grid: &mut BlockGrid,
    territory: &Territory,
    goal: f64,
    budget: usize,
    rng: &mut fastrand::Rng,
) -> HashSet<GridPos> {
    let mut trees: HashSet<GridPos> = HashSet::new();
    let mut attempts = 0;
    while (trees.len() as f64) < goal && attempts < budget {
        attempts += 1;
        let Some(block) = territory.choose(rng) else {
            break;
        };
        if trees.contains(&block) {
            continue;
        }
        let near = territory.neighbors8(block);
        if near.is_empty() {
            continue;
        }
        for _ in 0..2 {
            let tree = near[rng.usize(..near.len())];
            if has_tree_nearby(tree, &trees) {
                break;
            }
            plant(grid, &mut trees, tree);
        }
    }
    trees
}

fn plant(grid: &mut BlockGrid, trees: &mut HashSet<GridPos>, pos: GridPos) {
    if let Some(block) = grid.get_mut(pos) {
        block.traits.insert(Traits::FOREST);
        trees.insert(pos);
    }
}

fn has_tree_nearby(pos: GridPos, trees: &HashSet<GridPos>) -> bool {
    NEIGHBOR_OFFSETS_8
        .iter()
        .any(|&(dx, dy)| trees.contains(&pos.offset(dx, dy)))
}

/// Outcome of lava lake carving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LavaStats {
    /// Committed lakes, each in growth order
    pub lakes: Vec<Vec<GridPos>>,
    /// Lakes abandoned for being too small
    pub discarded: usize,
    /// Blocks visited by any lake walk, committed or not
    pub claimed: usize,
}

impl LavaStats {
    /// Total lava blocks across committed lakes.
    #[must_use]
    pub fn lava_blocks(&self) -> usize {
        self.lakes.iter().map(Vec::len).sum()
    }
}

/// Carves lava lakes until `fill_pct` of the territory has been claimed.
///
/// Each lake starts from an unclaimed, featureless seed well away from
/// existing lakes. A frontier of nearby territory blocks is grown around the
/// seed, then the lake walks through the frontier, always stepping to the
/// nearest eligible block. Lakes that stay below `min_lake_size` are dropped
/// without touching the grid, but their blocks stay claimed.
pub fn carve_lava_lakes(
    grid: &mut BlockGrid,
    territory: &Territory,
    spec: &RegionSpec,
    rng: &mut fastrand::Rng,
) -> LavaStats {
    let target = territory.len() as f64 * spec.fill_pct;
    let max_size = spec.max_lake_size as usize;
    let min_size = spec.min_lake_size as usize;
    let budget = territory.len() * ATTEMPTS_PER_BLOCK;
    let mut claimed: HashSet<GridPos> = HashSet::new();
    let mut stats = LavaStats::default();

    let mut attempts = 0;
    while (claimed.len() as f64) < target && attempts < budget && max_size > 0 {
        attempts += 1;
        let Some(seed) = territory.choose(rng) else {
            break;
        };
        let bare = grid.traits(seed).is_some_and(Traits::is_empty);
        if claimed.contains(&seed) || !bare {
            continue;
        }
        if lake_within(seed, &stats.lakes, LAKE_SEED_CLEARANCE) {
            continue;
        }

        let mut frontier = grow_frontier(seed, territory, max_size * 2, rng);
        frontier.retain(|&p| p != seed);

        let mut lake = vec![seed];
        claimed.insert(seed);
        let mut current = seed;
        while lake.len() < max_size {
            let candidates: Vec<GridPos> = frontier
                .iter()
                .copied()
                .filter(|p| {
                    !claimed.contains(p)
                        && grid.traits(*p).is_some_and(Traits::is_empty)
                        && !lake_within(*p, &stats.lakes, LAKE_GROWTH_CLEARANCE)
                })
                .collect();
            let Some(next) = nearest(current, &candidates, rng) else {
                break;
            };
            frontier.retain(|&p| p != next);
            claimed.insert(next);
            lake.push(next);
            current = next;
        }

        if lake.len() >= min_size {
            for &pos in &lake {
                if let Some(block) = grid.get_mut(pos) {
                    block.traits.insert(Traits::LAVA);
                }
            }
            stats.lakes.push(lake);
        } else {
            stats.discarded += 1;
        }
    }

    stats.claimed = claimed.len();
    debug!(
        "Carved {} lava lakes ({} blocks, {} discarded) over {} lava blocks",
        stats.lakes.len(),
        stats.lava_blocks(),
        stats.discarded,
        territory.len()
    );
    stats
}

/// Grows a set of territory blocks around `seed` by repeatedly merging the
/// 8-neighbours of a random member, until it holds more than `limit` blocks
/// or stops growing. The seed itself is the last entry.
fn grow_frontier(
    seed: GridPos,
    territory: &Territory,
    limit: usize,
    rng: &mut fastrand::Rng,
) -> Vec<GridPos> {
    let mut order: Vec<GridPos> = Vec::new();
    let mut members: HashSet<GridPos> = HashSet::new();
    for p in territory.neighbors8(seed) {
        if members.insert(p) {
            order.push(p);
        }
    }

    let mut stale = 0;
    while !order.is_empty() && order.len() <= limit && stale < MAX_STALE_ROUNDS {
        let pick = order[rng.usize(..order.len())];
        let before = order.len();
        for p in territory.neighbors8(pick) {
            if members.insert(p) {
                order.push(p);
            }
        }
        stale = if order.len() == before { stale + 1 } else { 0 };
    }

    if members.insert(seed) {
        order.push(seed);
    }
    order
}

/// Candidate closest to `from` by Manhattan distance, ties broken at random.
fn nearest(from: GridPos, candidates: &[GridPos], rng: &mut fastrand::Rng) -> Option<GridPos> {
    let best = candidates.iter().map(|p| from.manhattan(*p)).min()?;
    let ties: Vec<GridPos> = candidates
        .iter()
        .copied()
        .filter(|p| from.manhattan(*p) == best)
        .collect();
    Some(ties[rng.usize(..ties.len())])
}

fn lake_within(pos: GridPos, lakes: &[Vec<GridPos>], distance: u32) -> bool {
    lakes
        .iter()
        .flatten()
        .any(|lava| pos.manhattan(*lava) <= distance)
}

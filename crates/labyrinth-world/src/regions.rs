//! Rejection-sampled placement of circular regions.

use labyrinth_common::GridPos;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RegionSpec;

/// Placement attempts spent on a single quota slot before giving up on it.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Kind of region a circle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionCategory {
    /// Forest stand
    Forest,
    /// Lava field
    Lava,
}

impl RegionCategory {
    /// All categories in placement order.
    pub const ALL: [Self; 2] = [Self::Forest, Self::Lava];

    /// Configuration key of the category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Forest => "forest",
            Self::Lava => "lava",
        }
    }
}

/// A placed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    /// Region kind
    pub category: RegionCategory,
    /// Center block
    pub center: GridPos,
    /// Radius in blocks
    pub radius: u32,
}

impl Circle {
    /// Checks whether two circles sit too close to share the map.
    ///
    /// Circles collide when their centers are at most `r1 + r2 + 1` apart,
    /// which keeps at least one free block between touching regions.
    #[must_use]
    pub const fn collides(&self, other: &Self) -> bool {
        let reach = (self.radius + other.radius + 1) as i64;
        self.center.distance_squared(other.center) <= reach * reach
    }
}

/// Places circles for every category, round-robin, until each quota is
/// either filled or abandoned.
///
/// Each quota slot gets [`MAX_PLACEMENT_ATTEMPTS`] random draws; a slot whose
/// draws all collide is dropped. Only circles of different categories are
/// tested against each other, so same-category circles may overlap. Callers
/// must ensure `2 * max_radius` fits both grid dimensions.
pub fn place_regions(
    categories: &[(RegionCategory, &RegionSpec)],
    grid_width: u32,
    grid_height: u32,
    rng: &mut fastrand::Rng,
) -> Vec<Circle> {
    let mut remaining: Vec<u32> = categories.iter().map(|(_, spec)| spec.count).collect();
    let mut circles: Vec<Circle> = Vec::new();
    let mut dropped = 0u32;

    while remaining.iter().any(|&n| n > 0) {
        for (slot, &(category, spec)) in categories.iter().enumerate() {
            if remaining[slot] == 0 {
                continue;
            }
            remaining[slot] -= 1;

            let placed = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
                let candidate = random_circle(category, spec, grid_width, grid_height, rng);
                let blocked = circles
                    .iter()
                    .any(|c| c.category != category && c.collides(&candidate));
                (!blocked).then_some(candidate)
            });

            match placed {
                Some(circle) => circles.push(circle),
                None => dropped += 1,
            }
        }
    }

    debug!(
        "Placed {} regions ({} quota slots dropped)",
        circles.len(),
        dropped
    );
    circles
}

fn random_circle(
    category: RegionCategory,
    spec: &RegionSpec,
    grid_width: u32,
    grid_height: u32,
    rng: &mut fastrand::Rng,
) -> Circle {
    let radius = rng.u32(spec.min_radius..=spec.max_radius);
    let x = rng.u32(radius..=grid_width.saturating_sub(radius).max(radius));
    let y = rng.u32(radius..=grid_height.saturating_sub(radius).max(radius));
    Circle {
        category,
        center: GridPos::new(x as i32, y as i32),
        radius,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn spec(count: u32, min_radius: u32, max_radius: u32) -> RegionSpec {
        RegionSpec {
            count,
            min_radius,
            max_radius,
            ..RegionSpec::default()
        }
    }

    #[test]
    fn test_collision_threshold_inclusive() {
        let a = Circle {
            category: RegionCategory::Forest,
            center: GridPos::new(0, 0),
            radius: 2,
        };
        let touching = Circle {
            category: RegionCategory::Lava,
            center: GridPos::new(6, 0),
            radius: 3,
        };
        let clear = Circle {
            center: GridPos::new(7, 0),
            ..touching
        };
        assert!(a.collides(&touching));
        assert!(!a.collides(&clear));
    }

    #[test]
    fn test_quota_filled_on_roomy_grid() {
        let forest = spec(3, 2, 4);
        let lava = spec(2, 2, 4);
        let mut rng = fastrand::Rng::with_seed(9);
        let circles = place_regions(
            &[(RegionCategory::Forest, &forest), (RegionCategory::Lava, &lava)],
            200,
            200,
            &mut rng,
        );
        let forests = circles
            .iter()
            .filter(|c| c.category == RegionCategory::Forest)
            .count();
        assert_eq!(forests, 3);
        assert_eq!(circles.len(), 5);
    }

    #[test]
    fn test_same_category_may_overlap() {
        // A 10x10 grid with radius 5 pins every center to (5, 5).
        let forest = spec(4, 5, 5);
        let mut rng = fastrand::Rng::with_seed(1);
        let circles = place_regions(&[(RegionCategory::Forest, &forest)], 10, 10, &mut rng);
        assert_eq!(circles.len(), 4);
        assert!(circles.iter().all(|c| c.center == GridPos::new(5, 5)));
    }

    #[test]
    fn test_impossible_quota_underfills() {
        let forest = spec(1, 5, 5);
        let lava = spec(3, 5, 5);
        let mut rng = fastrand::Rng::with_seed(4);
        let circles = place_regions(
            &[(RegionCategory::Forest, &forest), (RegionCategory::Lava, &lava)],
            10,
            10,
            &mut rng,
        );
        assert_eq!(circles.len(), 1);
        assert_eq!(circles[0].category, RegionCategory::Forest);
    }

    #[test]
    fn test_centers_respect_margin() {
        let forest = spec(20, 1, 6);
        let mut rng = fastrand::Rng::with_seed(77);
        let circles = place_regions(&[(RegionCategory::Forest, &forest)], 40, 30, &mut rng);
        for c in circles {
            let r = c.radius as i32;
            assert!(c.center.x >= r && c.center.x <= 40 - r);
            assert!(c.center.y >= r && c.center.y <= 30 - r);
        }
    }

    proptest! {
        #[test]
        fn prop_different_categories_never_collide(seed in any::<u64>(), forests in 0u32..6, lavas in 0u32..6) {
            let forest = spec(forests, 2, 6);
            let lava = spec(lavas, 2, 6);
            let mut rng = fastrand::Rng::with_seed(seed);
            let circles = place_regions(
                &[(RegionCategory::Forest, &forest), (RegionCategory::Lava, &lava)],
                60,
                60,
                &mut rng,
            );
            prop_assert!(circles.len() <= (forests + lavas) as usize);
            for (i, a) in circles.iter().enumerate() {
                for b in &circles[i + 1..] {
                    if a.category != b.category {
                        prop_assert!(!a.collides(b));
                    }
                }
            }
        }
    }
}

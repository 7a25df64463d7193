//! Plain-text rendering of a generated world.

use std::collections::HashSet;
use std::fmt::Write;

use labyrinth_common::GridPos;
use labyrinth_world::{Block, BlockGrid, Traits};

/// Renders the grid one character per block, overlaying an agent route.
///
/// `S` spawn, `X` target, `o` route, `%` lava, `^` forest, `~` river,
/// `+` block with walls, `.` open ground.
#[must_use]
pub fn render(
    grid: &BlockGrid,
    route: &[GridPos],
    spawn: GridPos,
    target: Option<GridPos>,
) -> String {
    let on_route: HashSet<GridPos> = route.iter().copied().collect();
    let mut out = String::with_capacity(grid.len() + grid.height() as usize);

    for row in grid.blocks().chunks(grid.width().max(1) as usize) {
        for block in row {
            let glyph = if block.pos == spawn {
                'S'
            } else if Some(block.pos) == target {
                'X'
            } else if on_route.contains(&block.pos) {
                'o'
            } else {
                terrain_glyph(block)
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// Per-feature block counts, one line each.
#[must_use]
pub fn legend(grid: &BlockGrid) -> String {
    let mut out = String::new();
    for (name, traits) in [
        ("forest", Traits::FOREST),
        ("lava", Traits::LAVA),
        ("river", Traits::RIVER),
    ] {
        let _ = writeln!(out, "{name}: {}", grid.count_traits(traits));
    }
    out
}

fn terrain_glyph(block: &Block) -> char {
    if block.traits.contains(Traits::LAVA) {
        '%'
    } else if block.traits.contains(Traits::FOREST) {
        '^'
    } else if block.traits.contains(Traits::RIVER) {
        '~'
    } else if !block.walls.is_empty() {
        '+'
    } else {
        '.'
    }
}

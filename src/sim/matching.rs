//! Group matching, gravity and chain scoring
//!
//! After a lock the board is resolved in passes: clear every same-color
//! group at or above the minimum size, compact the columns, repeat. Each pass
//! that clears something is one chain step.

use glam::IVec2;
use serde::Serialize;
use std::collections::VecDeque;

use super::grid::{Cell, Grid};
use crate::config::ScoringConfig;

const NEIGHBOURS_4: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

/// One cleared group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearedGroup {
    pub color: Cell,
    pub cells: Vec<IVec2>,
}

/// Outcome of a single resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Removal {
    /// Total cells cleared this pass
    pub removed: usize,
    /// Number of groups cleared this pass
    pub groups: usize,
    /// The cleared groups, in discovery (row-major seed) order
    pub cleared: Vec<ClearedGroup>,
}

/// A scored pass within a cascade
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    /// 1 for the first pass after a lock
    pub chain: u32,
    pub removal: Removal,
    pub points: u64,
}

/// Collect the 4-connected same-color group containing `seed`.
///
/// Cells already marked in `visited` are skipped; every cell of the returned
/// group is marked.
pub fn flood_fill(grid: &Grid, seed: IVec2, visited: &mut [bool]) -> Vec<IVec2> {
    let Some(color) = grid.get(seed).filter(|c| !c.is_empty()) else {
        return Vec::new();
    };
    let width = grid.width() as i32;
    let idx = |p: IVec2| (p.y * width + p.x) as usize;

    let mut group = Vec::new();
    let mut queue = VecDeque::from([seed]);
    visited[idx(seed)] = true;

    while let Some(pos) = queue.pop_front() {
        group.push(pos);
        for dir in NEIGHBOURS_4 {
            let next = pos + dir;
            if grid.get(next) == Some(color) && !visited[idx(next)] {
                visited[idx(next)] = true;
                queue.push_back(next);
            }
        }
    }
    group
}

/// Run one resolution pass: clear every group of at least `min_group` cells
pub fn resolve_once(grid: &mut Grid, min_group: usize) -> Removal {
    assert!(min_group > 0, "minimum group size must be positive");
    let (width, height) = (grid.width(), grid.height());
    let mut visited = vec![false; width * height];
    let mut removal = Removal::default();

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let pos = IVec2::new(x, y);
            if visited[(y as usize) * width + x as usize] || !grid.is_occupied(pos) {
                continue;
            }
            let color = grid.get(pos).unwrap_or_default();
            let group = flood_fill(grid, pos, &mut visited);
            if group.len() >= min_group {
                for &cell in &group {
                    grid.set(cell, Cell::Empty);
                }
                removal.removed += group.len();
                removal.groups += 1;
                removal.cleared.push(ClearedGroup { color, cells: group });
            }
        }
    }
    removal
}

/// Compact each column downward, keeping relative order
pub fn apply_gravity(grid: &mut Grid) {
    let height = grid.height() as i32;
    for x in 0..grid.width() as i32 {
        let mut write = height - 1;
        for y in (0..height).rev() {
            let pos = IVec2::new(x, y);
            let cell = grid.get(pos).unwrap_or_default();
            if cell.is_empty() {
                continue;
            }
            if write != y {
                grid.set(IVec2::new(x, write), cell);
                grid.set(pos, Cell::Empty);
            }
            write -= 1;
        }
    }
}

/// Points for one pass
pub fn score_pass(scoring: &ScoringConfig, removed: usize, chain: u32, groups: usize, level: u32) -> u64 {
    assert!(chain >= 1, "chain index starts at 1");
    let removed = removed as u64;
    let groups = groups as u64;

    let base = removed.saturating_mul(removed).saturating_mul(scoring.base);
    let chain_bonus = if chain < 2 {
        0
    } else {
        1u64.checked_shl(chain - 1)
            .unwrap_or(u64::MAX)
            .saturating_mul(scoring.chain)
    };
    let group_bonus = if groups <= 1 {
        0
    } else {
        groups.saturating_mul(groups).saturating_mul(scoring.group)
    };
    let mass_bonus = if removed < scoring.mass_threshold {
        0
    } else {
        (removed - scoring.mass_threshold + 1).saturating_mul(scoring.mass)
    };
    let level_bonus = u64::from(level).saturating_mul(scoring.level);

    base.saturating_add(chain_bonus)
        .saturating_add(group_bonus)
        .saturating_add(mass_bonus)
        .saturating_add(level_bonus)
}

/// Resolve the board to quiescence.
///
/// Returns every scoring pass in order; empty when the lock cleared nothing.
/// The final, empty pass neither applies gravity nor counts as a chain step.
pub fn run_cascade(grid: &mut Grid, min_group: usize, scoring: &ScoringConfig, level: u32) -> Vec<ChainStep> {
    let mut steps = Vec::new();
    let mut chain = 1u32;
    let mut removal = resolve_once(grid, min_group);

    while removal.removed > 0 {
        let points = score_pass(scoring, removal.removed, chain, removal.groups, level);
        log::debug!(
            "chain {}: cleared {} cells in {} groups (+{})",
            chain,
            removal.removed,
            removal.groups,
            points
        );
        steps.push(ChainStep {
            chain,
            removal,
            points,
        });
        apply_gravity(grid);
        chain += 1;
        removal = resolve_once(grid, min_group);
    }
    steps
}

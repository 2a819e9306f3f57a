//! Fall speed, level curve and game over

use std::time::Duration;

use super::grid::Grid;
use crate::config::ProgressionConfig;

/// Fall interval for `level` (1-based), clamped to the table's last entry
pub fn fall_interval(progression: &ProgressionConfig, level: u32) -> Duration {
    let table = &progression.fall_table_ms;
    assert!(!table.is_empty(), "fall table must not be empty");
    let idx = (level.max(1) as usize - 1).min(table.len() - 1);
    Duration::from_millis(table[idx])
}

/// Level earned by `score`: one per `level_score_step`, capped at `max_level`
pub fn level_for_score(progression: &ProgressionConfig, score: u64) -> u32 {
    let earned = (score / progression.level_score_step).saturating_add(1);
    earned.min(u64::from(progression.max_level)) as u32
}

/// True once the check row holds any cell
pub fn is_game_over(grid: &Grid, check_row: usize) -> bool {
    grid.row_occupied(check_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::Cell;
    use glam::IVec2;
    use proptest::prelude::*;

    #[test]
    fn test_fall_interval_clamps() {
        let progression = ProgressionConfig::default();
        let table = &progression.fall_table_ms;
        assert_eq!(fall_interval(&progression, 1), Duration::from_millis(table[0]));
        assert_eq!(fall_interval(&progression, 2), Duration::from_millis(table[1]));
        let last = Duration::from_millis(*table.last().unwrap());
        assert_eq!(fall_interval(&progression, table.len() as u32), last);
        assert_eq!(fall_interval(&progression, 99), last);
    }

    #[test]
    fn test_fall_interval_strictly_faster() {
        let progression = ProgressionConfig::default();
        for level in 1..progression.fall_table_ms.len() as u32 {
            assert!(fall_interval(&progression, level + 1) < fall_interval(&progression, level));
        }
    }

    #[test]
    fn test_level_for_score() {
        let progression = ProgressionConfig {
            fall_table_ms: vec![500],
            max_level: 5,
            level_score_step: 1000,
        };
        assert_eq!(level_for_score(&progression, 0), 1);
        assert_eq!(level_for_score(&progression, 999), 1);
        assert_eq!(level_for_score(&progression, 1000), 2);
        assert_eq!(level_for_score(&progression, 4500), 5);
        assert_eq!(level_for_score(&progression, u64::MAX), 5);
    }

    #[test]
    fn test_game_over_row() {
        let mut grid = Grid::new(6, 12);
        assert!(!is_game_over(&grid, 1));
        grid.set(IVec2::new(0, 0), Cell::Red);
        assert!(!is_game_over(&grid, 1));
        grid.set(IVec2::new(5, 1), Cell::Red);
        assert!(is_game_over(&grid, 1));
    }

    proptest! {
        #[test]
        fn prop_level_monotonic_and_bounded(a in any::<u64>(), b in any::<u64>()) {
            let progression = ProgressionConfig::default();
            let (lo, hi) = (a.min(b), a.max(b));
            prop_assert!(level_for_score(&progression, lo) <= level_for_score(&progression, hi));
            prop_assert!(level_for_score(&progression, hi) <= progression.max_level);
        }
    }
}

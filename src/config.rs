//! Engine configuration
//!
//! Board size, scoring constants, timings and the level table. Loaded from
//! JSON; any field left out keeps its default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::sim::Cell;

/// Reasons a configuration is rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("grid must be at least 1x2, got {columns}x{rows}")]
    Dimensions { columns: usize, rows: usize },
    #[error("color_count must be within 1..={max}, got {got}")]
    ColorCount { got: usize, max: usize },
    #[error("min_group_size must be positive")]
    MinGroupSize,
    #[error("spawn column {column} is outside a {columns}-wide grid")]
    SpawnColumn { column: usize, columns: usize },
    #[error("game over row {row} is outside a {rows}-tall grid")]
    GameOverRow { row: usize, rows: usize },
    #[error("fall table must not be empty")]
    EmptyFallTable,
    #[error("fall table must be strictly decreasing and non-zero")]
    FallTableOrder,
    #[error("max_level must be positive")]
    MaxLevel,
    #[error("level_score_step must be positive")]
    LevelScoreStep,
    #[error("DAS delays must be non-zero")]
    DasDelay,
}

/// Scoring constants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Multiplier on removed² for every pass
    pub base: u64,
    /// Multiplier on 2^(chain-1) from chain 2 onward
    pub chain: u64,
    /// Multiplier on groups² when more than one group clears at once
    pub group: u64,
    /// Per-cell bonus at or above `mass_threshold` cleared cells
    pub mass: u64,
    pub mass_threshold: u64,
    /// Per-level flat bonus on every scoring pass
    pub level: u64,
    /// Per-level bonus awarded on level-up
    pub level_up: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base: 10,
            chain: 40,
            group: 30,
            mass: 20,
            mass_threshold: 8,
            level: 5,
            level_up: 100,
        }
    }
}

/// Input and cosmetic timings, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Fall interval while soft drop is held
    pub soft_drop_ms: u64,
    /// Delay before a held control starts repeating
    pub das_initial_ms: u64,
    /// Delay between repeats once repeating
    pub das_repeat_ms: u64,
    /// How long the level-up flag stays raised
    pub level_up_flash_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            soft_drop_ms: 50,
            das_initial_ms: 170,
            das_repeat_ms: 50,
            level_up_flash_ms: 1500,
        }
    }
}

impl TimingConfig {
    pub fn soft_drop(&self) -> Duration {
        Duration::from_millis(self.soft_drop_ms)
    }

    pub fn das_initial(&self) -> Duration {
        Duration::from_millis(self.das_initial_ms)
    }

    pub fn das_repeat(&self) -> Duration {
        Duration::from_millis(self.das_repeat_ms)
    }

    pub fn level_up_flash(&self) -> Duration {
        Duration::from_millis(self.level_up_flash_ms)
    }
}

/// Level curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Fall interval per level (index 0 is level 1); later levels reuse the last entry
    pub fall_table_ms: Vec<u64>,
    pub max_level: u32,
    /// Score needed per level
    pub level_score_step: u64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            fall_table_ms: vec![500, 440, 380, 330, 290, 250, 220, 190, 165, 145, 130, 120],
            max_level: 15,
            level_score_step: 1000,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub columns: usize,
    pub rows: usize,
    /// How many palette colors are in play
    pub color_count: usize,
    /// Smallest group that clears
    pub min_group_size: usize,
    /// Row checked for game over after each lock (row 0 is the spawn buffer)
    pub game_over_row: usize,
    /// Pivot column for new pieces
    pub spawn_column: usize,
    pub scoring: ScoringConfig,
    pub timing: TimingConfig,
    pub progression: ProgressionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns: 6,
            rows: 12,
            color_count: 5,
            min_group_size: 4,
            game_over_row: 1,
            spawn_column: 3,
            scoring: ScoringConfig::default(),
            timing: TimingConfig::default(),
            progression: ProgressionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Two rows minimum so a vertical pair fits at spawn
        if self.columns == 0 || self.rows < 2 {
            return Err(ConfigError::Dimensions {
                columns: self.columns,
                rows: self.rows,
            });
        }
        if !(1..=Cell::COLORS.len()).contains(&self.color_count) {
            return Err(ConfigError::ColorCount {
                got: self.color_count,
                max: Cell::COLORS.len(),
            });
        }
        if self.min_group_size == 0 {
            return Err(ConfigError::MinGroupSize);
        }
        if self.spawn_column >= self.columns {
            return Err(ConfigError::SpawnColumn {
                column: self.spawn_column,
                columns: self.columns,
            });
        }
        if self.game_over_row >= self.rows {
            return Err(ConfigError::GameOverRow {
                row: self.game_over_row,
                rows: self.rows,
            });
        }

        let table = &self.progression.fall_table_ms;
        if table.is_empty() {
            return Err(ConfigError::EmptyFallTable);
        }
        if table.contains(&0) || table.windows(2).any(|w| w[1] >= w[0]) {
            return Err(ConfigError::FallTableOrder);
        }
        if self.progression.max_level == 0 {
            return Err(ConfigError::MaxLevel);
        }
        if self.progression.level_score_step == 0 {
            return Err(ConfigError::LevelScoreStep);
        }
        if self.timing.das_initial_ms == 0 || self.timing.das_repeat_ms == 0 {
            return Err(ConfigError::DasDelay);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!((config.columns, config.rows), (6, 12));
        assert_eq!(config.min_group_size, 4);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "columns": 8, "scoring": { "base": 20 } }"#).unwrap();
        assert_eq!(config.columns, 8);
        assert_eq!(config.rows, 12);
        assert_eq!(config.scoring.base, 20);
        assert_eq!(config.scoring.chain, ScoringConfig::default().chain);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "rows": 1 }"#),
            Err(ConfigError::Dimensions { .. })
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "color_count": 9 }"#),
            Err(ConfigError::ColorCount { got: 9, .. })
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "game_over_row": 12 }"#),
            Err(ConfigError::GameOverRow { .. })
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "progression": { "fall_table_ms": [300, 300] } }"#),
            Err(ConfigError::FallTableOrder)
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "timing": { "das_repeat_ms": 0 } }"#),
            Err(ConfigError::DasDelay)
        ));
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            EngineConfig::load("/nonexistent/pair-drop.json"),
            Err(ConfigError::Io(_))
        ));
    }
}

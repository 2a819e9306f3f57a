//! Pair Drop - a falling color-pair puzzle engine
//!
//! Core modules:
//! - `sim`: Deterministic board simulation (grid, pieces, matching, chains)
//! - `config`: Data-driven board size, scoring and timing

pub mod config;
pub mod sim;

pub use config::{ConfigError, EngineConfig};
pub use sim::{GameEvent, GameState, Snapshot, TickInput, tick};

/// Engine timing constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: Duration = Duration::from_micros(16_667);
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

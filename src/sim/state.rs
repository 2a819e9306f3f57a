//! Game state and observable snapshot
//!
//! Everything a session owns lives here: the grid, active and next piece,
//! counters, timers and the event queue consumers drain each frame.

use glam::IVec2;
use serde::Serialize;
use std::time::Duration;

use super::grid::{Cell, Grid};
use super::input::Controls;
use super::piece::{Piece, PieceSource, RandomSource, spawn_piece};
use crate::config::EngineConfig;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Active piece under player control
    Falling,
    /// Piece is being written into the grid
    Locking,
    /// Cascade in progress
    Resolving,
    /// Run ended; only a reset leaves this phase
    GameOver,
}

/// Something that happened during a tick, for renderers and audio
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// Active piece written into the grid
    PieceLocked { cells: [(IVec2, Cell); 2] },
    /// A group was removed
    GroupCleared {
        chain: u32,
        color: Cell,
        cells: Vec<IVec2>,
    },
    /// A scoring pass finished
    ChainStep {
        chain: u32,
        removed: usize,
        groups: usize,
        points: u64,
    },
    /// Level raised; `bonus` already added to score
    LevelUp { level: u32, bonus: u64 },
    GameOver { score: u64 },
    Reset,
}

/// Read-only view of the board for consumers
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub grid: Grid,
    /// Active piece; `None` after game over
    pub active: Option<Piece>,
    pub next_colors: (Cell, Cell),
    pub score: u64,
    pub level: u32,
    pub chain: u32,
    pub best_chain: u32,
    pub combo: u32,
    pub pieces_locked: u64,
    pub total_cleared: u64,
    pub alive: bool,
    pub level_up: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState<S = RandomSource> {
    pub(super) config: EngineConfig,
    pub(super) source: S,
    pub(super) grid: Grid,
    pub(super) active: Piece,
    pub(super) next: Piece,
    pub(super) phase: GamePhase,
    pub(super) score: u64,
    pub(super) level: u32,
    /// Depth of the most recent cascade (0 if the last lock cleared nothing)
    pub(super) chain: u32,
    pub(super) best_chain: u32,
    /// Consecutive locks that cleared at least one group
    pub(super) combo: u32,
    pub(super) pieces_locked: u64,
    pub(super) total_cleared: u64,
    pub(super) fall_timer: Duration,
    pub(super) soft_drop: bool,
    pub(super) level_up_timer: Duration,
    pub(super) controls: Controls,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(super) events: Vec<GameEvent>,
}

impl GameState {
    /// New session with default configuration and a seeded color source
    pub fn new(seed: u64) -> Self {
        Self::with_config(EngineConfig::default(), seed)
    }

    /// New session with a seeded color source
    pub fn with_config(config: EngineConfig, seed: u64) -> Self {
        let source = RandomSource::new(seed, config.color_count);
        Self::with_source(config, source)
    }
}

impl<S: PieceSource> GameState<S> {
    /// New session drawing piece colors from `source`.
    ///
    /// Panics if `config` does not validate.
    pub fn with_source(config: EngineConfig, mut source: S) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid engine config: {err}");
        }
        let spawn = spawn_point(&config);
        let active = spawn_piece(&mut source, spawn);
        let next = spawn_piece(&mut source, spawn);
        Self {
            grid: Grid::new(config.columns, config.rows),
            active,
            next,
            phase: GamePhase::Falling,
            score: 0,
            level: 1,
            chain: 0,
            best_chain: 0,
            combo: 0,
            pieces_locked: 0,
            total_cleared: 0,
            fall_timer: Duration::ZERO,
            soft_drop: false,
            level_up_timer: Duration::ZERO,
            controls: Controls::default(),
            time_ticks: 0,
            events: Vec::new(),
            config,
            source,
        }
    }

    /// Restart the run: empty grid, fresh pieces, all counters zeroed
    pub fn reset(&mut self) {
        let spawn = spawn_point(&self.config);
        self.grid.clear();
        self.active = spawn_piece(&mut self.source, spawn);
        self.next = spawn_piece(&mut self.source, spawn);
        self.phase = GamePhase::Falling;
        self.score = 0;
        self.level = 1;
        self.chain = 0;
        self.best_chain = 0;
        self.combo = 0;
        self.pieces_locked = 0;
        self.total_cleared = 0;
        self.fall_timer = Duration::ZERO;
        self.soft_drop = false;
        self.level_up_timer = Duration::ZERO;
        self.controls.reset();
        self.time_ticks = 0;
        self.events.clear();
        self.events.push(GameEvent::Reset);
        log::info!("Game reset");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active(&self) -> &Piece {
        &self.active
    }

    pub fn next_colors(&self) -> (Cell, Cell) {
        (self.next.pivot_color, self.next.sub_color)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_alive(&self) -> bool {
        self.phase != GamePhase::GameOver
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn chain(&self) -> u32 {
        self.chain
    }

    pub fn best_chain(&self) -> u32 {
        self.best_chain
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn pieces_locked(&self) -> u64 {
        self.pieces_locked
    }

    pub fn total_cleared(&self) -> u64 {
        self.total_cleared
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_drop
    }

    /// True while the level-up flash is running
    pub fn level_up_active(&self) -> bool {
        !self.level_up_timer.is_zero()
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            active: self.is_alive().then_some(self.active),
            next_colors: self.next_colors(),
            score: self.score,
            level: self.level,
            chain: self.chain,
            best_chain: self.best_chain,
            combo: self.combo,
            pieces_locked: self.pieces_locked,
            total_cleared: self.total_cleared,
            alive: self.is_alive(),
            level_up: self.level_up_active(),
        }
    }

    pub(super) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::trace!("phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }
}

/// Pivot position for new pieces; the sub cell sits in row 0 above it
pub(super) fn spawn_point(config: &EngineConfig) -> IVec2 {
    IVec2::new(config.spawn_column as i32, 1)
}

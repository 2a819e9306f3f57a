//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through explicit `dt`
//! - Piece colors come from an owned, seedable source
//! - Row-major scan order for matching
//! - No rendering or platform dependencies

pub mod collision;
pub mod controller;
pub mod grid;
pub mod input;
pub mod matching;
pub mod piece;
pub mod progression;
pub mod state;
pub mod tick;

pub use collision::{KICKS, can_move, collides, rotate_with_fallback, try_rotate};
pub use grid::{Cell, Grid};
pub use input::{Control, Controls, InputRepeater};
pub use matching::{ChainStep, ClearedGroup, Removal, apply_gravity, resolve_once, run_cascade, score_pass};
pub use piece::{Piece, PieceSource, RandomSource, Rotation, ScriptedSource, spawn_piece};
pub use progression::{fall_interval, is_game_over, level_for_score};
pub use state::{GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{TickInput, tick};

//! Piece control: movement, rotation, fall and lock
//!
//! All commands are no-ops once the run is over. A lock resolves the whole
//! cascade synchronously, then spawns the next piece.

use glam::IVec2;
use std::time::Duration;

use super::collision::{can_move, collides, rotate_with_fallback};
use super::matching::{ChainStep, run_cascade};
use super::piece::{PieceSource, Rotation, spawn_piece};
use super::progression::{fall_interval, is_game_over, level_for_score};
use super::state::{GameEvent, GamePhase, GameState, spawn_point};

impl<S: PieceSource> GameState<S> {
    pub fn move_left(&mut self) -> bool {
        self.shift(IVec2::NEG_X)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(IVec2::X)
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.rotate(Rotation::Clockwise)
    }

    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate(Rotation::CounterClockwise)
    }

    /// While held, the fall interval drops to the soft-drop interval
    pub fn soft_drop_held(&mut self, held: bool) {
        self.soft_drop = held && self.is_alive();
    }

    /// Nudge the piece down one row and restart the fall timer.
    ///
    /// A blocked step does nothing; locking is left to the fall timer.
    pub fn soft_drop_step(&mut self) -> bool {
        if self.shift(IVec2::Y) {
            self.fall_timer = Duration::ZERO;
            true
        } else {
            false
        }
    }

    /// Interval the fall timer currently counts toward
    pub fn current_fall_interval(&self) -> Duration {
        if self.soft_drop {
            self.config.timing.soft_drop()
        } else {
            fall_interval(&self.config.progression, self.level)
        }
    }

    /// Advance timers by `dt`: level-up flash and automatic fall
    pub fn advance(&mut self, dt: Duration) {
        self.level_up_timer = self.level_up_timer.saturating_sub(dt);
        if !self.is_alive() {
            return;
        }

        self.fall_timer += dt;
        if self.fall_timer < self.current_fall_interval() {
            return;
        }
        self.fall_timer = Duration::ZERO;

        if !self.shift(IVec2::Y) {
            self.lock_active();
        }
    }

    fn shift(&mut self, delta: IVec2) -> bool {
        if !self.is_alive() || !can_move(&self.grid, &self.active, delta) {
            return false;
        }
        self.active = self.active.shifted(delta);
        true
    }

    fn rotate(&mut self, rotation: Rotation) -> bool {
        if !self.is_alive() {
            return false;
        }
        match rotate_with_fallback(&self.grid, &self.active, rotation) {
            Some(piece) => {
                self.active = piece;
                true
            }
            None => false,
        }
    }

    /// Write the active piece into the grid and run everything that follows
    fn lock_active(&mut self) {
        self.set_phase(GamePhase::Locking);
        let piece = self.active;
        for (pos, color) in piece.cells() {
            if !self.grid.set(pos, color) {
                log::trace!("lock write at {} skipped (out of bounds)", pos);
            }
        }
        self.pieces_locked += 1;
        self.events.push(GameEvent::PieceLocked {
            cells: piece.cells(),
        });
        log::debug!(
            "locked piece #{} at {} / {}",
            self.pieces_locked,
            piece.pivot,
            piece.sub()
        );

        self.set_phase(GamePhase::Resolving);
        let steps = run_cascade(
            &mut self.grid,
            self.config.min_group_size,
            &self.config.scoring,
            self.level,
        );
        self.record_cascade(steps);
        self.update_level();

        if is_game_over(&self.grid, self.config.game_over_row) {
            self.end_game();
            return;
        }
        self.spawn_next();
    }

    fn record_cascade(&mut self, steps: Vec<ChainStep>) {
        self.chain = steps.len() as u32;
        if steps.is_empty() {
            self.combo = 0;
            return;
        }
        self.combo += 1;
        self.best_chain = self.best_chain.max(self.chain);

        for step in steps {
            self.score = self.score.saturating_add(step.points);
            self.total_cleared += step.removal.removed as u64;
            self.events.push(GameEvent::ChainStep {
                chain: step.chain,
                removed: step.removal.removed,
                groups: step.removal.groups,
                points: step.points,
            });
            for group in step.removal.cleared {
                self.events.push(GameEvent::GroupCleared {
                    chain: step.chain,
                    color: group.color,
                    cells: group.cells,
                });
            }
        }
        if self.chain > 1 {
            log::debug!("{}-chain, score now {}", self.chain, self.score);
        }
    }

    /// Raise the level until it matches the score, bonuses included
    fn update_level(&mut self) {
        loop {
            let earned = level_for_score(&self.config.progression, self.score);
            if earned <= self.level {
                return;
            }
            self.level = earned;
            let bonus = u64::from(earned).saturating_mul(self.config.scoring.level_up);
            self.score = self.score.saturating_add(bonus);
            self.level_up_timer = self.config.timing.level_up_flash();
            self.events.push(GameEvent::LevelUp {
                level: earned,
                bonus,
            });
            log::info!("Level up! Now level {} (+{})", earned, bonus);
        }
    }

    fn spawn_next(&mut self) {
        let spawn = spawn_point(&self.config);
        self.active = self.next;
        self.next = spawn_piece(&mut self.source, spawn);
        self.fall_timer = Duration::ZERO;

        if collides(&self.grid, &self.active) {
            self.end_game();
        } else {
            self.set_phase(GamePhase::Falling);
        }
    }

    fn end_game(&mut self) {
        self.set_phase(GamePhase::GameOver);
        self.soft_drop = false;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!(
            "Game over: score {}, level {}, best chain {}",
            self.score,
            self.level,
            self.best_chain
        );
    }
}

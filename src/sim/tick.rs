//! Fixed timestep simulation tick
//!
//! Feeds held controls through the auto-shift repeaters, applies the
//! resulting moves and rotations, then advances the fall timer.

use std::time::Duration;

use super::input::Control;
use super::piece::PieceSource;
use super::state::GameState;

/// Held controls for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Soft drop
    pub down: bool,
    pub rotate_cw: bool,
    pub rotate_ccw: bool,
    /// Restart the run (edge-triggered by the caller)
    pub reset: bool,
}

impl TickInput {
    fn held(&self, control: Control) -> bool {
        match control {
            Control::Left => self.left,
            Control::Right => self.right,
            Control::Down => self.down,
            Control::RotateCw => self.rotate_cw,
            Control::RotateCcw => self.rotate_ccw,
        }
    }
}

/// Advance the game state by one timestep
pub fn tick<S: PieceSource>(state: &mut GameState<S>, input: &TickInput, dt: Duration) {
    if input.reset {
        state.reset();
        return;
    }
    if !state.is_alive() {
        state.advance(dt);
        return;
    }

    state.time_ticks += 1;

    let initial = state.config().timing.das_initial();
    let repeat = state.config().timing.das_repeat();
    for control in Control::ALL {
        let triggers = state
            .controls
            .get_mut(control)
            .update(input.held(control), dt, initial, repeat);
        for _ in 0..triggers {
            let moved = match control {
                Control::Left => state.move_left(),
                Control::Right => state.move_right(),
                Control::Down => state.soft_drop_step(),
                Control::RotateCw => state.rotate_cw(),
                Control::RotateCcw => state.rotate_ccw(),
            };
            if !moved {
                break;
            }
        }
    }

    state.soft_drop_held(input.down);
    state.advance(dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::GamePhase;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    fn held_left() -> TickInput {
        TickInput {
            left: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tap_moves_once() {
        let mut state = GameState::new(12345);
        tick(&mut state, &held_left(), SIM_DT);
        assert_eq!(state.active().pivot.x, 2);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.active().pivot.x, 2);
        tick(&mut state, &held_left(), SIM_DT);
        assert_eq!(state.active().pivot.x, 1);
    }

    #[test]
    fn test_held_left_repeats_after_delay() {
        let mut state = GameState::new(12345);
        let step = Duration::from_millis(10);
        // Press tick plus 16 more covers 160ms of the 170ms initial delay
        for _ in 0..17 {
            tick(&mut state, &held_left(), step);
        }
        assert_eq!(state.active().pivot.x, 2);
        tick(&mut state, &held_left(), step);
        assert_eq!(state.active().pivot.x, 1);
    }

    #[test]
    fn test_rotate_held_does_not_spin() {
        let mut state = GameState::new(12345);
        let input = TickInput {
            rotate_cw: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let after_press = state.active().offset();
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.active().offset(), after_press);
    }

    #[test]
    fn test_down_held_soft_drops() {
        let mut state = GameState::new(12345);
        let input = TickInput {
            down: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.is_soft_dropping());
        assert_eq!(state.active().pivot.y, 2);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.is_soft_dropping());
    }

    #[test]
    fn test_reset_input_restarts() {
        let mut state = GameState::new(12345);
        for _ in 0..2000 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.pieces_locked() > 0);
        let reset = TickInput {
            reset: true,
            ..Default::default()
        };
        tick(&mut state, &reset, SIM_DT);
        assert_eq!(state.pieces_locked(), 0);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.phase(), GamePhase::Falling);
    }

    fn random_input(rng: &mut Pcg32) -> TickInput {
        TickInput {
            left: rng.random_bool(0.3),
            right: rng.random_bool(0.3),
            down: rng.random_bool(0.5),
            rotate_cw: rng.random_bool(0.2),
            rotate_ccw: rng.random_bool(0.1),
            reset: false,
        }
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        let mut rng = Pcg32::seed_from_u64(7);

        for _ in 0..3000 {
            let input = random_input(&mut rng);
            tick(&mut state1, &input, SIM_DT);
            tick(&mut state2, &input, SIM_DT);
        }

        let a = serde_json::to_string(&state1.snapshot()).unwrap();
        let b = serde_json::to_string(&state2.snapshot()).unwrap();
        assert_eq!(a, b);
        assert_eq!(state1.drain_events(), state2.drain_events());
    }

    #[test]
    fn test_score_and_level_monotonic() {
        for seed in 0..4u64 {
            let mut state = GameState::new(seed);
            let mut rng = Pcg32::seed_from_u64(seed + 100);
            let (mut score, mut level) = (0, 1);
            for _ in 0..20_000 {
                let input = random_input(&mut rng);
                tick(&mut state, &input, SIM_DT);
                assert!(state.score() >= score);
                assert!(state.level() >= level);
                assert!(state.level() <= state.config().progression.max_level);
                score = state.score();
                level = state.level();
                if !state.is_alive() {
                    break;
                }
            }
            assert!(state.pieces_locked() > 0);
        }
    }
}

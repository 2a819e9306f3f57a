//! Delayed auto shift
//!
//! Turns "key is held" levels into discrete triggers: one on press, then
//! after an initial delay, one per repeat delay for as long as the key stays
//! down. Driven by elapsed time, not frame counts.

use std::time::Duration;

/// Repeat state for one control
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRepeater {
    held: bool,
    countdown: Duration,
    repeating: bool,
}

impl InputRepeater {
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// True once the initial delay has elapsed while held
    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Back to idle: nothing pending, countdown cleared
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance by `dt` with the current held level; returns triggers to apply.
    ///
    /// The press tick itself does not consume time. Leftover time carries
    /// across repeats so a long tick can yield several triggers.
    pub fn update(&mut self, held: bool, dt: Duration, initial: Duration, repeat: Duration) -> u32 {
        assert!(!repeat.is_zero(), "repeat delay must be non-zero");
        if !held {
            self.reset();
            return 0;
        }
        if !self.held {
            self.held = true;
            self.repeating = false;
            self.countdown = initial;
            return 1;
        }

        let mut triggers = 0;
        let mut remaining = dt;
        while remaining >= self.countdown {
            remaining -= self.countdown;
            self.countdown = repeat;
            self.repeating = true;
            triggers += 1;
        }
        self.countdown -= remaining;
        triggers
    }
}

/// Tracked controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Down,
    RotateCw,
    RotateCcw,
}

impl Control {
    pub const ALL: [Control; 5] = [
        Control::Left,
        Control::Right,
        Control::Down,
        Control::RotateCw,
        Control::RotateCcw,
    ];
}

/// One repeater per control
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    left: InputRepeater,
    right: InputRepeater,
    down: InputRepeater,
    rotate_cw: InputRepeater,
    rotate_ccw: InputRepeater,
}

impl Controls {
    pub fn get(&self, control: Control) -> &InputRepeater {
        match control {
            Control::Left => &self.left,
            Control::Right => &self.right,
            Control::Down => &self.down,
            Control::RotateCw => &self.rotate_cw,
            Control::RotateCcw => &self.rotate_ccw,
        }
    }

    pub fn get_mut(&mut self, control: Control) -> &mut InputRepeater {
        match control {
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::Down => &mut self.down,
            Control::RotateCw => &mut self.rotate_cw,
            Control::RotateCcw => &mut self.rotate_ccw,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

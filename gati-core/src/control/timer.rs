//! Countdown for blind overrides.

/// Non-negative countdown in seconds, advanced by caller-supplied dt.
///
/// While active the controller repeats its previous command and skips mode
/// logic entirely.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OverrideTimer {
    remaining: f32,
}

impl OverrideTimer {
    /// Start (or restart) the countdown. Negative or non-finite durations
    /// leave the timer idle.
    pub fn arm(&mut self, secs: f32) {
        self.remaining = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    }

    /// Stop the countdown immediately.
    pub fn cancel(&mut self) {
        self.remaining = 0.0;
    }

    /// Check if the countdown is running.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Seconds left.
    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Consume `dt` seconds if active. Returns true when this tick is held.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining = (self.remaining - dt.max(0.0)).max(0.0);
        true
    }
}

//! Tap and hold feedback for list rows.

use std::time::{Duration, Instant};

pub const TAP_PULSE: Duration = Duration::from_millis(250);
/// Taps this soon after a hold release are not pulsed.
pub const RELEASE_GRACE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct Item {
    pub tap_pulse: bool,
    pub tap_highlight: bool,
    pulse_until: Option<Instant>,
    held: bool,
    released_at: Option<Instant>,
}

impl Default for Item {
    fn default() -> Self {
        Self {
            tap_pulse: true,
            tap_highlight: false,
            pulse_until: None,
            held: false,
            released_at: None,
        }
    }
}

impl Item {
    /// Start the pulse. Returns whether it started.
    pub fn tap(&mut self, now: Instant) -> bool {
        if !self.tap_pulse {
            return false;
        }
        let just_released = self
            .released_at
            .is_some_and(|at| now.saturating_duration_since(at) <= RELEASE_GRACE);
        if just_released {
            return false;
        }
        self.pulse_until = Some(now + TAP_PULSE);
        true
    }

    pub fn hold(&mut self) {
        if self.tap_highlight {
            self.held = true;
        }
    }

    pub fn release(&mut self, now: Instant) {
        if self.tap_highlight {
            self.held = false;
            self.released_at = Some(now);
        }
    }

    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.pulse_until.is_some_and(|until| now < until)
    }

    pub fn is_highlighted(&self) -> bool {
        self.held
    }
}

use std::time::Duration;

use tokio::time::Instant;

use crate::state::{gesture::GestureClassifier, match_state::Side};

/// How long both buttons must be held together to wipe the match.
pub const RESET_THRESHOLD: Duration = Duration::from_millis(500);
/// Cadence of the both-buttons check.
pub const RESET_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Level-triggered detector for the two-button reset.
///
/// Fires at most once per contiguous two-button hold and stays latched until
/// the buttons are no longer both down.
#[derive(Debug, Clone)]
pub struct ResetSupervisor {
    threshold: Duration,
    latched: bool,
}

impl ResetSupervisor {
    /// Build a supervisor requiring both presses to last at least `threshold`.
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            latched: false,
        }
    }

    /// Whether a reset fired during the current two-button hold.
    pub fn is_active(&self) -> bool {
        self.latched
    }

    /// Sample the buttons. Returns `true` exactly when a reset must be injected.
    pub fn poll(&mut self, both_held: bool, presses: &GestureClassifier, now: Instant) -> bool {
        if !both_held {
            self.latched = false;
            return false;
        }
        if self.latched {
            return false;
        }

        let long_enough = Side::BOTH.into_iter().all(|side| {
            presses
                .held_for(side, now)
                .is_some_and(|held| held >= self.threshold)
        });
        if long_enough {
            self.latched = true;
        }
        long_enough
    }
}

impl Default for ResetSupervisor {
    fn default() -> Self {
        Self::new(RESET_THRESHOLD)
    }
}

use std::time::Duration;

use tokio::time::Instant;

use crate::state::{engine::Gesture, match_state::Side};

/// Default boundary between a tap and a hold.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(1_000);

/// Raw edge reported by a button driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Button went down.
    Pressed,
    /// Button came back up.
    Released,
}

/// Start of an ongoing press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressRecord {
    /// Button being held.
    pub side: Side,
    /// When the press edge was observed.
    pub started_at: Instant,
}

/// Pairs press and release edges into taps and holds.
///
/// Keeps at most one open [`PressRecord`] per side. Duplicate presses and
/// releases without a press are dropped.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    presses: [Option<PressRecord>; 2],
    long_press: Duration,
}

impl GestureClassifier {
    /// Build a classifier treating presses of at least `long_press` as holds.
    pub fn new(long_press: Duration) -> Self {
        Self {
            presses: [None, None],
            long_press,
        }
    }

    /// Record a press edge. A side that is already down keeps its original start.
    pub fn pressed(&mut self, side: Side, at: Instant) {
        let slot = &mut self.presses[side.index()];
        if slot.is_none() {
            *slot = Some(PressRecord {
                side,
                started_at: at,
            });
        }
    }

    /// Consume a release edge and classify it.
    ///
    /// While a reset is active the release is swallowed so the reset gesture
    /// never doubles as a point.
    pub fn released(&mut self, side: Side, at: Instant, reset_active: bool) -> Option<Gesture> {
        let record = self.presses[side.index()].take()?;
        if reset_active {
            return None;
        }

        let duration = at.saturating_duration_since(record.started_at);
        if duration >= self.long_press {
            Some(Gesture::Hold(side))
        } else {
            Some(Gesture::Tap(side))
        }
    }

    /// Feed a raw edge, returning the completed gesture if any.
    pub fn edge(
        &mut self,
        side: Side,
        kind: EdgeKind,
        at: Instant,
        reset_active: bool,
    ) -> Option<Gesture> {
        match kind {
            EdgeKind::Pressed => {
                self.pressed(side, at);
                None
            }
            EdgeKind::Released => self.released(side, at, reset_active),
        }
    }

    /// Open press for `side`, if any.
    pub fn press(&self, side: Side) -> Option<PressRecord> {
        self.presses[side.index()]
    }

    /// How long `side` has been held as of `now`.
    pub fn held_for(&self, side: Side, now: Instant) -> Option<Duration> {
        self.press(side)
            .map(|record| now.saturating_duration_since(record.started_at))
    }

    /// Drop every open press.
    pub fn clear(&mut self) {
        self.presses = [None, None];
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(LONG_PRESS_THRESHOLD)
    }
}

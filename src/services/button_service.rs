//! Button capability used by the scoring loop, plus the simulated panel that
//! stands in for GPIO buttons on development machines.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::debug;

use crate::{
    error::ServiceError,
    services::scoring_service::ScoreInputs,
    state::{gesture::EdgeKind, match_state::Side},
};

/// Instantaneous view of the physical buttons.
///
/// A hardware driver implements this next to reporting its edges through a
/// [`ScoreInputs`] handle.
pub trait ButtonPanel: Send + Sync {
    /// Whether `side` is currently held down.
    fn is_held(&self, side: Side) -> bool;

    /// Whether both buttons are currently held down.
    fn both_held(&self) -> bool {
        Side::BOTH.into_iter().all(|side| self.is_held(side))
    }
}

/// In-memory panel whose buttons are driven by API calls.
#[derive(Debug, Default)]
pub struct SimulatedPanel {
    held: [AtomicBool; 2],
}

impl SimulatedPanel {
    /// Panel with both buttons up.
    pub fn new() -> Self {
        Self::default()
    }

    fn set_held(&self, side: Side, held: bool) {
        self.held[side.index()].store(held, Ordering::SeqCst);
    }
}

impl ButtonPanel for SimulatedPanel {
    fn is_held(&self, side: Side) -> bool {
        self.held[side.index()].load(Ordering::SeqCst)
    }
}

/// Driver for the simulated panel: tracks hold state and reports edges.
#[derive(Clone)]
pub struct ButtonDriver {
    panel: Arc<SimulatedPanel>,
    inputs: ScoreInputs,
}

impl ButtonDriver {
    /// Wire `panel` to the scoring loop behind `inputs`.
    pub fn new(panel: Arc<SimulatedPanel>, inputs: ScoreInputs) -> Self {
        Self { panel, inputs }
    }

    /// Button went down.
    pub fn pressed(&self, side: Side) -> Result<(), ServiceError> {
        debug!(?side, "simulated button pressed");
        self.panel.set_held(side, true);
        self.inputs.edge(side, EdgeKind::Pressed)
    }

    /// Button came back up.
    pub fn released(&self, side: Side) -> Result<(), ServiceError> {
        debug!(?side, "simulated button released");
        self.panel.set_held(side, false);
        self.inputs.edge(side, EdgeKind::Released)
    }

    /// Panel backing this driver.
    pub fn panel(&self) -> Arc<SimulatedPanel> {
        self.panel.clone()
    }
}

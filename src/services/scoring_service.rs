//! Single-writer scoring loop.
//!
//! Raw button edges, virtual commands from viewers and the periodic reset
//! check all funnel into one task which owns the match state, the open press
//! records and the reset latch. Each input is processed to completion,
//! including publication, before the next one is read.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval},
};
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    dto::scoreboard::MatchView,
    error::ServiceError,
    services::button_service::ButtonPanel,
    state::{
        StateBroadcaster,
        engine::{self, Effect, Gesture, MatchSetup},
        gesture::{EdgeKind, GestureClassifier},
        match_state::{MatchState, Side},
        reset::ResetSupervisor,
    },
};

/// Raw edge as reported by a button driver, stamped when it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEdge {
    /// Button that changed.
    pub side: Side,
    /// Direction of the change.
    pub kind: EdgeKind,
    /// Observation time.
    pub at: Instant,
}

/// Everything the scoring loop consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreInput {
    /// Physical (or simulated) button edge, still to be classified.
    Edge(ButtonEdge),
    /// Already-classified gesture injected by a remote viewer.
    Virtual(Gesture),
}

/// Cloneable handle feeding the scoring loop.
#[derive(Debug, Clone)]
pub struct ScoreInputs {
    tx: mpsc::UnboundedSender<ScoreInput>,
}

impl ScoreInputs {
    /// Queue an input for the scoring loop.
    pub fn send(&self, input: ScoreInput) -> Result<(), ServiceError> {
        self.tx
            .send(input)
            .map_err(|_| ServiceError::ScoringUnavailable)
    }

    /// Queue a button edge observed now.
    pub fn edge(&self, side: Side, kind: EdgeKind) -> Result<(), ServiceError> {
        self.send(ScoreInput::Edge(ButtonEdge {
            side,
            kind,
            at: Instant::now(),
        }))
    }

    /// Whether the scoring loop has stopped consuming inputs.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Create the input channel of the scoring loop.
pub fn channel() -> (ScoreInputs, mpsc::UnboundedReceiver<ScoreInput>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ScoreInputs { tx }, rx)
}

/// Synchronous heart of the scoring loop: owns every piece of mutable state.
pub struct ScoringCore {
    state: MatchState,
    version: u64,
    classifier: GestureClassifier,
    supervisor: ResetSupervisor,
    setup: Box<dyn MatchSetup>,
}

impl ScoringCore {
    /// Build a core holding a fresh match.
    pub fn new(config: &AppConfig, setup: Box<dyn MatchSetup>) -> Self {
        Self {
            state: MatchState::fresh(config.debug()),
            version: 0,
            classifier: GestureClassifier::new(config.long_press()),
            supervisor: ResetSupervisor::new(config.reset_hold()),
            setup,
        }
    }

    /// Committed match state.
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// View of the committed state.
    pub fn view(&self) -> MatchView {
        MatchView::from_state(&self.state, self.version)
    }

    /// Process one input. Returns the effects when the state changed.
    pub fn handle(&mut self, input: ScoreInput) -> Option<Vec<Effect>> {
        match input {
            ScoreInput::Edge(edge) => {
                let gesture = self.classifier.edge(
                    edge.side,
                    edge.kind,
                    edge.at,
                    self.supervisor.is_active(),
                )?;
                debug!(?gesture, "classified button gesture");
                self.commit(gesture)
            }
            ScoreInput::Virtual(gesture) => {
                debug!(?gesture, "virtual gesture");
                self.commit(gesture)
            }
        }
    }

    /// Run the two-button reset check.
    pub fn poll_reset(&mut self, both_held: bool, now: Instant) -> Option<Vec<Effect>> {
        if !self.supervisor.poll(both_held, &self.classifier, now) {
            return None;
        }
        info!("both buttons held; resetting match");
        self.commit(Gesture::SimultaneousHold)
    }

    fn commit(&mut self, gesture: Gesture) -> Option<Vec<Effect>> {
        let transition = engine::apply(&self.state, gesture, self.setup.as_mut());
        if !transition.is_change() {
            debug!(?gesture, "gesture left the match unchanged");
            return None;
        }

        if transition.effects.contains(&Effect::Reset) {
            self.classifier.clear();
        }
        self.state = transition.state;
        self.version += 1;
        Some(transition.effects)
    }
}

/// Drive `core` until every input handle is dropped, publishing each transition.
pub async fn run(
    mut core: ScoringCore,
    mut inputs: mpsc::UnboundedReceiver<ScoreInput>,
    panel: Arc<dyn ButtonPanel>,
    broadcaster: Arc<StateBroadcaster>,
    poll_every: Duration,
) {
    let mut ticker = interval(poll_every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let effects = tokio::select! {
            maybe_input = inputs.recv() => match maybe_input {
                Some(input) => core.handle(input),
                None => break,
            },
            _ = ticker.tick() => core.poll_reset(panel.both_held(), Instant::now()),
        };

        if let Some(effects) = effects {
            let view = core.view();
            info!(
                version = view.version,
                set = view.current_set,
                left = view.left.points,
                right = view.right.points,
                ?effects,
                "match state committed"
            );
            broadcaster.publish(view, effects);
        }
    }

    info!("scoring loop stopped");
}

/// Spawn the scoring loop on the current runtime.
pub fn spawn(
    core: ScoringCore,
    inputs: mpsc::UnboundedReceiver<ScoreInput>,
    panel: Arc<dyn ButtonPanel>,
    broadcaster: Arc<StateBroadcaster>,
    poll_every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(run(core, inputs, panel, broadcaster, poll_every))
}

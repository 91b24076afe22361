/// Snapshot fan-out to observers.
pub mod broadcaster;
/// Scoring state machine.
pub mod engine;
/// Tap and hold classification.
pub mod gesture;
/// Match data model.
pub mod match_state;
/// Two-button reset detection.
pub mod reset;

use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    services::{
        button_service::{ButtonDriver, SimulatedPanel},
        match_setup::CatalogSetup,
        scoring_service::{self, ScoreInputs, ScoringCore},
    },
};

pub use self::broadcaster::{Published, StateBroadcaster, Subscription};

/// Handle to the application state shared by every route and task.
pub type SharedState = Arc<AppState>;
/// Per-observer backlog before an observer is considered lagging.
pub const OBSERVER_BACKLOG: usize = 16;

/// Central application state shared by every route.
///
/// The match itself is not in here: it is owned by the scoring loop, and this
/// struct only holds the ways in (inputs, simulated buttons) and the way out
/// (broadcaster).
pub struct AppState {
    config: Arc<AppConfig>,
    inputs: ScoreInputs,
    buttons: ButtonDriver,
    broadcaster: Arc<StateBroadcaster>,
    viewers: DashMap<Uuid, mpsc::UnboundedSender<Message>>,
}

impl AppState {
    /// Build the shared state and spawn the scoring loop on the current runtime.
    pub fn new(config: AppConfig) -> SharedState {
        let config = Arc::new(config);
        let (inputs, receiver) = scoring_service::channel();
        let panel = Arc::new(SimulatedPanel::new());
        let core = ScoringCore::new(&config, Box::new(CatalogSetup::new(config.clone())));
        let broadcaster = Arc::new(StateBroadcaster::new(core.view(), OBSERVER_BACKLOG));

        scoring_service::spawn(
            core,
            receiver,
            panel.clone(),
            broadcaster.clone(),
            config.reset_poll(),
        );

        Arc::new(Self {
            config,
            buttons: ButtonDriver::new(panel, inputs.clone()),
            inputs,
            broadcaster,
            viewers: DashMap::new(),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> Arc<AppConfig> {
        self.config.clone()
    }

    /// Entry point into the scoring loop.
    pub fn inputs(&self) -> &ScoreInputs {
        &self.inputs
    }

    /// Simulated button driver used by debug controls.
    pub fn buttons(&self) -> &ButtonDriver {
        &self.buttons
    }

    /// Fan-out of committed snapshots.
    pub fn broadcaster(&self) -> &StateBroadcaster {
        &self.broadcaster
    }

    /// Track a connected viewer socket through its outbound channel.
    pub fn register_viewer(&self, tx: mpsc::UnboundedSender<Message>) -> Uuid {
        let id = Uuid::new_v4();
        self.viewers.insert(id, tx);
        id
    }

    /// Forget a viewer once its socket is gone.
    pub fn unregister_viewer(&self, id: &Uuid) {
        self.viewers.remove(id);
    }

    /// Number of connected viewer sockets.
    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    /// Ask every connected viewer socket to close, returning how many were reached.
    pub fn close_viewers(&self) -> usize {
        self.viewers
            .iter()
            .filter(|entry| entry.value().send(Message::Close(None)).is_ok())
            .count()
    }

    /// Whether the scoring loop is gone.
    pub fn is_degraded(&self) -> bool {
        self.inputs.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closing_viewers_reaches_every_registered_socket() {
        let state = AppState::new(AppConfig::default());
        let (first_tx, mut first_rx) = mpsc::unbounded_channel();
        let (second_tx, second_rx) = mpsc::unbounded_channel();
        state.register_viewer(first_tx);
        let second = state.register_viewer(second_tx);
        assert_eq!(state.viewer_count(), 2);

        drop(second_rx);
        assert_eq!(state.close_viewers(), 1);
        assert!(matches!(first_rx.recv().await, Some(Message::Close(None))));

        state.unregister_viewer(&second);
        assert_eq!(state.viewer_count(), 1);
    }
}

use std::sync::Arc;

use tokio::sync::{
    broadcast::{self, error::RecvError},
    watch,
};
use tracing::debug;

use crate::{dto::scoreboard::MatchView, state::engine::Effect};

/// One committed transition as delivered to observers.
#[derive(Debug, Clone)]
pub struct Published {
    /// Snapshot after the transition.
    pub view: Arc<MatchView>,
    /// Effects produced by the transition (empty for catch-up snapshots).
    pub effects: Arc<[Effect]>,
}

/// Fans committed snapshots out to every observer without ever blocking the writer.
///
/// The newest snapshot lives in a watch cell so late joiners and lagging
/// observers can always resynchronise from a whole state.
pub struct StateBroadcaster {
    current: watch::Sender<Arc<MatchView>>,
    updates: broadcast::Sender<Published>,
}

impl StateBroadcaster {
    /// Create a broadcaster seeded with `initial` and a per-observer backlog of `capacity`.
    pub fn new(initial: MatchView, capacity: usize) -> Self {
        let (current, _) = watch::channel(Arc::new(initial));
        let (updates, _) = broadcast::channel(capacity);
        Self { current, updates }
    }

    /// Latest committed snapshot.
    pub fn current(&self) -> Arc<MatchView> {
        self.current.borrow().clone()
    }

    /// Publish a new snapshot with the effects that produced it.
    pub fn publish(&self, view: MatchView, effects: Vec<Effect>) {
        let view = Arc::new(view);
        self.current.send_replace(view.clone());
        // No subscribers is fine: the watch cell still holds the snapshot.
        let _ = self.updates.send(Published {
            view,
            effects: effects.into(),
        });
    }

    /// Register an observer. Its first item is the current snapshot.
    pub fn subscribe(&self) -> Subscription {
        // Subscribe before reading the cell so nothing published in between is lost.
        let receiver = self.updates.subscribe();
        let latest = self.current.subscribe();
        let initial = latest.borrow().clone();
        Subscription {
            seen: None,
            initial: Some(initial),
            receiver,
            latest,
        }
    }

    /// Number of observers currently subscribed.
    pub fn observer_count(&self) -> usize {
        self.updates.receiver_count()
    }
}

/// Ordered stream of snapshots for one observer.
pub struct Subscription {
    seen: Option<u64>,
    initial: Option<Arc<MatchView>>,
    receiver: broadcast::Receiver<Published>,
    latest: watch::Receiver<Arc<MatchView>>,
}

impl Subscription {
    /// Wait for the next snapshot newer than anything already delivered.
    ///
    /// Returns `None` once the broadcaster is gone.
    pub async fn next(&mut self) -> Option<Published> {
        if let Some(view) = self.initial.take() {
            return Some(self.deliver(view, Arc::from([])));
        }

        loop {
            match self.receiver.recv().await {
                Ok(published) => {
                    if self.is_new(published.view.version) {
                        self.seen = Some(published.view.version);
                        return Some(published);
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(skipped, "observer lagged; resynchronising from latest snapshot");
                    let view = self.latest.borrow().clone();
                    if self.is_new(view.version) {
                        return Some(self.deliver(view, Arc::from([])));
                    }
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    fn is_new(&self, version: u64) -> bool {
        self.seen.is_none_or(|seen| version > seen)
    }

    fn deliver(&mut self, view: Arc<MatchView>, effects: Arc<[Effect]>) -> Published {
        self.seen = Some(view.version);
        Published { view, effects }
    }
}

use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the scoring loop is still consuming inputs.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let observers = state.broadcaster().observer_count();
    let viewers = state.viewer_count();
    if state.is_degraded() {
        warn!("scoring loop is not running (degraded mode)");
        HealthResponse::degraded(observers, viewers)
    } else {
        HealthResponse::ok(observers, viewers)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::{config::AppConfig, state::AppState};

    #[tokio::test]
    async fn reports_connected_viewers() {
        let state = AppState::new(AppConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        state.register_viewer(tx);
        let _subscription = state.broadcaster().subscribe();

        let health = health_status(&state);
        assert_eq!(health.status, "ok");
        assert_eq!(health.viewers, 1);
        assert_eq!(health.observers, 1);
    }
}

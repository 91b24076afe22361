use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Number of observers subscribed to state updates.
    pub observers: usize,
    /// Number of connected viewer WebSockets.
    pub viewers: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(observers: usize, viewers: usize) -> Self {
        Self {
            status: "ok".to_string(),
            observers,
            viewers,
        }
    }

    /// Create a health response indicating the scoring loop is gone.
    pub fn degraded(observers: usize, viewers: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            observers,
            viewers,
        }
    }
}

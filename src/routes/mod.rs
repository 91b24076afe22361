use axum::Router;

use crate::state::SharedState;

/// Virtual and simulated button routes.
pub mod control;
/// Swagger UI.
pub mod docs;
/// Health check route.
pub mod health;
/// Match read routes.
pub mod scoreboard;
/// SSE stream route.
pub mod sse;
/// Viewer WebSocket route.
pub mod websocket;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(scoreboard::router())
        .merge(control::router())
        .merge(sse::router())
        .merge(websocket::router())
        .merge(docs::router())
        .with_state(state)
}

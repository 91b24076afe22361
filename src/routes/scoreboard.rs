use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{control::DebugStatus, scoreboard::MatchView},
    state::SharedState,
};

/// Read-only access to the committed match.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/state", get(current_state))
        .route("/debug", get(debug_status))
}

#[utoipa::path(
    get,
    path = "/state",
    tag = "scoreboard",
    responses((status = 200, description = "Latest committed snapshot", body = MatchView))
)]
/// Return the latest committed match snapshot.
pub async fn current_state(State(state): State<SharedState>) -> Json<MatchView> {
    Json(state.broadcaster().current().as_ref().clone())
}

#[utoipa::path(
    get,
    path = "/debug",
    tag = "scoreboard",
    responses((status = 200, description = "Debug mode flag", body = DebugStatus))
)]
/// Tell the frontend whether debug controls should be shown.
pub async fn debug_status(State(state): State<SharedState>) -> Json<DebugStatus> {
    Json(DebugStatus {
        debug: state.config().debug(),
    })
}

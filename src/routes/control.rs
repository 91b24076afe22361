use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::control::CommandAccepted,
    error::AppError,
    services::control_service,
    state::{SharedState, match_state::Side},
};

/// Virtual buttons for remote viewers and simulated buttons for debugging.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/control/{side}/tap", post(tap))
        .route("/control/{side}/hold", post(hold))
        .route("/control/reset", post(reset))
        .route("/debug/buttons/{side}/press", post(press_button))
        .route("/debug/buttons/{side}/release", post(release_button))
}

#[utoipa::path(
    post,
    path = "/control/{side}/tap",
    tag = "control",
    params(("side" = Side, Path, description = "Button to tap (`a` or `b`)")),
    responses(
        (status = 202, description = "Tap queued", body = CommandAccepted),
        (status = 503, description = "Scoring loop stopped")
    )
)]
/// Award a point (or start the match) as if `side` had been tapped.
pub async fn tap(
    State(state): State<SharedState>,
    Path(side): Path<Side>,
) -> Result<(StatusCode, Json<CommandAccepted>), AppError> {
    control_service::virtual_tap(&state, side)?;
    Ok((StatusCode::ACCEPTED, Json(CommandAccepted::new("tap"))))
}

#[utoipa::path(
    post,
    path = "/control/{side}/hold",
    tag = "control",
    params(("side" = Side, Path, description = "Button to long-press (`a` or `b`)")),
    responses(
        (status = 202, description = "Hold queued", body = CommandAccepted),
        (status = 503, description = "Scoring loop stopped")
    )
)]
/// Take back a point as if `side` had been long-pressed.
pub async fn hold(
    State(state): State<SharedState>,
    Path(side): Path<Side>,
) -> Result<(StatusCode, Json<CommandAccepted>), AppError> {
    control_service::virtual_hold(&state, side)?;
    Ok((StatusCode::ACCEPTED, Json(CommandAccepted::new("hold"))))
}

#[utoipa::path(
    post,
    path = "/control/reset",
    tag = "control",
    responses(
        (status = 202, description = "Reset queued", body = CommandAccepted),
        (status = 503, description = "Scoring loop stopped")
    )
)]
/// Wipe the match back to its default state.
pub async fn reset(
    State(state): State<SharedState>,
) -> Result<(StatusCode, Json<CommandAccepted>), AppError> {
    control_service::virtual_reset(&state)?;
    Ok((StatusCode::ACCEPTED, Json(CommandAccepted::new("reset"))))
}

#[utoipa::path(
    post,
    path = "/debug/buttons/{side}/press",
    tag = "control",
    params(("side" = Side, Path, description = "Simulated button to push down")),
    responses(
        (status = 202, description = "Edge queued", body = CommandAccepted),
        (status = 403, description = "Debug mode disabled")
    )
)]
/// Push a simulated button down.
pub async fn press_button(
    State(state): State<SharedState>,
    Path(side): Path<Side>,
) -> Result<(StatusCode, Json<CommandAccepted>), AppError> {
    control_service::debug_press(&state, side)?;
    Ok((StatusCode::ACCEPTED, Json(CommandAccepted::new("press"))))
}

#[utoipa::path(
    post,
    path = "/debug/buttons/{side}/release",
    tag = "control",
    params(("side" = Side, Path, description = "Simulated button to release")),
    responses(
        (status = 202, description = "Edge queued", body = CommandAccepted),
        (status = 403, description = "Debug mode disabled")
    )
)]
/// Release a simulated button.
pub async fn release_button(
    State(state): State<SharedState>,
    Path(side): Path<Side>,
) -> Result<(StatusCode, Json<CommandAccepted>), AppError> {
    control_service::debug_release(&state, side)?;
    Ok((StatusCode::ACCEPTED, Json(CommandAccepted::new("release"))))
}

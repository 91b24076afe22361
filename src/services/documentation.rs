use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Rally Board Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::scoreboard::current_state,
        crate::routes::scoreboard::debug_status,
        crate::routes::control::tap,
        crate::routes::control::hold,
        crate::routes::control::reset,
        crate::routes::control::press_button,
        crate::routes::control::release_button,
        crate::routes::sse::match_stream,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::scoreboard::MatchView,
            crate::dto::scoreboard::SideView,
            crate::dto::control::CommandAccepted,
            crate::dto::control::DebugStatus,
            crate::dto::sse::MatchStartedEvent,
            crate::dto::sse::PointEvent,
            crate::dto::sse::SetWonEvent,
            crate::dto::sse::SidesSwappedEvent,
            crate::dto::sse::MatchWonEvent,
            crate::state::match_state::Side,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "scoreboard", description = "Read access to the match"),
        (name = "control", description = "Virtual buttons and debug controls"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "viewers", description = "WebSocket operations for scoreboard viewers"),
    )
)]
pub struct ApiDoc;

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Control command acknowledgements.
pub mod control;
/// Health check payload.
pub mod health;
/// View-adjusted match snapshot.
pub mod scoreboard;
/// Server-sent event payloads.
pub mod sse;
/// Viewer WebSocket messages.
pub mod ws;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

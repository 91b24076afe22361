use serde::Serialize;
use utoipa::ToSchema;

/// Acknowledgement that a command was queued for the scoring loop.
///
/// The resulting state arrives on the live streams, not in this response.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommandAccepted {
    /// Command that was queued (e.g. `tap`, `reset`).
    pub command: String,
}

impl CommandAccepted {
    /// Acknowledge `command`.
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

/// Whether the backend runs with debug controls enabled.
#[derive(Debug, Serialize, ToSchema)]
pub struct DebugStatus {
    /// Debug flag as carried by the match state.
    pub debug: bool,
}

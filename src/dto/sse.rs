use serde::Serialize;
use utoipa::ToSchema;

use crate::state::match_state::{MatchNames, Side};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    /// SSE event name; unnamed events reach the default `message` listener.
    pub event: Option<String>,
    /// JSON payload.
    pub data: String,
}

impl ServerEvent {
    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the first tap starts a match.
pub struct MatchStartedEvent {
    /// Theme of the drawn names.
    pub theme: String,
    /// Name of the team starting at end A.
    pub name_a: String,
    /// Name of the team starting at end B.
    pub name_b: String,
}

impl From<&MatchNames> for MatchStartedEvent {
    fn from(names: &MatchNames) -> Self {
        Self {
            theme: names.theme.clone(),
            name_a: names.name_a.clone(),
            name_b: names.name_b.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a point is scored or taken back.
pub struct PointEvent {
    /// Team whose score changed.
    pub team: Side,
    /// Team score after the change.
    pub points: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a set ends.
pub struct SetWonEvent {
    /// Team that took the set.
    pub winner: Side,
    /// One-based number of the finished set.
    pub set: u32,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the teams change ends.
pub struct SidesSwappedEvent {
    /// Whether teams now play at the opposite end from where they started.
    pub sides_swapped: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the match is decided.
pub struct MatchWonEvent {
    /// Winning team.
    pub winner: Side,
    /// Name drawn for the winning team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_name: Option<String>,
}

use serde::{Deserialize, Serialize};

use crate::{dto::scoreboard::MatchView, state::match_state::Side};

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Messages a viewer may send over its websocket.
pub enum ViewerInboundMessage {
    /// Virtual tap on `button`.
    ButtonPress {
        /// Button the viewer pressed.
        button: Side,
    },
    /// Virtual long press on `button`.
    ButtonHold {
        /// Button the viewer held.
        button: Side,
    },
    /// Wipe the match.
    ResetRequest,
    /// Ask whether debug controls are enabled.
    DebugRequest,
    /// Any message type this server does not understand.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// Messages pushed to viewers.
pub enum ViewerOutboundMessage<'a> {
    /// Latest committed snapshot.
    GameState {
        /// Snapshot to display.
        state: &'a MatchView,
    },
    /// Answer to a `debug_request`.
    DebugResponse {
        /// Whether debug controls are enabled.
        debug: bool,
    },
}

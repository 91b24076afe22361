use std::time::SystemTime;

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dto::format_system_time,
    state::match_state::{MatchState, Side},
};

/// One half of the scoreboard as seen from the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SideView {
    /// Physical end (and button) this half of the board belongs to.
    pub end: Side,
    /// Team currently playing at this end.
    pub team: Side,
    /// Name drawn for that team, once the match started.
    pub team_name: Option<String>,
    /// Points of that team in the current set.
    pub points: u32,
    /// Sets already won by that team.
    pub sets_won: u32,
    /// Whether that team holds the serve.
    pub serving: bool,
    /// Whether that team won the match.
    pub winner: bool,
}

/// View-adjusted match snapshot pushed to every viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MatchView {
    /// Monotonic counter bumped on every committed transition.
    pub version: u64,
    /// Board half for end A.
    pub left: SideView,
    /// Board half for end B.
    pub right: SideView,
    /// Team holding the serve.
    pub current_server: Option<Side>,
    /// Serves left before the serve changes hands.
    pub serves_remaining: u8,
    /// One-based number of the set being played.
    pub current_set: u32,
    /// Whether the match has started.
    pub started: bool,
    /// Winning team, once decided.
    pub match_winner: Option<Side>,
    /// Theme of the drawn team names.
    pub theme: Option<String>,
    /// Whether teams play at the opposite end from where they started.
    pub sides_swapped: bool,
    /// Whether debug controls should be shown.
    pub debug: bool,
    /// RFC 3339 timestamp of the transition.
    pub updated_at: String,
}

impl MatchView {
    /// Project `state` into what the viewers display.
    pub fn from_state(state: &MatchState, version: u64) -> Self {
        Self {
            version,
            left: side_view(state, Side::A),
            right: side_view(state, Side::B),
            current_server: state.current_server(),
            serves_remaining: state.serves_remaining(),
            current_set: state.current_set(),
            started: state.started(),
            match_winner: state.match_winner(),
            theme: state.names().map(|names| names.theme.clone()),
            sides_swapped: state.sides_swapped(),
            debug: state.debug(),
            updated_at: format_system_time(SystemTime::now()),
        }
    }
}

fn side_view(state: &MatchState, end: Side) -> SideView {
    let team = state.button_team(end);
    SideView {
        end,
        team,
        team_name: state.team_name(team).map(str::to_owned),
        points: state.points(team),
        sets_won: state.sets_won(team),
        serving: state.match_winner().is_none() && state.current_server() == Some(team),
        winner: state.match_winner() == Some(team),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unswapped_board_maps_ends_to_teams() {
        let state = MatchState::in_progress(3, 1, Side::B, 2);
        let view = MatchView::from_state(&state, 7);

        assert_eq!(view.version, 7);
        assert_eq!(view.left.team, Side::A);
        assert_eq!(view.left.points, 3);
        assert_eq!(view.right.points, 1);
        assert!(view.right.serving);
        assert!(!view.left.serving);
    }

    #[test]
    fn swapped_board_shows_the_other_team_on_each_end() {
        let state = MatchState::in_progress(3, 1, Side::B, 2)
            .with_sets(1, 0)
            .with_sides_swapped(true);
        let view = MatchView::from_state(&state, 1);

        assert_eq!(view.left.end, Side::A);
        assert_eq!(view.left.team, Side::B);
        assert_eq!(view.left.points, 1);
        assert_eq!(view.right.team, Side::A);
        assert_eq!(view.right.points, 3);
        assert_eq!(view.right.sets_won, 1);
        assert!(view.sides_swapped);
    }
}

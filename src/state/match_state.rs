use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Points needed to take a set, provided the lead is at least [`SET_WIN_MARGIN`].
pub const SET_POINTS: u32 = 11;
/// Minimum lead required to close out a set.
pub const SET_WIN_MARGIN: u32 = 2;
/// Score both sides must reach before serve alternates every point.
pub const DEUCE_POINTS: u32 = 10;
/// Sets required to win the match (best of three).
pub const SETS_TO_WIN: u32 = 2;
/// Serves per turn outside of deuce.
pub const SERVES_PER_TURN: u8 = 2;
/// Points at which the ends are changed during the deciding set.
pub const DECIDER_SWITCH_POINTS: u32 = 5;

/// One of the two physical ends of the table, each with its own push-button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The end wired to the first button (white on the cabinet).
    A,
    /// The end wired to the second button (black on the cabinet).
    B,
}

impl Side {
    /// Both sides in display order.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// The other side of the table.
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// Team names and theme drawn once when a match starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchNames {
    /// Name shown for the team starting at end A.
    pub name_a: String,
    /// Name shown for the team starting at end B.
    pub name_b: String,
    /// Theme the pair of names belongs to.
    pub theme: String,
}

/// Immutable snapshot of a match.
///
/// Per-team counters are indexed by the end the team *started* on. Which
/// physical button currently belongs to which team is governed by
/// [`MatchState::sides_swapped`]. A new value is built for every transition;
/// fields are only writable from the engine module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub(super) points: [u32; 2],
    pub(super) sets_won: [u32; 2],
    pub(super) current_set: u32,
    pub(super) starting_server: Option<Side>,
    pub(super) current_server: Option<Side>,
    pub(super) serves_remaining: u8,
    pub(super) sides_swapped: bool,
    pub(super) decider_swapped: bool,
    pub(super) started: bool,
    pub(super) match_winner: Option<Side>,
    pub(super) names: Option<MatchNames>,
    pub(super) debug: bool,
}

impl MatchState {
    /// Default state used at process start and after every reset.
    pub fn fresh(debug: bool) -> Self {
        Self {
            points: [0, 0],
            sets_won: [0, 0],
            current_set: 1,
            starting_server: None,
            current_server: None,
            serves_remaining: SERVES_PER_TURN,
            sides_swapped: false,
            decider_swapped: false,
            started: false,
            match_winner: None,
            names: None,
            debug,
        }
    }

    /// Points scored by `team` in the current set.
    pub fn points(&self, team: Side) -> u32 {
        self.points[team.index()]
    }

    /// Sets already won by `team`.
    pub fn sets_won(&self, team: Side) -> u32 {
        self.sets_won[team.index()]
    }

    /// One-based number of the set being played.
    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    /// Team that served first in the match.
    pub fn starting_server(&self) -> Option<Side> {
        self.starting_server
    }

    /// Team currently serving.
    pub fn current_server(&self) -> Option<Side> {
        self.current_server
    }

    /// Serves left before the serve passes to the other team.
    pub fn serves_remaining(&self) -> u8 {
        self.serves_remaining
    }

    /// Whether the teams have changed ends relative to where they started.
    pub fn sides_swapped(&self) -> bool {
        self.sides_swapped
    }

    /// Whether the mid-set end change of the deciding set already happened.
    pub fn decider_swapped(&self) -> bool {
        self.decider_swapped
    }

    /// Whether the first point of the match has been played.
    pub fn started(&self) -> bool {
        self.started
    }

    /// Winner of the match, once decided.
    pub fn match_winner(&self) -> Option<Side> {
        self.match_winner
    }

    /// Names drawn for the current match.
    pub fn names(&self) -> Option<&MatchNames> {
        self.names.as_ref()
    }

    /// Name drawn for `team`, if the match has started.
    pub fn team_name(&self, team: Side) -> Option<&str> {
        self.names.as_ref().map(|names| match team {
            Side::A => names.name_a.as_str(),
            Side::B => names.name_b.as_str(),
        })
    }

    /// Observability flag carried across resets.
    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Both teams have reached [`DEUCE_POINTS`] in the current set.
    pub fn is_deuce(&self) -> bool {
        self.points.iter().all(|&points| points >= DEUCE_POINTS)
    }

    /// Whether the current set is the deciding one.
    pub fn is_decider(&self) -> bool {
        self.sets_won.iter().all(|&won| won == SETS_TO_WIN - 1)
    }

    /// Team currently playing at the end of `button`.
    pub fn button_team(&self, button: Side) -> Side {
        if self.sides_swapped {
            button.opponent()
        } else {
            button
        }
    }
}

impl Default for MatchState {
    fn default() -> Self {
        Self::fresh(false)
    }
}

#[cfg(test)]
impl MatchState {
    /// Build a started set-one state with the given score and server, for tests.
    pub(crate) fn in_progress(points_a: u32, points_b: u32, server: Side, serves: u8) -> Self {
        Self {
            points: [points_a, points_b],
            started: true,
            starting_server: Some(server),
            current_server: Some(server),
            serves_remaining: serves,
            ..Self::fresh(false)
        }
    }

    pub(crate) fn with_sets(mut self, sets_a: u32, sets_b: u32) -> Self {
        self.sets_won = [sets_a, sets_b];
        self.current_set = sets_a + sets_b + 1;
        self
    }

    pub(crate) fn with_sides_swapped(mut self, swapped: bool) -> Self {
        self.sides_swapped = swapped;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_matches_default_shape() {
        let state = MatchState::fresh(true);
        assert_eq!(state.points(Side::A), 0);
        assert_eq!(state.points(Side::B), 0);
        assert_eq!(state.current_set(), 1);
        assert_eq!(state.serves_remaining(), SERVES_PER_TURN);
        assert_eq!(state.current_server(), None);
        assert!(!state.started());
        assert!(state.debug());
        assert!(state.names().is_none());
    }

    #[test]
    fn deuce_requires_both_sides_at_ten() {
        assert!(MatchState::in_progress(10, 10, Side::A, 1).is_deuce());
        assert!(MatchState::in_progress(12, 11, Side::A, 1).is_deuce());
        assert!(!MatchState::in_progress(10, 9, Side::A, 2).is_deuce());
    }

    #[test]
    fn button_team_follows_swap() {
        let state = MatchState::in_progress(0, 0, Side::A, 2);
        assert_eq!(state.button_team(Side::A), Side::A);
        let swapped = state.with_sides_swapped(true);
        assert_eq!(swapped.button_team(Side::A), Side::B);
        assert_eq!(swapped.button_team(Side::B), Side::A);
    }
}

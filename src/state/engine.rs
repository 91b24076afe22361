//! Scoring state machine: turns classified gestures into the next [`MatchState`].
//!
//! Every transition starts from a clone of the committed state and returns a
//! complete replacement, so callers only ever swap whole snapshots.

use crate::state::match_state::{
    DECIDER_SWITCH_POINTS, MatchNames, MatchState, SERVES_PER_TURN, SET_POINTS, SET_WIN_MARGIN,
    SETS_TO_WIN, Side,
};

/// Input understood by the engine. Sides name the physical button pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Short press: start the match or award a point to the team at that end.
    Tap(Side),
    /// Long press: take back the last point of the team at that end.
    Hold(Side),
    /// Both buttons held together: wipe the match.
    SimultaneousHold,
}

/// Observable consequences of a transition, published next to the new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// First tap of a match: server and names have been drawn.
    MatchStarted(MatchNames),
    /// `team` scored a point.
    PointScored {
        /// Team that scored.
        team: Side,
    },
    /// A point of `team` has been taken back.
    PointUndone {
        /// Team that lost the point.
        team: Side,
    },
    /// `winner` took set number `set`.
    SetWon {
        /// Team that won the set.
        winner: Side,
        /// One-based number of the set that just ended.
        set: u32,
    },
    /// Teams changed ends.
    SidesSwapped,
    /// The match is over.
    MatchWon(Side),
    /// The match was wiped back to its default state.
    Reset,
}

/// Randomness and lookups needed when a match starts.
pub trait MatchSetup: Send {
    /// Draw the team that serves first.
    fn pick_server(&mut self) -> Side;
    /// Draw the team names and theme for a new match. Called once per match.
    fn pick_names(&mut self) -> MatchNames;
}

/// Result of applying one gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Replacement state (identical to the input when nothing happened).
    pub state: MatchState,
    /// Effects produced, in order. Empty means the gesture was a no-op.
    pub effects: Vec<Effect>,
}

impl Transition {
    /// Whether the transition changed anything worth publishing.
    pub fn is_change(&self) -> bool {
        !self.effects.is_empty()
    }
}

/// Apply `gesture` to `current` and return the replacement state with its effects.
pub fn apply(current: &MatchState, gesture: Gesture, setup: &mut dyn MatchSetup) -> Transition {
    let mut next = current.clone();
    let mut effects = Vec::new();

    match gesture {
        Gesture::Tap(button) => tap(&mut next, button, setup, &mut effects),
        Gesture::Hold(button) => undo(&mut next, button, &mut effects),
        Gesture::SimultaneousHold => {
            next = MatchState::fresh(current.debug);
            effects.push(Effect::Reset);
        }
    }

    Transition {
        state: next,
        effects,
    }
}

fn tap(
    state: &mut MatchState,
    button: Side,
    setup: &mut dyn MatchSetup,
    effects: &mut Vec<Effect>,
) {
    if state.match_winner.is_some() {
        return;
    }

    if !state.started {
        let server = setup.pick_server();
        let names = setup.pick_names();
        state.started = true;
        state.starting_server = Some(server);
        state.current_server = Some(server);
        state.serves_remaining = SERVES_PER_TURN;
        state.names = Some(names.clone());
        effects.push(Effect::MatchStarted(names));
        return;
    }

    let team = state.button_team(button);
    state.points[team.index()] += 1;
    effects.push(Effect::PointScored { team });
    rotate_serve_forward(state);

    match set_winner(state) {
        Some(winner) => close_set(state, winner, effects),
        None => switch_ends_in_decider(state, effects),
    }
}

fn undo(state: &mut MatchState, button: Side, effects: &mut Vec<Effect>) {
    if !state.started || state.match_winner.is_some() {
        return;
    }

    let team = state.button_team(button);
    let slot = &mut state.points[team.index()];
    if *slot == 0 {
        return;
    }
    *slot -= 1;
    effects.push(Effect::PointUndone { team });
    rotate_serve_back(state);

    if state.decider_swapped
        && state
            .points
            .iter()
            .all(|&points| points < DECIDER_SWITCH_POINTS)
    {
        state.decider_swapped = false;
        state.sides_swapped = !state.sides_swapped;
        effects.push(Effect::SidesSwapped);
    }
}

/// Serves allowed per turn for the current score.
fn serves_per_turn(state: &MatchState) -> u8 {
    if state.is_deuce() { 1 } else { SERVES_PER_TURN }
}

fn rotate_serve_forward(state: &mut MatchState) {
    state.serves_remaining = state.serves_remaining.saturating_sub(1);
    if state.serves_remaining == 0 {
        state.current_server = state.current_server.map(Side::opponent);
        state.serves_remaining = SERVES_PER_TURN;
    }
    state.serves_remaining = state.serves_remaining.min(serves_per_turn(state));
}

fn rotate_serve_back(state: &mut MatchState) {
    state.serves_remaining += 1;
    if state.serves_remaining > serves_per_turn(state) {
        state.current_server = state.current_server.map(Side::opponent);
        state.serves_remaining = 1;
    }
}

fn set_winner(state: &MatchState) -> Option<Side> {
    Side::BOTH.into_iter().find(|&team| {
        let own = state.points(team);
        let other = state.points(team.opponent());
        own >= SET_POINTS && own >= other + SET_WIN_MARGIN
    })
}

fn close_set(state: &mut MatchState, winner: Side, effects: &mut Vec<Effect>) {
    let finished = state.current_set;
    state.current_set += 1;
    state.serves_remaining = SERVES_PER_TURN;
    state.sets_won[winner.index()] += 1;
    effects.push(Effect::SetWon {
        winner,
        set: finished,
    });

    // Even sets open with the match's first server, odd sets with the other team.
    state.current_server = state.starting_server.map(|first| {
        if state.current_set % 2 == 0 {
            first
        } else {
            first.opponent()
        }
    });

    if state.sets_won(winner) >= SETS_TO_WIN {
        // Final score and ends stay on the board until the next reset.
        state.match_winner = Some(winner);
        effects.push(Effect::MatchWon(winner));
        return;
    }

    state.points = [0, 0];
    state.sides_swapped = !state.sides_swapped;
    state.decider_swapped = false;
    effects.push(Effect::SidesSwapped);
}

fn switch_ends_in_decider(state: &mut MatchState, effects: &mut Vec<Effect>) {
    if !state.is_decider() || state.decider_swapped {
        return;
    }
    if state
        .points
        .iter()
        .any(|&points| points >= DECIDER_SWITCH_POINTS)
    {
        state.decider_swapped = true;
        state.sides_swapped = !state.sides_swapped;
        effects.push(Effect::SidesSwapped);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::*;

    /// Deterministic setup used across the crate's tests.
    pub(crate) struct FixedSetup {
        pub server: Side,
        pub draws: usize,
    }

    impl FixedSetup {
        pub(crate) fn new(server: Side) -> Self {
            Self { server, draws: 0 }
        }
    }

    impl MatchSetup for FixedSetup {
        fn pick_server(&mut self) -> Side {
            self.server
        }

        fn pick_names(&mut self) -> MatchNames {
            self.draws += 1;
            MatchNames {
                name_a: "Jedi".into(),
                name_b: "Sith".into(),
                theme: "Star Wars".into(),
            }
        }
    }

    fn run(state: &MatchState, gestures: &[Gesture]) -> MatchState {
        let mut setup = FixedSetup::new(Side::A);
        gestures.iter().fold(state.clone(), |current, gesture| {
            apply(&current, *gesture, &mut setup).state
        })
    }

    #[test]
    fn first_tap_only_starts_the_match() {
        let mut setup = FixedSetup::new(Side::B);
        let transition = apply(&MatchState::fresh(false), Gesture::Tap(Side::A), &mut setup);

        let state = &transition.state;
        assert!(state.started());
        assert_eq!(state.points(Side::A), 0);
        assert_eq!(state.points(Side::B), 0);
        assert_eq!(state.current_server(), Some(Side::B));
        assert_eq!(state.starting_server(), Some(Side::B));
        assert_eq!(state.team_name(Side::A), Some("Jedi"));
        assert_eq!(setup.draws, 1);
        assert!(matches!(transition.effects[..], [Effect::MatchStarted(_)]));
    }

    #[test]
    fn names_are_drawn_once_per_match() {
        let mut setup = FixedSetup::new(Side::A);
        let mut state = MatchState::fresh(false);
        for _ in 0..5 {
            state = apply(&state, Gesture::Tap(Side::A), &mut setup).state;
        }
        assert_eq!(setup.draws, 1);
        assert_eq!(state.points(Side::A), 4);
    }

    #[test]
    fn serve_passes_every_two_points() {
        let state = MatchState::in_progress(0, 0, Side::A, 2);
        let after_one = run(&state, &[Gesture::Tap(Side::A)]);
        assert_eq!(after_one.current_server(), Some(Side::A));
        assert_eq!(after_one.serves_remaining(), 1);

        let after_two = run(&after_one, &[Gesture::Tap(Side::B)]);
        assert_eq!(after_two.current_server(), Some(Side::B));
        assert_eq!(after_two.serves_remaining(), 2);
    }

    #[test]
    fn deuce_point_without_lead_keeps_single_serve() {
        let state = MatchState::in_progress(10, 10, Side::A, 1);
        let next = run(&state, &[Gesture::Tap(Side::A)]);

        assert_eq!(next.points(Side::A), 11);
        assert_eq!(next.points(Side::B), 10);
        assert_eq!(next.sets_won(Side::A), 0);
        assert_eq!(next.serves_remaining(), 1);
        assert_eq!(next.current_server(), Some(Side::B));
    }

    #[test]
    fn reaching_deuce_caps_serves_at_one() {
        let state = MatchState::in_progress(9, 10, Side::B, 2);
        let next = run(&state, &[Gesture::Tap(Side::A)]);
        assert!(next.is_deuce());
        assert_eq!(next.serves_remaining(), 1);
        assert_eq!(next.current_server(), Some(Side::B));

        let after = run(&next, &[Gesture::Tap(Side::B)]);
        assert_eq!(after.current_server(), Some(Side::A));
        assert_eq!(after.serves_remaining(), 1);
    }

    #[test]
    fn two_point_lead_at_eleven_wins_the_set() {
        let state = MatchState::in_progress(10, 9, Side::A, 2);
        let transition = apply(&state, Gesture::Tap(Side::A), &mut FixedSetup::new(Side::A));
        let next = &transition.state;

        assert_eq!(next.sets_won(Side::A), 1);
        assert_eq!(next.current_set(), 2);
        assert_eq!(next.points(Side::A), 0);
        assert_eq!(next.points(Side::B), 0);
        assert_eq!(next.serves_remaining(), 2);
        assert!(next.sides_swapped());
        assert_eq!(next.current_server(), Some(Side::A));
        assert!(next.match_winner().is_none());
        assert!(transition.effects.contains(&Effect::SetWon {
            winner: Side::A,
            set: 1
        }));
        assert!(transition.effects.contains(&Effect::SidesSwapped));
    }

    #[test]
    fn swapped_ends_route_buttons_to_the_other_team() {
        let state = MatchState::in_progress(0, 0, Side::A, 2).with_sides_swapped(true);
        let next = run(&state, &[Gesture::Tap(Side::A)]);
        assert_eq!(next.points(Side::B), 1);
        assert_eq!(next.points(Side::A), 0);
    }

    #[test]
    fn second_set_win_ends_the_match_and_freezes_scores() {
        let state = MatchState::in_progress(10, 9, Side::A, 2).with_sets(1, 1);
        let transition = apply(&state, Gesture::Tap(Side::A), &mut FixedSetup::new(Side::A));
        let won = transition.state;

        assert_eq!(won.sets_won(Side::A), 2);
        assert_eq!(won.match_winner(), Some(Side::A));
        assert_eq!(won.current_set(), 4);
        assert_eq!(won.points(Side::A), 11);
        assert_eq!(won.points(Side::B), 9);
        assert!(!won.sides_swapped());
        assert!(transition.effects.contains(&Effect::MatchWon(Side::A)));
        assert!(!transition.effects.contains(&Effect::SidesSwapped));

        let after = run(&won, &[Gesture::Tap(Side::B), Gesture::Hold(Side::A)]);
        assert_eq!(after, won);
    }

    #[test]
    fn deciding_set_changes_ends_at_five_points() {
        let state = MatchState::in_progress(4, 2, Side::A, 2).with_sets(1, 1);
        let transition = apply(&state, Gesture::Tap(Side::A), &mut FixedSetup::new(Side::A));
        assert!(transition.state.sides_swapped());
        assert!(transition.state.decider_swapped());
        assert!(transition.effects.contains(&Effect::SidesSwapped));

        // Only once per set.
        let later = run(&transition.state, &[Gesture::Tap(Side::B)]);
        assert!(later.sides_swapped());
        assert_eq!(later.points(Side::A), 6);
    }

    #[test]
    fn undoing_the_switch_point_restores_ends() {
        let state = MatchState::in_progress(4, 2, Side::A, 2).with_sets(1, 1);
        let switched = run(&state, &[Gesture::Tap(Side::A)]);
        // Team A now plays at the B end.
        let undone = run(&switched, &[Gesture::Hold(Side::B)]);
        assert_eq!(undone.points(Side::A), 4);
        assert!(!undone.sides_swapped());
        assert!(!undone.decider_swapped());
    }

    #[test]
    fn hold_undoes_point_and_serve() {
        let state = MatchState::in_progress(3, 2, Side::A, 2);
        let scored = run(&state, &[Gesture::Tap(Side::A), Gesture::Tap(Side::A)]);
        assert_eq!(scored.current_server(), Some(Side::B));

        let undone = run(&scored, &[Gesture::Hold(Side::A)]);
        assert_eq!(undone.points(Side::A), 4);
        assert_eq!(undone.current_server(), Some(Side::A));
        assert_eq!(undone.serves_remaining(), 1);
    }

    #[test]
    fn server_alternates_between_sets() {
        let set_one = MatchState::in_progress(10, 9, Side::B, 2);
        let set_two = run(&set_one, &[Gesture::Tap(Side::A)]);
        assert_eq!(set_two.current_set(), 2);
        assert_eq!(set_two.current_server(), Some(Side::B));

        // Ends are swapped in set two: button B now scores for team A.
        let closing = MatchState::in_progress(0, 0, Side::B, 2)
            .with_sets(1, 0)
            .with_sides_swapped(true);
        let mut state = closing;
        for _ in 0..11 {
            state = run(&state, &[Gesture::Tap(Side::A)]);
        }
        assert_eq!(state.sets_won(Side::B), 1);
        assert_eq!(state.current_set(), 3);
        assert_eq!(state.current_server(), Some(Side::A));
    }

    #[test]
    fn undo_out_of_advantage_restores_deuce_serve() {
        // 10-10 with A serving, A scores: serve passes to B.
        let deuce = MatchState::in_progress(10, 10, Side::A, 1);
        let advantage = run(&deuce, &[Gesture::Tap(Side::A)]);
        assert_eq!(advantage.current_server(), Some(Side::B));
        assert_eq!(advantage.serves_remaining(), 1);

        let undone = run(&advantage, &[Gesture::Hold(Side::A)]);
        assert_eq!(undone.points(Side::A), 10);
        assert_eq!(undone.points(Side::B), 10);
        assert_eq!(undone.current_server(), Some(Side::A));
        assert_eq!(undone.serves_remaining(), 1);
    }

    #[test]
    fn undo_out_of_deuce_restores_two_serves() {
        let before = MatchState::in_progress(9, 10, Side::A, 2);
        let deuce = run(&before, &[Gesture::Tap(Side::A)]);
        assert_eq!(deuce.current_server(), Some(Side::A));
        assert_eq!(deuce.serves_remaining(), 1);

        let undone = run(&deuce, &[Gesture::Hold(Side::A)]);
        assert_eq!(undone.points(Side::A), 9);
        assert_eq!(undone.current_server(), Some(Side::A));
        assert_eq!(undone.serves_remaining(), 2);
    }

    #[test]
    fn hold_at_zero_is_a_no_op() {
        let state = MatchState::in_progress(0, 5, Side::A, 2);
        let transition = apply(&state, Gesture::Hold(Side::A), &mut FixedSetup::new(Side::A));
        assert!(!transition.is_change());
        assert_eq!(transition.state, state);
    }

    #[test]
    fn undo_never_revokes_a_set_win() {
        let state = MatchState::in_progress(10, 9, Side::A, 2);
        let after = run(&state, &[Gesture::Tap(Side::A), Gesture::Hold(Side::A)]);
        assert_eq!(after.sets_won(Side::A), 1);
        assert_eq!(after.current_set(), 2);
        assert_eq!(after.points(Side::A), 0);
    }

    #[test]
    fn simultaneous_hold_restores_defaults_but_keeps_debug() {
        let mut state = MatchState::in_progress(7, 3, Side::B, 1).with_sets(1, 0);
        state.debug = true;
        let transition = apply(&state, Gesture::SimultaneousHold, &mut FixedSetup::new(Side::A));

        assert_eq!(transition.state, MatchState::fresh(true));
        assert_eq!(transition.effects, vec![Effect::Reset]);
    }

    #[test]
    fn random_sequences_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut setup = FixedSetup::new(Side::A);

        for _ in 0..200 {
            let mut state = MatchState::fresh(false);
            for _ in 0..400 {
                let button = if rng.random_bool(0.5) { Side::A } else { Side::B };
                let gesture = if rng.random_ratio(1, 5) {
                    Gesture::Hold(button)
                } else {
                    Gesture::Tap(button)
                };

                let before = state.clone();
                let transition = apply(&state, gesture, &mut setup);
                state = transition.state;

                assert!((1..=2).contains(&state.serves_remaining()));
                if state.is_deuce() && state.match_winner().is_none() {
                    assert_eq!(state.serves_remaining(), 1);
                }
                if let Some(winner) = state.match_winner() {
                    assert_eq!(state.sets_won(winner), SETS_TO_WIN);
                } else {
                    assert_eq!(
                        state.sets_won(Side::A) + state.sets_won(Side::B),
                        state.current_set() - 1
                    );
                    assert!(state.sets_won(Side::A) < SETS_TO_WIN);
                    assert!(state.sets_won(Side::B) < SETS_TO_WIN);
                }
                if before.match_winner().is_some() {
                    assert_eq!(state, before);
                }
                if state.current_set() > before.current_set() {
                    assert_eq!(state.current_set(), before.current_set() + 1);
                }
                if state.current_set() > before.current_set() && state.match_winner().is_none() {
                    assert_eq!(state.points(Side::A), 0);
                    assert_eq!(state.points(Side::B), 0);
                }
            }
        }
    }
}

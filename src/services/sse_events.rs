use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        scoreboard::{MatchView, SideView},
        sse::{
            MatchStartedEvent, MatchWonEvent, PointEvent, ServerEvent, SetWonEvent,
            SidesSwappedEvent,
        },
    },
    state::{Published, engine::Effect, match_state::Side},
};

const EVENT_GAME_STATE: &str = "game_state";
const EVENT_MATCH_STARTED: &str = "match.started";
const EVENT_POINT_SCORED: &str = "point.scored";
const EVENT_POINT_UNDONE: &str = "point.undone";
const EVENT_SET_WON: &str = "set.won";
const EVENT_SIDES_SWAPPED: &str = "sides.swapped";
const EVENT_MATCH_WON: &str = "match.won";
const EVENT_MATCH_RESET: &str = "match.reset";

/// Translate one published transition into the SSE events sent to clients.
///
/// The full snapshot always comes first, followed by one event per effect.
pub fn events_for(published: &Published) -> Vec<ServerEvent> {
    let view = published.view.as_ref();
    let mut events = Vec::with_capacity(published.effects.len() + 1);
    push_event(&mut events, EVENT_GAME_STATE, view);

    for effect in published.effects.iter() {
        match effect {
            Effect::MatchStarted(names) => {
                push_event(&mut events, EVENT_MATCH_STARTED, &MatchStartedEvent::from(names))
            }
            Effect::PointScored { team } => push_event(
                &mut events,
                EVENT_POINT_SCORED,
                &PointEvent {
                    team: *team,
                    points: team_view(view, *team).points,
                },
            ),
            Effect::PointUndone { team } => push_event(
                &mut events,
                EVENT_POINT_UNDONE,
                &PointEvent {
                    team: *team,
                    points: team_view(view, *team).points,
                },
            ),
            Effect::SetWon { winner, set } => push_event(
                &mut events,
                EVENT_SET_WON,
                &SetWonEvent {
                    winner: *winner,
                    set: *set,
                },
            ),
            Effect::SidesSwapped => push_event(
                &mut events,
                EVENT_SIDES_SWAPPED,
                &SidesSwappedEvent {
                    sides_swapped: view.sides_swapped,
                },
            ),
            Effect::MatchWon(winner) => push_event(
                &mut events,
                EVENT_MATCH_WON,
                &MatchWonEvent {
                    winner: *winner,
                    winner_name: team_view(view, *winner).team_name.clone(),
                },
            ),
            Effect::Reset => push_event(&mut events, EVENT_MATCH_RESET, view),
        }
    }

    events
}

fn team_view(view: &MatchView, team: Side) -> &SideView {
    if view.left.team == team {
        &view.left
    } else {
        &view.right
    }
}

fn push_event(events: &mut Vec<ServerEvent>, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => events.push(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::state::match_state::{MatchNames, MatchState};

    fn published(state: &MatchState, version: u64, effects: Vec<Effect>) -> Published {
        Published {
            view: Arc::new(MatchView::from_state(state, version)),
            effects: effects.into(),
        }
    }

    fn names(events: &[ServerEvent]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|event| event.event.as_deref())
            .collect()
    }

    #[test]
    fn snapshot_comes_before_effects() {
        let state = MatchState::in_progress(3, 2, Side::A, 1);
        let events = events_for(&published(
            &state,
            7,
            vec![Effect::PointScored { team: Side::A }],
        ));

        assert_eq!(names(&events), vec!["game_state", "point.scored"]);
        let point: serde_json::Value = serde_json::from_str(&events[1].data).unwrap();
        assert_eq!(point, serde_json::json!({"team": "a", "points": 3}));
    }

    #[test]
    fn set_boundary_emits_every_effect() {
        let state = MatchState::in_progress(0, 0, Side::B, 2)
            .with_sets(1, 0)
            .with_sides_swapped(true);
        let events = events_for(&published(
            &state,
            23,
            vec![
                Effect::PointScored { team: Side::A },
                Effect::SetWon {
                    winner: Side::A,
                    set: 1,
                },
                Effect::SidesSwapped,
            ],
        ));

        assert_eq!(
            names(&events),
            vec!["game_state", "point.scored", "set.won", "sides.swapped"]
        );
        let swapped: serde_json::Value = serde_json::from_str(&events[3].data).unwrap();
        assert_eq!(swapped["sides_swapped"], true);
    }

    #[test]
    fn match_start_carries_the_drawn_names() {
        let state = MatchState::fresh(false);
        let events = events_for(&published(
            &state,
            1,
            vec![Effect::MatchStarted(MatchNames {
                theme: "Star Wars".into(),
                name_a: "Jedi".into(),
                name_b: "Sith".into(),
            })],
        ));

        let started: serde_json::Value = serde_json::from_str(&events[1].data).unwrap();
        assert_eq!(started["theme"], "Star Wars");
        assert_eq!(started["name_b"], "Sith");
    }
}

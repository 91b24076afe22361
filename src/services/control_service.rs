//! Commands coming from viewers and the HTTP control routes.
//!
//! Virtual gestures bypass the classifier and reach the scoring loop already
//! resolved. Raw button edges are only accepted in debug mode, where they
//! drive the simulated panel exactly like physical buttons would.

use tracing::info;

use crate::{
    error::ServiceError,
    services::scoring_service::ScoreInput,
    state::{SharedState, engine::Gesture, match_state::Side},
};

/// Queue a virtual tap on `side`.
pub fn virtual_tap(state: &SharedState, side: Side) -> Result<(), ServiceError> {
    info!(?side, "virtual tap");
    state.inputs().send(ScoreInput::Virtual(Gesture::Tap(side)))
}

/// Queue a virtual long press on `side`.
pub fn virtual_hold(state: &SharedState, side: Side) -> Result<(), ServiceError> {
    info!(?side, "virtual hold");
    state.inputs().send(ScoreInput::Virtual(Gesture::Hold(side)))
}

/// Queue a full match reset.
pub fn virtual_reset(state: &SharedState) -> Result<(), ServiceError> {
    info!("virtual reset");
    state
        .inputs()
        .send(ScoreInput::Virtual(Gesture::SimultaneousHold))
}

/// Push the simulated `side` button down.
pub fn debug_press(state: &SharedState, side: Side) -> Result<(), ServiceError> {
    ensure_debug(state)?;
    state.buttons().pressed(side)
}

/// Release the simulated `side` button.
pub fn debug_release(state: &SharedState, side: Side) -> Result<(), ServiceError> {
    ensure_debug(state)?;
    state.buttons().released(side)
}

fn ensure_debug(state: &SharedState) -> Result<(), ServiceError> {
    if state.config().debug() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "simulated buttons require debug mode".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        config::AppConfig,
        services::button_service::ButtonPanel,
        state::{AppState, engine::Effect},
    };

    #[tokio::test]
    async fn simulated_buttons_are_refused_outside_debug_mode() {
        let state = AppState::new(AppConfig::default());
        assert!(matches!(
            debug_press(&state, Side::A),
            Err(ServiceError::Forbidden(_))
        ));
        assert!(!state.buttons().panel().both_held());
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_tap_scores_in_debug_mode() {
        let state = AppState::new(AppConfig::debug_for_tests());
        let mut subscription = state.broadcaster().subscribe();
        subscription.next().await.unwrap();

        virtual_tap(&state, Side::A).unwrap();
        let started = subscription.next().await.unwrap();
        assert!(started.view.started);
        assert!(started.view.debug);

        debug_press(&state, Side::B).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        debug_release(&state, Side::B).unwrap();

        let scored = subscription.next().await.unwrap();
        assert_eq!(scored.view.right.points, 1);
        assert_eq!(&scored.effects[..], &[Effect::PointScored { team: Side::B }]);
    }

    #[tokio::test]
    async fn virtual_reset_wipes_the_match() {
        let state = AppState::new(AppConfig::default());
        let mut subscription = state.broadcaster().subscribe();
        subscription.next().await.unwrap();

        virtual_tap(&state, Side::B).unwrap();
        virtual_tap(&state, Side::B).unwrap();
        virtual_reset(&state).unwrap();

        let mut last = None;
        for _ in 0..3 {
            last = subscription.next().await;
        }
        let reset = last.unwrap();
        assert_eq!(&reset.effects[..], &[Effect::Reset]);
        assert!(!reset.view.started);
        assert_eq!(reset.view.right.points, 0);
    }
}

//! Timer tick
//!
//! Moves are event driven; the only thing that runs on time is the
//! avalanche. The host calls `tick` every frame with the elapsed time.

use super::session::GameSession;
use super::state::{GameEvent, GamePhase};

/// Advance the session's avalanche clock by `elapsed_ms`.
///
/// Every timer due inside the window fires in order, each collapse step
/// checking the row the player currently stands on. Returns the number of
/// events raised.
pub fn tick(session: &mut GameSession, elapsed_ms: u64) -> usize {
    if elapsed_ms == 0 {
        return 0;
    }

    let target_row = session.avalanche_target_row();
    let fired = session.avalanche.advance(elapsed_ms, target_row);
    let count = fired.len();

    for event in fired {
        let event = GameEvent::from(event);
        if matches!(event, GameEvent::PlayerCaught { .. }) && !session.phase.is_over() {
            session.phase = GamePhase::Lost;
        }
        session.push_event(event);
    }

    count
}

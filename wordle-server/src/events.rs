use tracing::{debug, info};
use wordle_core::{PuzzleEvent, PuzzleEventHandler};

/// Forwards puzzle lifecycle events to the `wordle::events` tracing target
pub struct TracingEventHandler;

impl PuzzleEventHandler for TracingEventHandler {
    fn handle_event(&self, event: &PuzzleEvent) {
        match event {
            PuzzleEvent::PuzzleCompleted {
                user_id,
                word_id,
                solved,
                attempts,
            } => info!(
                target: "wordle::events",
                %user_id, word_id, solved, attempts, "puzzle completed"
            ),
            PuzzleEvent::DailyLimitReached { user_id, day } => info!(
                target: "wordle::events",
                %user_id, %day, "daily limit reached"
            ),
            PuzzleEvent::PoolExhausted { user_id, day } => info!(
                target: "wordle::events",
                %user_id, %day, "word pool exhausted"
            ),
            other => debug!(
                target: "wordle::events",
                user_id = %other.user_id(), event = ?other, "puzzle event"
            ),
        }
    }
}

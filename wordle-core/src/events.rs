use std::sync::Arc;

use chrono::NaiveDate;
use wordle_types::{UserId, WordId};

#[derive(Debug, Clone, PartialEq)]
pub enum PuzzleEvent {
    DayRolledOver {
        user_id: UserId,
        day: NaiveDate,
    },
    PuzzleAssigned {
        user_id: UserId,
        word_id: WordId,
        day: NaiveDate,
    },
    PuzzleRebound {
        user_id: UserId,
        word_id: WordId,
        day: NaiveDate,
    },
    GuessRecorded {
        user_id: UserId,
        word_id: WordId,
        attempt: u32,
        is_correct: bool,
    },
    PuzzleCompleted {
        user_id: UserId,
        word_id: WordId,
        solved: bool,
        attempts: u32,
    },
    DailyLimitReached {
        user_id: UserId,
        day: NaiveDate,
    },
    PoolExhausted {
        user_id: UserId,
        day: NaiveDate,
    },
}

impl PuzzleEvent {
    pub fn user_id(&self) -> UserId {
        match self {
            PuzzleEvent::DayRolledOver { user_id, .. } => *user_id,
            PuzzleEvent::PuzzleAssigned { user_id, .. } => *user_id,
            PuzzleEvent::PuzzleRebound { user_id, .. } => *user_id,
            PuzzleEvent::GuessRecorded { user_id, .. } => *user_id,
            PuzzleEvent::PuzzleCompleted { user_id, .. } => *user_id,
            PuzzleEvent::DailyLimitReached { user_id, .. } => *user_id,
            PuzzleEvent::PoolExhausted { user_id, .. } => *user_id,
        }
    }
}

/// Event handler trait for observing puzzle lifecycle events
pub trait PuzzleEventHandler: Send + Sync {
    fn handle_event(&self, event: &PuzzleEvent);
}

/// Simple event bus for distributing puzzle events
#[derive(Clone, Default)]
pub struct PuzzleEventBus {
    handlers: Vec<Arc<dyn PuzzleEventHandler>>,
}

impl PuzzleEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn PuzzleEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn publish(&self, event: PuzzleEvent) {
        for handler in &self.handlers {
            handler.handle_event(&event);
        }
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("Game state not found. Please refresh.")]
    GameNotInitialized,
    #[error("You've reached your daily limit of {limit} words.")]
    DailyLimitReached { limit: u32 },
    #[error("Guess must be exactly 5 letters, got {guess:?}")]
    InvalidGuessFormat { guess: String },
    #[error("Concurrent update detected, please retry")]
    ConcurrentUpdateConflict,
    #[error("Unknown user {user_id}")]
    UnknownUser { user_id: UserId },
    #[error("Storage failure: {message}")]
    Storage { message: String },
}

impl GameError {
    /// Stable machine-readable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            GameError::GameNotInitialized => "game_not_initialized",
            GameError::DailyLimitReached { .. } => "daily_limit_reached",
            GameError::InvalidGuessFormat { .. } => "invalid_guess_format",
            GameError::ConcurrentUpdateConflict => "concurrent_update_conflict",
            GameError::UnknownUser { .. } => "unknown_user",
            GameError::Storage { .. } => "storage",
        }
    }
}

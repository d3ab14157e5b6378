use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-position grading outcome for one guessed letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Verdict {
    Correct,   // Green - right letter, right spot
    Misplaced, // Yellow - right letter, wrong spot
    Wrong,     // Gray - absent or already consumed elsewhere
}

/// Outcome of entering the game for the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GameStatus {
    Active,
    DailyLimitReached,
    PoolExhausted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameEntry {
    pub status: GameStatus,
    pub max_attempts: u32,
    pub daily_limit: u32,
    pub words_played_today: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessResponse {
    pub results: Vec<Verdict>,
    pub is_correct: bool,
    pub guesses: Vec<String>,
    pub game_over: bool,
    pub attempts_remaining: u32,
}

/// Everything a client needs to redraw the board after a reload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum RestoredState {
    Active {
        guesses: Vec<String>,
        results_history: Vec<Vec<Verdict>>,
        is_solved: bool,
        current_row: u32,
    },
    DailyLimitReached,
}

impl RestoredState {
    pub fn is_active(&self) -> bool {
        matches!(self, RestoredState::Active { .. })
    }
}

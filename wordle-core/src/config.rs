#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Puzzles a user may finish per calendar day
    pub daily_limit: u32,
    /// Guesses allowed per puzzle
    pub max_attempts: usize,
}

impl GameConfig {
    pub fn new(daily_limit: u32, max_attempts: usize) -> Self {
        Self {
            daily_limit,
            max_attempts,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            daily_limit: 3,
            max_attempts: 5,
        }
    }
}

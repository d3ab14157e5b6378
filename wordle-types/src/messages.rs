use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::GameError;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessRequest {
    pub guess: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub detail: Option<GameError>,
}

impl ApiError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            detail: None,
        }
    }
}

impl From<GameError> for ApiError {
    fn from(err: GameError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            detail: Some(err),
        }
    }
}

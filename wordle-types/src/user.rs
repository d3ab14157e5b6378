use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub created_at: String, // ISO 8601 string for simplicity
}

/// Per (user, day) aggregate read by reporting views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyTally {
    pub user_id: UserId,
    #[ts(type = "string")]
    pub day: NaiveDate,
    pub words_tried: u32,
    pub words_solved: u32,
}

impl DailyTally {
    pub fn empty(user_id: UserId, day: NaiveDate) -> Self {
        Self {
            user_id,
            day,
            words_tried: 0,
            words_solved: 0,
        }
    }
}

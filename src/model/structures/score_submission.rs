use serde::{Deserialize, Serialize};

use crate::model::structures::grade::Grade;

/// A player's request to record a result for one song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub user_id: i32,
    pub song_id: i32,
    /// Derived from `score` when omitted
    pub grade: Option<Grade>,
    pub score: Option<i32>
}

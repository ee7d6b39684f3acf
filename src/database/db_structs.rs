use crate::model::structures::{difficulty::Difficulty, grade::Grade, song_reference::SongReference};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i32,
    pub title: String,
    pub difficulty: Difficulty,
    pub level: i32,
    pub notes: Option<i32>,
    pub bpm: Option<String>,
    /// World record score
    pub wr: Option<i32>,
    /// Average score of top-tier players
    pub avg: Option<i32>,
    /// Difficulty coefficient, unset for most charts
    pub coefficient: Option<f64>
}

impl Song {
    pub fn reference(&self) -> SongReference {
        SongReference {
            notes: self.notes,
            avg: self.avg,
            wr: self.wr,
            coefficient: self.coefficient
        }
    }
}

/// One row per (user, song)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserScore {
    pub user_id: i32,
    pub song_id: i32,
    pub grade: Grade,
    pub score: Option<i32>,
    /// `None` when the BPI could not be computed
    pub bpi: Option<f64>,
    pub achieved_at: DateTime<FixedOffset>
}

/// A recomputed BPI for a stored score
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BpiUpdate {
    pub user_id: i32,
    pub song_id: i32,
    pub bpi: Option<f64>,
    /// Whether `bpi` differs from the stored value
    pub changed: bool
}

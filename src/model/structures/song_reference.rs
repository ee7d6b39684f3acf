use serde::{Deserialize, Serialize};

use crate::model::constants::POINTS_PER_NOTE;

/// Per-chart calibration data consumed by the BPI engine.
///
/// Fields mirror the nullable catalog columns: a chart may be listed before
/// its average or world record is known.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SongReference {
    pub notes: Option<i32>,
    pub avg: Option<i32>,
    pub wr: Option<i32>,
    /// Difficulty coefficient `p`
    pub coefficient: Option<f64>
}

impl SongReference {
    pub fn new(notes: i32, avg: i32, wr: i32, coefficient: Option<f64>) -> SongReference {
        SongReference {
            notes: Some(notes),
            avg: Some(avg),
            wr: Some(wr),
            coefficient
        }
    }

    /// Theoretical maximum score, `None` unless the note count is positive.
    ///
    /// Widened to `i64` since twice a valid note count can exceed `i32::MAX`.
    pub fn max_score(&self) -> Option<i64> {
        self.notes
            .filter(|n| *n > 0)
            .map(|n| i64::from(n) * i64::from(POINTS_PER_NOTE))
    }
}

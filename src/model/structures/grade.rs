use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::model::constants::GRADE_DENOMINATOR;

/// Clear grade, best first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display)]
pub enum Grade {
    AAA,
    AA,
    A,
    B,
    C,
    D,
    E,
    F
}

impl Grade {
    /// Minimum number of ninths of the theoretical maximum needed for this grade
    pub fn ninths(&self) -> i32 {
        match self {
            Grade::AAA => 8,
            Grade::AA => 7,
            Grade::A => 6,
            Grade::B => 5,
            Grade::C => 4,
            Grade::D => 3,
            Grade::E => 2,
            Grade::F => 0
        }
    }

    /// Derives the grade a score earns on a chart with the given theoretical maximum.
    ///
    /// Returns `None` if `max_score` is not positive.
    pub fn from_score(score: i32, max_score: i64) -> Option<Grade> {
        if max_score <= 0 {
            return None;
        }

        // Integer comparison avoids rounding at the exact boundaries
        let scaled = score.max(0) as i64 * GRADE_DENOMINATOR as i64;
        let grade = [Grade::AAA, Grade::AA, Grade::A, Grade::B, Grade::C, Grade::D, Grade::E]
            .into_iter()
            .find(|g| scaled >= g.ninths() as i64 * max_score)
            .unwrap_or(Grade::F);

        Some(grade)
    }
}

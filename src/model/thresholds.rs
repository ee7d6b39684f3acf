use serde::Serialize;
use strum_macros::Display;

use crate::model::{
    bpi::{aaa_score, BpiCalculator, BpiResult},
    constants::{EIGHTEENTHS, FIFTEEN_EIGHTEENTHS_NUMERATOR, MAX_MINUS_NUMERATOR},
    structures::song_reference::SongReference
};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ReferenceLabel {
    #[strum(serialize = "WR")]
    WorldRecord,
    #[strum(serialize = "17/18")]
    MaxMinus,
    #[strum(serialize = "89%")]
    Aaa,
    #[strum(serialize = "15/18")]
    FifteenEighteenths,
    #[strum(serialize = "AVG")]
    Average
}

/// A score a player can compare their result against
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePoint {
    pub label: ReferenceLabel,
    pub score: i32,
    pub bpi: BpiResult
}

/// Reference points for a song in display order: WR, 17/18, 89%, 15/18, AVG.
///
/// Points whose score is unknown are omitted. A song without a note count has
/// no points at all.
pub fn reference_points(song: &SongReference, calculator: &BpiCalculator) -> Vec<ReferencePoint> {
    let (Some(notes), Some(max_score)) = (song.notes, song.max_score()) else {
        return Vec::new();
    };

    let candidates = [
        (ReferenceLabel::WorldRecord, song.wr),
        (ReferenceLabel::MaxMinus, fraction_of(max_score, MAX_MINUS_NUMERATOR)),
        (ReferenceLabel::Aaa, aaa_score(notes)),
        (
            ReferenceLabel::FifteenEighteenths,
            fraction_of(max_score, FIFTEEN_EIGHTEENTHS_NUMERATOR)
        ),
        (ReferenceLabel::Average, song.avg)
    ];

    candidates
        .into_iter()
        .filter_map(|(label, score)| score.map(|s| (label, s)))
        .map(|(label, score)| ReferencePoint {
            label,
            score,
            bpi: calculator.calculate(score, song)
        })
        .collect()
}

/// Smallest score reaching `numerator / 18` of the maximum, `None` if it does not fit a score
fn fraction_of(max_score: i64, numerator: i32) -> Option<i32> {
    let scaled = max_score * i64::from(numerator);
    let denominator = i64::from(EIGHTEENTHS);

    i32::try_from((scaled + denominator - 1) / denominator).ok()
}

//! # BPI (Beat Power Indicator)
//!
//! Converts a raw score into an index calibrated against two anchors of the
//! chart: the top-tier average score (BPI 0) and the world record (BPI 100).
//!
//! Steps:
//! 1. Each score is turned into a rate of the theoretical maximum (`notes * 2`).
//! 2. Rates are stretched by the growth transform [`pgf`] so that points near
//!    the maximum are worth more than points near the midpoint.
//! 3. The transformed player and world record values are normalized by the
//!    transformed average and taken to the log domain.
//! 4. The ratio of the two logs is raised to the chart's difficulty coefficient
//!    `p`, keeping the sign of the player's position relative to the average.
//!
//! Inputs for which the index is undefined produce a [`BpiUnavailable`] error
//! instead of a number.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    constants::{
        AAA_RATE, BPI_PRECISION, BPI_SCALE, DEFAULT_COEFFICIENT, PERFECT_SCORE_FALLBACK, POINTS_PER_NOTE,
        UNAVAILABLE_BPI
    },
    structures::song_reference::SongReference
};

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BpiUnavailable {
    #[error("song is missing notes, average or world record")]
    MissingCalibration,

    #[error("score must be positive")]
    NonPositiveScore,

    #[error("score rate {rate} is outside (0, 1]")]
    RateOutOfRange { rate: f64 },

    #[error("world record does not exceed the average")]
    DegenerateWorldRecord
}

pub type BpiResult = Result<f64, BpiUnavailable>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BpiConfig {
    /// Exponent `p` used for charts without their own coefficient
    pub default_coefficient: f64
}

impl Default for BpiConfig {
    fn default() -> Self {
        BpiConfig {
            default_coefficient: DEFAULT_COEFFICIENT
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BpiCalculator {
    config: BpiConfig
}

impl BpiCalculator {
    pub fn new(config: BpiConfig) -> BpiCalculator {
        BpiCalculator { config }
    }

    /// The coefficient `p` applied to `song`. Unset, zero, negative and
    /// non-finite coefficients fall back to the configured default.
    pub fn coefficient(&self, song: &SongReference) -> f64 {
        song.coefficient
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or(self.config.default_coefficient)
    }

    pub fn calculate(&self, raw_score: i32, song: &SongReference) -> BpiResult {
        self.unrounded(raw_score, song).map(round_bpi)
    }

    /// BPI of the AAA-equivalent score, independent of any player's result
    pub fn calculate_aaa(&self, song: &SongReference) -> BpiResult {
        let (notes, _, _) = calibration(song)?;
        let score = aaa_score(notes).ok_or(BpiUnavailable::MissingCalibration)?;

        self.calculate(score, song)
    }

    fn unrounded(&self, raw_score: i32, song: &SongReference) -> BpiResult {
        let (notes, avg, wr) = calibration(song)?;

        if raw_score <= 0 {
            return Err(BpiUnavailable::NonPositiveScore);
        }

        let max_score = i64::from(notes) * i64::from(POINTS_PER_NOTE);
        let max = max_score as f64;

        let user_rate = raw_score as f64 / max;
        let avg_rate = avg as f64 / max;
        let wr_rate = wr as f64 / max;

        for rate in [user_rate, avg_rate, wr_rate] {
            if rate <= 0.0 || rate > 1.0 {
                return Err(BpiUnavailable::RateOutOfRange { rate });
            }
        }

        let s = pgf(user_rate, Some(max_score));
        let k = pgf(avg_rate, Some(max_score));
        let z = pgf(wr_rate, Some(max_score));

        let ln_s = (s / k).ln();
        let ln_z = (z / k).ln();

        if ln_z.is_nan() || ln_z <= 0.0 {
            return Err(BpiUnavailable::DegenerateWorldRecord);
        }

        let p = self.coefficient(song);

        let bpi = if raw_score >= avg {
            BPI_SCALE * (ln_s / ln_z).powf(p)
        } else {
            -BPI_SCALE * (-ln_s / ln_z).powf(p)
        };

        Ok(bpi)
    }
}

/// Computes the BPI of `raw_score` on `song` with the default coefficient.
pub fn calculate_bpi(raw_score: i32, song: &SongReference) -> BpiResult {
    BpiCalculator::default().calculate(raw_score, song)
}

/// Computes the BPI of the AAA-equivalent score on `song` with the default coefficient.
pub fn calculate_aaa_bpi(song: &SongReference) -> BpiResult {
    BpiCalculator::default().calculate_aaa(song)
}

/// The canonical AAA-grade score, 88.9% of the theoretical maximum.
///
/// `None` when the note count is not positive or the score would not fit an `i32`.
pub fn aaa_score(notes: i32) -> Option<i32> {
    if notes <= 0 {
        return None;
    }

    let max = f64::from(notes) * f64::from(POINTS_PER_NOTE);
    i32::try_from(round_half_up(max * AAA_RATE) as i64).ok()
}

/// Growth transform applied to a score rate.
///
/// Stretches rates near 1 and compresses rates near 0.5. The transform is
/// undefined at exactly 1, so a perfect rate maps to the maximum score.
pub fn pgf(rate: f64, max_score: Option<i64>) -> f64 {
    if rate >= 1.0 {
        return match max_score {
            Some(max) if max > 0 => max as f64,
            _ => PERFECT_SCORE_FALLBACK
        };
    }

    1.0 + (rate - 0.5) / (1.0 - rate)
}

/// Converts a result into the legacy numeric form where `-999` marks an unavailable BPI.
pub fn to_legacy(result: BpiResult) -> f64 {
    result.unwrap_or(UNAVAILABLE_BPI)
}

/// Reads a legacy numeric BPI, treating the `-999` marker as unavailable.
pub fn from_legacy(value: f64) -> Option<f64> {
    if value == UNAVAILABLE_BPI || !value.is_finite() {
        return None;
    }

    Some(value)
}

fn calibration(song: &SongReference) -> Result<(i32, i32, i32), BpiUnavailable> {
    match (song.notes, song.avg, song.wr) {
        (Some(notes), Some(avg), Some(wr)) if notes > 0 && avg > 0 && wr > 0 => Ok((notes, avg, wr)),
        _ => Err(BpiUnavailable::MissingCalibration)
    }
}

fn round_bpi(bpi: f64) -> f64 {
    round_half_up(bpi * BPI_PRECISION) / BPI_PRECISION
}

/// Rounds halves towards positive infinity
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

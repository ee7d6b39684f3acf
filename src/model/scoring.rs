use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    database::db_structs::{BpiUpdate, Song, UserScore},
    model::{
        bpi::{BpiCalculator, BpiResult, BpiUnavailable},
        structures::{grade::Grade, score_submission::ScoreSubmission}
    }
};

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("submission is for song {submitted} but song {provided} was provided")]
    SongMismatch { submitted: i32, provided: i32 },

    #[error("submission for song {0} has neither a grade nor a usable score")]
    MissingGrade(i32)
}

/// Builds the row to persist for a submission.
///
/// The BPI is recomputed from the submitted score; whatever BPI a client
/// may have shown is never trusted. A missing grade is derived from the score.
pub fn evaluate_submission(
    submission: &ScoreSubmission,
    song: &Song,
    calculator: &BpiCalculator,
    now: DateTime<FixedOffset>
) -> Result<UserScore, ScoringError> {
    if submission.song_id != song.id {
        return Err(ScoringError::SongMismatch {
            submitted: submission.song_id,
            provided: song.id
        });
    }

    let reference = song.reference();
    let grade = submission
        .grade
        .or_else(|| {
            let score = submission.score?;
            Grade::from_score(score, reference.max_score()?)
        })
        .ok_or(ScoringError::MissingGrade(song.id))?;

    let bpi = submission
        .score
        .map(|score| calculator.calculate(score, &reference))
        .and_then(|result| log_unavailable(submission.user_id, song.id, result));

    Ok(UserScore {
        user_id: submission.user_id,
        song_id: submission.song_id,
        grade,
        score: submission.score,
        bpi,
        achieved_at: now
    })
}

/// Recomputes the BPI of every stored score against the current catalog.
///
/// Calibration data changes whenever the master data is refreshed, so stored
/// values go stale. Scores referencing songs missing from `songs` are skipped.
pub fn recalculate_bpi(songs: &[Song], scores: &[UserScore], calculator: &BpiCalculator) -> Vec<BpiUpdate> {
    let songs_by_id: HashMap<i32, &Song> = songs.iter().map(|s| (s.id, s)).collect();

    let updates: Vec<BpiUpdate> = scores
        .par_iter()
        .filter_map(|score| {
            let Some(song) = songs_by_id.get(&score.song_id) else {
                warn!(
                    user_id = score.user_id,
                    song_id = score.song_id,
                    "Score references an unknown song, skipping"
                );
                return None;
            };

            let bpi = score
                .score
                .map(|s| calculator.calculate(s, &song.reference()))
                .and_then(|result| log_unavailable(score.user_id, song.id, result));

            Some(BpiUpdate {
                user_id: score.user_id,
                song_id: score.song_id,
                bpi,
                changed: bpi != score.bpi
            })
        })
        .collect();

    let changed = updates.iter().filter(|u| u.changed).count();
    info!("Recalculated {} scores, {} changed", updates.len(), changed);

    updates
}

fn log_unavailable(user_id: i32, song_id: i32, result: BpiResult) -> Option<f64> {
    result
        .map_err(|reason: BpiUnavailable| {
            debug!(user_id, song_id, %reason, "BPI unavailable");
        })
        .ok()
}

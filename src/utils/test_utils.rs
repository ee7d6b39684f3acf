use crate::{
    database::db_structs::{Song, UserScore},
    model::{
        bpi::calculate_bpi,
        constants::POINTS_PER_NOTE,
        structures::{difficulty::Difficulty, grade::Grade}
    }
};
use chrono::{DateTime, FixedOffset};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn test_timestamp() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("2024-06-01T12:00:00+09:00").unwrap()
}

pub fn generate_song(id: i32, notes: i32, avg: i32, wr: i32) -> Song {
    Song {
        id,
        title: format!("Test Song {}", id),
        difficulty: Difficulty::Another,
        level: 12,
        notes: Some(notes),
        bpm: Some("150".to_string()),
        wr: Some(wr),
        avg: Some(avg),
        coefficient: None
    }
}

/// Generates `n` calibrated songs with `0 < avg < wr <= notes * 2`.
///
/// Seeded so results are reproducible between runs.
pub fn generate_songs(n: i32, seed: u64) -> Vec<Song> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (1..=n)
        .map(|id| {
            let notes = rng.random_range(600..=2400);
            let max = notes * POINTS_PER_NOTE;
            let avg = (max as f64 * rng.random_range(0.70..0.92)) as i32;
            let wr = rng.random_range(avg + 1..=max);

            let mut song = generate_song(id, notes, avg, wr);
            song.level = rng.random_range(11..=12);
            if rng.random_bool(0.2) {
                song.coefficient = Some(rng.random_range(1.0..2.0));
            }

            song
        })
        .collect()
}

/// One score per song, spread between half of the maximum and the maximum
pub fn generate_user_scores(user_id: i32, songs: &[Song], seed: u64) -> Vec<UserScore> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    songs
        .iter()
        .filter_map(|song| {
            let max = song.reference().max_score()?;
            let score = i32::try_from(rng.random_range(max / 2..=max)).ok()?;

            Some(UserScore {
                user_id,
                song_id: song.id,
                grade: Grade::from_score(score, max)?,
                score: Some(score),
                bpi: calculate_bpi(score, &song.reference()).ok(),
                achieved_at: test_timestamp()
            })
        })
        .collect()
}

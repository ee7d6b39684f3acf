use std::collections::{BTreeMap, HashSet};

use itertools::Itertools;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
    database::db_structs::{Song, UserScore},
    model::structures::grade::Grade
};

/// Summary of a player's progress through the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub total_songs: usize,
    pub played_songs: usize,
    /// Percentage of the catalog with a recorded score
    pub play_rate: f64,
    /// Count per grade, every grade present
    pub grade_distribution: BTreeMap<Grade, usize>,
    /// Mean over played songs with a computable BPI
    pub average_bpi: Option<f64>
}

impl StatsOverview {
    /// Only scores for songs present in `songs` are counted, so filtering the
    /// catalog narrows the overview as well.
    pub fn new(songs: &[Song], scores: &[UserScore]) -> StatsOverview {
        let song_ids: HashSet<i32> = songs.iter().map(|s| s.id).collect();
        let played = scores
            .iter()
            .filter(|s| song_ids.contains(&s.song_id))
            .unique_by(|s| s.song_id)
            .collect_vec();

        let total_songs = song_ids.len();
        let played_songs = played.len();
        let play_rate = if total_songs > 0 {
            played_songs as f64 / total_songs as f64 * 100.0
        } else {
            0.0
        };

        let counts = played.iter().map(|s| s.grade).counts();
        let grade_distribution = Grade::iter()
            .map(|g| (g, counts.get(&g).copied().unwrap_or(0)))
            .collect();

        let bpis = played.iter().filter_map(|s| s.bpi).collect_vec();
        let average_bpi = if bpis.is_empty() {
            None
        } else {
            Some(bpis.iter().sum::<f64>() / bpis.len() as f64)
        };

        StatsOverview {
            total_songs,
            played_songs,
            play_rate,
            grade_distribution,
            average_bpi
        }
    }
}

use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    database::db_structs::Song,
    model::{
        bpi::{aaa_score, BpiCalculator},
        structures::difficulty::Difficulty
    }
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SongFilter {
    pub level: Option<i32>,
    /// Case-insensitive title substring
    pub search: Option<String>
}

impl SongFilter {
    pub fn matches(&self, song: &Song) -> bool {
        let matches_level = self.level.map_or(true, |level| song.level == level);
        let matches_search = match &self.search {
            Some(search) if !search.is_empty() => song.title.to_lowercase().contains(&search.to_lowercase()),
            _ => true
        };

        matches_level && matches_search
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending
}

/// A catalog entry ranked by how hard it is to reach the AAA score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRanking {
    pub song_id: i32,
    pub title: String,
    pub difficulty: Difficulty,
    pub level: i32,
    pub aaa_score: Option<i32>,
    pub aaa_bpi: Option<f64>
}

/// Filters the catalog and sorts it by AAA BPI.
///
/// Songs without a computable AAA BPI are listed last in either order.
/// Ties are broken by level, then title.
pub fn rank_songs(songs: &[Song], filter: &SongFilter, order: SortOrder, calculator: &BpiCalculator) -> Vec<SongRanking> {
    songs
        .iter()
        .filter(|song| filter.matches(song))
        .map(|song| {
            let reference = song.reference();

            SongRanking {
                song_id: song.id,
                title: song.title.clone(),
                difficulty: song.difficulty,
                level: song.level,
                aaa_score: song.notes.and_then(aaa_score),
                aaa_bpi: calculator.calculate_aaa(&reference).ok()
            }
        })
        .sorted_by(|a, b| compare_rankings(a, b, order))
        .collect()
}

fn compare_rankings(a: &SongRanking, b: &SongRanking, order: SortOrder) -> Ordering {
    let by_bpi = match (a.aaa_bpi, b.aaa_bpi) {
        (Some(x), Some(y)) => match order {
            SortOrder::Ascending => x.total_cmp(&y),
            SortOrder::Descending => y.total_cmp(&x)
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal
    };

    by_bpi.then_with(|| a.level.cmp(&b.level)).then_with(|| a.title.cmp(&b.title))
}

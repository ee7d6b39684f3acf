pub mod bpi_tier;
pub mod difficulty;
pub mod grade;
pub mod score_submission;
pub mod song_reference;

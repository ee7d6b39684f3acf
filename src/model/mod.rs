//! Pure domain logic: the BPI engine and everything computed from it.
//! Nothing in this module performs I/O.

pub mod bpi;
pub mod catalog;
pub mod constants;
pub mod scoring;
pub mod stats;
pub mod structures;
pub mod thresholds;

pub use bpi::{
    aaa_score, calculate_aaa_bpi, calculate_bpi, BpiCalculator, BpiConfig, BpiResult, BpiUnavailable
};

// Engine constants
pub const DEFAULT_COEFFICIENT: f64 = 1.5;
pub const POINTS_PER_NOTE: i32 = 2;
pub const AAA_RATE: f64 = 0.889;
/// Used by the growth transform for a perfect score when the chart size is unknown
pub const PERFECT_SCORE_FALLBACK: f64 = 100000.0;
pub const BPI_SCALE: f64 = 100.0;
pub const BPI_PRECISION: f64 = 1000.0;
/// Numeric stand-in for an unavailable BPI in legacy storage
pub const UNAVAILABLE_BPI: f64 = -999.0;
// Reference point fractions of the theoretical maximum
pub const MAX_MINUS_NUMERATOR: i32 = 17;
pub const FIFTEEN_EIGHTEENTHS_NUMERATOR: i32 = 15;
pub const EIGHTEENTHS: i32 = 18;
// Grades are awarded in ninths of the theoretical maximum
pub const GRADE_DENOMINATOR: i32 = 9;

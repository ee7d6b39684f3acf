use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// Display band for a BPI value
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum BpiTier {
    #[strum(serialize = "MAX")]
    Max,
    #[strum(serialize = "AAA")]
    Aaa,
    #[strum(serialize = "AA")]
    Aa,
    #[strum(serialize = "A")]
    A,
    #[strum(serialize = "B")]
    B,
    #[strum(serialize = "C")]
    C,
    #[strum(serialize = "D")]
    D,
    #[strum(serialize = "E")]
    E,
    #[strum(serialize = "F")]
    F
}

impl BpiTier {
    pub fn lower_bound(&self) -> f64 {
        match self {
            BpiTier::Max => 100.0,
            BpiTier::Aaa => 90.0,
            BpiTier::Aa => 80.0,
            BpiTier::A => 70.0,
            BpiTier::B => 60.0,
            BpiTier::C => 50.0,
            BpiTier::D => 40.0,
            BpiTier::E => 30.0,
            BpiTier::F => 0.0
        }
    }

    /// Negative values fall below every band.
    pub fn from_bpi(bpi: f64) -> Option<BpiTier> {
        use strum::IntoEnumIterator;

        BpiTier::iter().find(|tier| bpi >= tier.lower_bound())
    }
}

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Chart difficulties tracked by the catalog. Stored by name.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Difficulty {
    Hyper,
    Another,
    Leggendaria
}

impl Difficulty {
    /// Maps the difficulty codes used by the master data feed.
    /// Level 12 ANOTHER and LEGGENDARIA charts use their own codes.
    pub fn from_code(code: &str) -> Option<Difficulty> {
        match code {
            "3" => Some(Difficulty::Hyper),
            "4" | "9" => Some(Difficulty::Another),
            "10" | "11" => Some(Difficulty::Leggendaria),
            _ => None
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// River region where a seine station sits, relative to the Lisbon Weir.
///
/// The survey only distinguishes stations above ("AL") and below ("BL") the
/// weir; records carrying any other region code are discarded at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "AL")]
    AboveLisbon,
    #[serde(rename = "BL")]
    BelowLisbon,
}

impl Region {
    /// The two-letter code used in the survey CSV.
    pub fn code(&self) -> &'static str {
        match self {
            Region::AboveLisbon => "AL",
            Region::BelowLisbon => "BL",
        }
    }

    /// All regions, in a fixed order.
    pub fn all() -> [Region; 2] {
        [Region::AboveLisbon, Region::BelowLisbon]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AL" => Ok(Region::AboveLisbon),
            "BL" => Ok(Region::BelowLisbon),
            _ => Err(()),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sacramento Valley water-year classification for a water year.
///
/// The survey CSV carries either the index code ("W", "AN", ...) or the
/// spelled-out name ("Wet", "Above Normal", ...); both parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WaterYearType {
    #[serde(rename = "Wet")]
    Wet,
    #[serde(rename = "Above Normal")]
    AboveNormal,
    #[serde(rename = "Below Normal")]
    BelowNormal,
    #[serde(rename = "Dry")]
    Dry,
    #[serde(rename = "Critical")]
    Critical,
}

impl WaterYearType {
    /// The short index code used by the DWR classification.
    pub fn code(&self) -> &'static str {
        match self {
            WaterYearType::Wet => "W",
            WaterYearType::AboveNormal => "AN",
            WaterYearType::BelowNormal => "BN",
            WaterYearType::Dry => "D",
            WaterYearType::Critical => "C",
        }
    }

    /// The spelled-out name, as used in plot labels.
    pub fn name(&self) -> &'static str {
        match self {
            WaterYearType::Wet => "Wet",
            WaterYearType::AboveNormal => "Above Normal",
            WaterYearType::BelowNormal => "Below Normal",
            WaterYearType::Dry => "Dry",
            WaterYearType::Critical => "Critical",
        }
    }

    /// All classifications from wettest to driest.
    pub fn all() -> [WaterYearType; 5] {
        [
            WaterYearType::Wet,
            WaterYearType::AboveNormal,
            WaterYearType::BelowNormal,
            WaterYearType::Dry,
            WaterYearType::Critical,
        ]
    }
}

impl fmt::Display for WaterYearType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaterYearType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "W" | "Wet" => Ok(WaterYearType::Wet),
            "AN" | "Above Normal" => Ok(WaterYearType::AboveNormal),
            "BN" | "Below Normal" => Ok(WaterYearType::BelowNormal),
            "D" | "Dry" => Ok(WaterYearType::Dry),
            "C" | "Critical" => Ok(WaterYearType::Critical),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WaterYearType;
    use std::str::FromStr;

    #[test]
    fn test_parse_code_and_name() {
        for wyt in WaterYearType::all() {
            assert_eq!(WaterYearType::from_str(wyt.code()), Ok(wyt));
            assert_eq!(WaterYearType::from_str(wyt.name()), Ok(wyt));
        }
        assert!(WaterYearType::from_str("Soggy").is_err());
    }
}

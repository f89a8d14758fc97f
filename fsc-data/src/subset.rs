//! Taxonomic-family subsetting ahead of the community analysis.

use fsc_core::AggregatedCpue;

/// The two families the community comparison is scoped to: native minnows
/// and introduced sunfishes.
pub const FAMILIES_OF_INTEREST: [&str; 2] = ["Cyprinidae", "Centrarchidae"];

/// Retain aggregated rows belonging to the families of interest.
pub fn subset_families(rows: Vec<AggregatedCpue>) -> Vec<AggregatedCpue> {
    rows.into_iter()
        .filter(|row| FAMILIES_OF_INTEREST.contains(&row.family.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::subset_families;
    use fsc_core::{AggregatedCpue, Region, WaterYearType};

    fn row(family: &str, name: &str) -> AggregatedCpue {
        AggregatedCpue {
            water_year: 2014,
            water_year_type: WaterYearType::Critical,
            region: Region::BelowLisbon,
            family: family.to_string(),
            common_name: name.to_string(),
            mean_cpue: 1.0,
            fourth_root_cpue: 1.0,
        }
    }

    #[test]
    fn test_families_filter() {
        let rows = vec![
            row("Cyprinidae", "Splittail"),
            row("Centrarchidae", "Bluegill"),
            row("Atherinopsidae", "Mississippi Silverside"),
            row("Ictaluridae", "White Catfish"),
        ];
        let kept = subset_families(rows);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.family == "Cyprinidae" || r.family == "Centrarchidae"));
    }
}

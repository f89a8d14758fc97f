//! Mean-CPUE aggregation with the fourth-root variance-stabilizing
//! transform.

use fsc_core::{AggregatedCpue, Region, SeineSample, WaterYearType};
use std::collections::BTreeMap;

/// The variance-stabilizing transform applied to group means before
/// ordination. Means are non-negative by the CPUE invariant.
pub fn fourth_root(x: f64) -> f64 {
    x.powf(0.25)
}

type GroupKey = (i32, WaterYearType, Region, String, String);

/// Group cleaned samples by (water year, water-year type, region, family,
/// common name) and compute the arithmetic mean CPUE per group, plus its
/// fourth-root transform.
///
/// One output row per observed group, in sorted group-key order; no
/// synthetic zero groups are added here (the wide pivot zero-fills).
pub fn aggregate_mean_cpue(samples: &[SeineSample]) -> Vec<AggregatedCpue> {
    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for sample in samples {
        let key = (
            sample.water_year,
            sample.water_year_type,
            sample.region,
            sample.family.clone(),
            sample.common_name.clone(),
        );
        groups.entry(key).or_default().push(sample.cpue);
    }

    groups
        .into_iter()
        .map(|((water_year, water_year_type, region, family, common_name), values)| {
            let mean_cpue = values.iter().sum::<f64>() / values.len() as f64;
            AggregatedCpue {
                water_year,
                water_year_type,
                region,
                family,
                common_name,
                mean_cpue,
                fourth_root_cpue: fourth_root(mean_cpue),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{aggregate_mean_cpue, fourth_root};
    use chrono::NaiveDate;
    use fsc_core::{Region, SeineSample, WaterYearType};

    fn bluegill(cpue: f64) -> SeineSample {
        SeineSample {
            sample_date: NaiveDate::from_ymd_opt(2012, 5, 1).unwrap(),
            water_year: 2012,
            water_year_type: WaterYearType::BelowNormal,
            station_code: "AL1".to_string(),
            region: Region::AboveLisbon,
            family: "Centrarchidae".to_string(),
            common_name: "Bluegill".to_string(),
            count: 4,
            cpue,
        }
    }

    #[test]
    fn test_mean_and_fourth_root() {
        let samples = vec![bluegill(2.0), bluegill(4.0)];
        let aggregated = aggregate_mean_cpue(&samples);
        assert_eq!(aggregated.len(), 1);
        let row = &aggregated[0];
        assert_eq!(row.water_year, 2012);
        assert_eq!(row.region, Region::AboveLisbon);
        assert_eq!(row.common_name, "Bluegill");
        assert!((row.mean_cpue - 3.0).abs() < 1e-12);
        assert!((row.fourth_root_cpue - 3.0_f64.powf(0.25)).abs() < 1e-12);
        assert!((row.fourth_root_cpue - 1.316).abs() < 1e-3);
    }

    #[test]
    fn test_one_row_per_group() {
        let mut splittail = bluegill(1.0);
        splittail.family = "Cyprinidae".to_string();
        splittail.common_name = "Splittail".to_string();
        let mut other_region = bluegill(5.0);
        other_region.region = Region::BelowLisbon;

        let samples = vec![bluegill(2.0), splittail, other_region, bluegill(4.0)];
        let aggregated = aggregate_mean_cpue(&samples);
        assert_eq!(aggregated.len(), 3);
        // sorted group-key order is deterministic
        let names: Vec<&str> = aggregated.iter().map(|a| a.common_name.as_str()).collect();
        assert_eq!(names, vec!["Bluegill", "Bluegill", "Splittail"]);
    }

    #[test]
    fn test_fourth_root_of_zero_and_one() {
        assert_eq!(fourth_root(0.0), 0.0);
        assert_eq!(fourth_root(1.0), 1.0);
        assert!((fourth_root(16.0) - 2.0).abs() < 1e-12);
    }
}

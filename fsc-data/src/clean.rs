//! Cleaning rules for raw seine samples.
//!
//! The exclusion and correction rules are literal, versioned data reviewed
//! against the survey record, not inferred logic: invertebrate bycatch taxa,
//! a taxon-name correction, and a table of individually flagged records from
//! duplicate-sampling and gear-failure events.

use fsc_core::dates;
use fsc_core::SeineSample;
use log::info;

/// Non-fish taxa that show up in the raw export and are dropped outright.
pub const EXCLUDED_TAXA: [&str; 2] = ["Siberian Prawn", "Mississippi Grass Shrimp"];

/// Taxon-name corrections applied before any filtering.
/// AFS renamed the species in 2013; older survey rows carry the old name.
pub const TAXON_RENAMES: [(&str, &str); 1] = [("Inland Silverside", "Mississippi Silverside")];

/// Records before this water year predate the standardized seining protocol.
/// Cleaning keeps water years strictly greater than this.
pub const LAST_EXCLUDED_WATER_YEAR: i32 = 2010;

/// Manually identified erroneous records: (sample date, common name,
/// station, count). Each entry was flagged during QA as a duplicate haul or
/// a gear-failure set and is removed by exact match.
pub const KNOWN_BAD_SAMPLES: [(&str, &str, &str, u32); 4] = [
    ("2011-06-27", "Splittail", "BL5", 6),
    ("2011-06-27", "Mississippi Silverside", "BL5", 18),
    ("2011-06-27", "Bluegill", "BL5", 2),
    ("2019-07-09", "Red Shiner", "AL2", 1),
];

/// Returns true if the sample matches one of the flagged erroneous records.
pub fn is_known_bad(sample: &SeineSample) -> bool {
    let date = dates::format_date(&sample.sample_date);
    KNOWN_BAD_SAMPLES.iter().any(|(bad_date, taxon, station, count)| {
        date == *bad_date
            && sample.common_name == *taxon
            && sample.station_code == *station
            && sample.count == *count
    })
}

/// Apply all cleaning rules to raw samples.
///
/// Order matters: taxon renames happen first so that the exclusion list and
/// the flagged-record table both see corrected names, then the row filters
/// run, then exact duplicates are removed.
pub fn clean_samples(mut samples: Vec<SeineSample>) -> Vec<SeineSample> {
    let raw_count = samples.len();

    for sample in &mut samples {
        for (from, to) in TAXON_RENAMES {
            if sample.common_name == from {
                sample.common_name = to.to_string();
            }
        }
    }

    samples.retain(|sample| {
        !EXCLUDED_TAXA.contains(&sample.common_name.as_str())
            && sample.water_year > LAST_EXCLUDED_WATER_YEAR
            && sample.cpue != 0.0
            && !is_known_bad(sample)
    });

    let samples = dedup_exact(samples);
    info!("cleaned samples: {} raw, {} kept", raw_count, samples.len());
    samples
}

/// Remove exact-duplicate records (full-record equality). Idempotent.
pub fn dedup_exact(mut samples: Vec<SeineSample>) -> Vec<SeineSample> {
    samples.sort_by(|a, b| {
        a.sample_date
            .cmp(&b.sample_date)
            .then_with(|| a.common_name.cmp(&b.common_name))
            .then_with(|| a.station_code.cmp(&b.station_code))
            .then_with(|| a.count.cmp(&b.count))
            .then_with(|| a.cpue.total_cmp(&b.cpue))
            .then_with(|| a.water_year.cmp(&b.water_year))
            .then_with(|| a.water_year_type.cmp(&b.water_year_type))
            .then_with(|| a.region.cmp(&b.region))
            .then_with(|| a.family.cmp(&b.family))
    });
    samples.dedup_by(|a, b| a == b);
    samples
}

#[cfg(test)]
mod tests {
    use super::{clean_samples, dedup_exact, is_known_bad, EXCLUDED_TAXA};
    use chrono::NaiveDate;
    use fsc_core::{Region, SeineSample, WaterYearType};

    fn sample(
        date: (i32, u32, u32),
        water_year: i32,
        station: &str,
        name: &str,
        count: u32,
        cpue: f64,
    ) -> SeineSample {
        SeineSample {
            sample_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            water_year,
            water_year_type: WaterYearType::Dry,
            station_code: station.to_string(),
            region: Region::BelowLisbon,
            family: "Cyprinidae".to_string(),
            common_name: name.to_string(),
            count,
            cpue,
        }
    }

    #[test]
    fn test_cleaned_rows_satisfy_invariants() {
        let raw = vec![
            sample((2012, 5, 1), 2012, "AL1", "Bluegill", 4, 0.2),
            sample((2012, 5, 1), 2012, "AL1", "Siberian Prawn", 9, 0.4),
            sample((2012, 5, 1), 2012, "AL1", "Mississippi Grass Shrimp", 2, 0.1),
            sample((2009, 5, 1), 2009, "AL1", "Bluegill", 4, 0.2),
            sample((2012, 5, 1), 2012, "AL1", "Splittail", 0, 0.0),
        ];
        let cleaned = clean_samples(raw);
        assert_eq!(cleaned.len(), 1);
        for row in &cleaned {
            assert!(row.cpue > 0.0);
            assert!(row.water_year > 2010);
            assert!(!EXCLUDED_TAXA.contains(&row.common_name.as_str()));
        }
    }

    #[test]
    fn test_rename_applies_before_filtering() {
        let raw = vec![sample((2013, 6, 3), 2013, "BL2", "Inland Silverside", 7, 0.3)];
        let cleaned = clean_samples(raw);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].common_name, "Mississippi Silverside");
    }

    #[test]
    fn test_known_bad_splittail_record_excluded() {
        let anomaly = sample((2011, 6, 27), 2011, "BL5", "Splittail", 6, 0.24);
        assert!(is_known_bad(&anomaly));
        // would pass every other filter; the literal table still removes it
        let cleaned = clean_samples(vec![anomaly]);
        assert!(cleaned.is_empty());

        // same taxon/station/count on a different date survives
        let ordinary = sample((2011, 7, 4), 2011, "BL5", "Splittail", 6, 0.24);
        assert!(!is_known_bad(&ordinary));
        assert_eq!(clean_samples(vec![ordinary]).len(), 1);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let raw = vec![
            sample((2012, 5, 1), 2012, "AL1", "Bluegill", 4, 0.2),
            sample((2012, 5, 1), 2012, "AL1", "Bluegill", 4, 0.2),
            sample((2012, 5, 1), 2012, "AL1", "Bluegill", 4, 0.25),
        ];
        let once = dedup_exact(raw);
        assert_eq!(once.len(), 2);
        let twice = dedup_exact(once.clone());
        assert_eq!(once, twice);
    }
}

use crate::dates;
use crate::error::CoreError;
use crate::region::Region;
use crate::water_year::WaterYearType;
use chrono::NaiveDate;
use csv::ReaderBuilder;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// A raw row from the beach-seine survey export, as it appears in the CSV.
///
/// Kept string-typed so one bad cell produces a row-addressed error (or a
/// skip, for unknown regions) instead of a csv-internal deserialize failure.
#[derive(Debug, Deserialize)]
struct RawSeineRecord {
    #[serde(rename = "SampleDate")]
    sample_date: String,
    #[serde(rename = "WaterYear")]
    water_year: i32,
    #[serde(rename = "WaterYearType")]
    water_year_type: String,
    #[serde(rename = "StationCode")]
    station_code: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Family")]
    family: String,
    #[serde(rename = "CommonName")]
    common_name: String,
    #[serde(rename = "Count")]
    count: u32,
    #[serde(rename = "Cpue")]
    cpue: f64,
}

/// A single beach-seine sample record: one taxon caught at one station on
/// one date, with its catch-per-unit-effort.
#[derive(Debug, Clone, PartialEq)]
pub struct SeineSample {
    pub sample_date: NaiveDate,
    pub water_year: i32,
    pub water_year_type: WaterYearType,
    pub station_code: String,
    pub region: Region,
    pub family: String,
    pub common_name: String,
    pub count: u32,
    pub cpue: f64,
}

impl SeineSample {
    /// Load sample records from a CSV file on disk.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Vec<SeineSample>, CoreError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    /// Load sample records from any CSV source.
    ///
    /// Rows with a region code outside the surveyed set are dropped (and
    /// counted in a warning); malformed dates, water-year types, or negative
    /// CPUE values abort the load.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<SeineSample>, CoreError> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let mut samples = Vec::new();
        let mut skipped_regions = 0usize;
        for (index, result) in rdr.deserialize::<RawSeineRecord>().enumerate() {
            let row = index + 2; // 1-based, after the header line
            let raw = result?;
            let region = match Region::from_str(&raw.region) {
                Ok(region) => region,
                Err(()) => {
                    skipped_regions += 1;
                    continue;
                }
            };
            let sample_date = dates::parse_date(&raw.sample_date).ok_or(CoreError::BadDate {
                row,
                value: raw.sample_date.clone(),
            })?;
            let water_year_type = WaterYearType::from_str(&raw.water_year_type).map_err(|()| {
                CoreError::BadWaterYearType {
                    row,
                    value: raw.water_year_type.clone(),
                }
            })?;
            if raw.cpue < 0.0 {
                return Err(CoreError::NegativeCpue {
                    row,
                    value: raw.cpue,
                });
            }
            samples.push(SeineSample {
                sample_date,
                water_year: raw.water_year,
                water_year_type,
                station_code: raw.station_code,
                region,
                family: raw.family,
                common_name: raw.common_name,
                count: raw.count,
                cpue: raw.cpue,
            });
        }
        if skipped_regions > 0 {
            warn!("dropped {skipped_regions} records with unknown region codes");
        }
        Ok(samples)
    }
}

/// The site unit of the community matrix: one water year in one region
/// under one water-year classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteKey {
    pub water_year: i32,
    pub water_year_type: WaterYearType,
    pub region: Region,
}

impl fmt::Display for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})",
            self.water_year,
            self.region,
            self.water_year_type.code()
        )
    }
}

/// One row of the aggregated CPUE table: group mean and its fourth-root
/// transform for a taxon within a site unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedCpue {
    #[serde(rename = "WaterYear")]
    pub water_year: i32,
    #[serde(rename = "WaterYearType")]
    pub water_year_type: WaterYearType,
    #[serde(rename = "Region")]
    pub region: Region,
    #[serde(rename = "Family")]
    pub family: String,
    #[serde(rename = "CommonName")]
    pub common_name: String,
    #[serde(rename = "MeanCpue")]
    pub mean_cpue: f64,
    #[serde(rename = "FourthRootCpue")]
    pub fourth_root_cpue: f64,
}

impl AggregatedCpue {
    pub fn site_key(&self) -> SiteKey {
        SiteKey {
            water_year: self.water_year,
            water_year_type: self.water_year_type,
            region: self.region,
        }
    }
}

//! Cleaned-table export: run the cleaning and aggregation stages and write
//! the long aggregated CPUE table for inspection.

use fsc_core::SeineSample;
use fsc_data::aggregate::aggregate_mean_cpue;
use fsc_data::clean::clean_samples;
use log::info;

pub fn run_clean(samples_csv: &str, aggregated_csv: &str) -> anyhow::Result<()> {
    let samples = SeineSample::from_csv_path(samples_csv)?;
    info!("loaded {} raw records from {}", samples.len(), samples_csv);

    let cleaned = clean_samples(samples);
    let aggregated = aggregate_mean_cpue(&cleaned);

    let mut writer = csv::Writer::from_path(aggregated_csv)?;
    for row in &aggregated {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(
        "wrote {} aggregated rows to {}",
        aggregated.len(),
        aggregated_csv
    );
    Ok(())
}

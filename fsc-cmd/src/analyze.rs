//! The full analysis pipeline, run top to bottom: load, clean, aggregate,
//! subset, pivot, ordinate, test, report. Any stage error aborts the run.

use anyhow::ensure;
use fsc_core::{Region, SeineSample};
use fsc_data::aggregate::aggregate_mean_cpue;
use fsc_data::clean::clean_samples;
use fsc_data::reshape::pivot_wider;
use fsc_data::subset::subset_families;
use fsc_plot::cpue::{cpue_boxplot, cpue_jitter};
use fsc_plot::scatter::nmds_scatter;
use fsc_stats::{anosim, bray_curtis_matrix, permanova, Nmds, Ordination};
use log::info;
use std::fs::create_dir_all;
use std::path::Path;

pub fn run_analyze(
    samples_csv: &str,
    out_dir: &str,
    permutations: usize,
    seed: u64,
) -> anyhow::Result<()> {
    let samples = SeineSample::from_csv_path(samples_csv)?;
    info!("loaded {} raw records from {}", samples.len(), samples_csv);

    let cleaned = clean_samples(samples);
    ensure!(!cleaned.is_empty(), "no records survive cleaning");

    let aggregated = aggregate_mean_cpue(&cleaned);
    let community = subset_families(aggregated);
    ensure!(
        !community.is_empty(),
        "no records in the families of interest"
    );

    let matrix = pivot_wider(&community)?;
    info!(
        "community matrix: {} site units x {} taxa",
        matrix.n_sites(),
        matrix.n_taxa()
    );

    let distances = bray_curtis_matrix(&matrix.abundances)?;
    let nmds = Nmds {
        seed,
        ..Nmds::default()
    };
    let ordination = nmds.ordinate(&distances)?;
    info!(
        "NMDS stress {:.4} after {} iterations (converged: {})",
        ordination.stress, ordination.iterations, ordination.converged
    );

    let labels: Vec<Region> = matrix.sites.iter().map(|site| site.region).collect();
    let permanova_table = permanova(&distances, &labels, "Region", permutations, seed)?;
    let anosim_result = anosim(&distances, &labels, permutations, seed)?;

    println!("PERMANOVA (Bray-Curtis, community ~ Region)");
    println!("{permanova_table}");
    println!();
    println!("ANOSIM (Bray-Curtis, grouping: Region)");
    println!("{anosim_result}");

    create_dir_all(out_dir)?;
    let out = Path::new(out_dir);
    let coordinates: Vec<[f64; 2]> = (0..matrix.n_sites())
        .map(|i| {
            [
                ordination.coordinates[(i, 0)],
                ordination.coordinates[(i, 1)],
            ]
        })
        .collect();
    nmds_scatter(
        &out.join("nmds_region.png"),
        &matrix.sites,
        &coordinates,
        ordination.stress,
    )?;
    cpue_boxplot(&out.join("cpue_by_water_year.png"), &community)?;
    cpue_jitter(&out.join("cpue_by_water_year_type.png"), &community, seed)?;

    info!("analysis complete; plots in {}", out.display());
    Ok(())
}

//! Command implementations for the fsc CLI.
//!
//! Provides the full community-analysis pipeline and a cleaned-table
//! export, both driven from explicit input/output path arguments.

use clap::Subcommand;

pub mod analyze;
pub mod clean;

#[derive(Subcommand)]
pub enum Command {
    /// Run the full community analysis: clean, aggregate, ordinate, test, plot
    Analyze {
        /// Path to the raw beach-seine samples CSV
        #[arg(short = 's', long)]
        samples_csv: String,

        /// Directory the PNG plots are written into (created if missing)
        #[arg(short = 'o', long)]
        out_dir: String,

        /// Number of permutations for the PERMANOVA and ANOSIM tests
        #[arg(long, default_value_t = 999)]
        permutations: usize,

        /// RNG seed for ordination restarts and permutation shuffles
        #[arg(long, default_value_t = fsc_stats::nmds::DEFAULT_SEED)]
        seed: u64,
    },

    /// Clean and aggregate the raw samples, writing the long table to CSV
    Clean {
        /// Path to the raw beach-seine samples CSV
        #[arg(short = 's', long)]
        samples_csv: String,

        /// Output path for the aggregated CPUE table
        #[arg(short = 'a', long)]
        aggregated_csv: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Analyze {
            samples_csv,
            out_dir,
            permutations,
            seed,
        } => analyze::run_analyze(&samples_csv, &out_dir, permutations, seed),
        Command::Clean {
            samples_csv,
            aggregated_csv,
        } => clean::run_clean(&samples_csv, &aggregated_csv),
    }
}

//! Community-ecology statistics: Bray-Curtis dissimilarities, non-metric
//! multidimensional scaling, and permutation tests of group separation
//! (PERMANOVA, ANOSIM).
//!
//! The ordination seam is the [`nmds::Ordination`] trait: given a distance
//! matrix it returns an embedding plus a stress diagnostic, so the method
//! can be swapped without touching the pipeline.

pub mod anosim;
pub mod distance;
pub mod nmds;
pub mod permanova;

mod rank;

use thiserror::Error;

/// Errors produced by the statistics routines.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("empty abundance matrix")]
    EmptyMatrix,

    #[error("row {row} has {got} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        got: usize,
        expected: usize,
    },

    #[error("negative abundance {value} at row {row}, column {column}")]
    NegativeAbundance {
        row: usize,
        column: usize,
        value: f64,
    },

    #[error("{labels} group labels for a {sites}-site distance matrix")]
    DimensionMismatch { labels: usize, sites: usize },

    #[error("need at least two groups, got {0}")]
    TooFewGroups(usize),

    #[error("need at least {needed} sites, got {got}")]
    TooFewSites { needed: usize, got: usize },
}

pub use anosim::{anosim, AnosimResult};
pub use distance::{bray_curtis, bray_curtis_matrix};
pub use nmds::{Nmds, Ordination, OrdinationResult};
pub use permanova::{permanova, PermanovaTable};

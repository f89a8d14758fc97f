//! Cleaning, aggregation, and reshaping of beach-seine survey records.
//!
//! This crate handles transforming raw sample records into the
//! sites-by-species community matrix consumed by the ordination and
//! permutation statistics.

pub mod aggregate;
pub mod clean;
pub mod reshape;
pub mod subset;

pub use reshape::{CommunityMatrix, DataError, LongRecord};

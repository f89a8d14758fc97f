//! Long/wide pivots between the aggregated CPUE table and the
//! sites-by-species community matrix.

use fsc_core::{AggregatedCpue, SiteKey};
use itertools::Itertools;
use thiserror::Error;

/// Errors produced while reshaping the aggregated table.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("duplicate cell for site {site}, taxon {taxon:?} during pivot")]
    DuplicateCell { site: SiteKey, taxon: String },
}

/// The wide sites-by-species matrix fed to the ordination.
///
/// `abundances[i][j]` is the transformed abundance of taxon `taxa[j]` at
/// site `sites[i]`, zero for taxa never observed at that site. Taxa are
/// sorted by common name so column positions are deterministic across runs,
/// and every downstream consumer is keyed off the same `sites` vector.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityMatrix {
    pub sites: Vec<SiteKey>,
    pub taxa: Vec<String>,
    pub abundances: Vec<Vec<f64>>,
}

impl CommunityMatrix {
    pub fn n_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn n_taxa(&self) -> usize {
        self.taxa.len()
    }
}

/// One cell of the long-format table, used by the wide-to-long inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub site: SiteKey,
    pub common_name: String,
    pub value: f64,
}

/// Pivot the subsetted long table to wide form: one row per unique site
/// unit, one column per distinct common name, fourth-root CPUE in the
/// cells, absences zero-filled.
///
/// A repeated (site, taxon) cell means the input violated the
/// one-row-per-group contract upstream and the pivot fails rather than
/// silently overwriting.
pub fn pivot_wider(rows: &[AggregatedCpue]) -> Result<CommunityMatrix, DataError> {
    let sites: Vec<SiteKey> = rows.iter().map(|r| r.site_key()).sorted().dedup().collect();
    let taxa: Vec<String> = rows
        .iter()
        .map(|r| r.common_name.clone())
        .sorted()
        .dedup()
        .collect();

    let mut abundances = vec![vec![0.0; taxa.len()]; sites.len()];
    let mut filled = vec![vec![false; taxa.len()]; sites.len()];
    for row in rows {
        let site = row.site_key();
        // both lookups hit: the axes were built from these same rows
        let i = sites.binary_search(&site).unwrap_or_else(|_| unreachable!());
        let j = taxa
            .binary_search(&row.common_name)
            .unwrap_or_else(|_| unreachable!());
        if filled[i][j] {
            return Err(DataError::DuplicateCell {
                site,
                taxon: row.common_name.clone(),
            });
        }
        abundances[i][j] = row.fourth_root_cpue;
        filled[i][j] = true;
    }

    Ok(CommunityMatrix {
        sites,
        taxa,
        abundances,
    })
}

/// Pivot the wide matrix back to long form, dropping zero-filled cells.
pub fn pivot_longer(matrix: &CommunityMatrix) -> Vec<LongRecord> {
    let mut records = Vec::new();
    for (i, site) in matrix.sites.iter().enumerate() {
        for (j, taxon) in matrix.taxa.iter().enumerate() {
            let value = matrix.abundances[i][j];
            if value != 0.0 {
                records.push(LongRecord {
                    site: *site,
                    common_name: taxon.clone(),
                    value,
                });
            }
        }
    }
    records
}

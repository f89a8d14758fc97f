//! Analysis of similarities: a rank-based permutation test of group
//! separation under a dissimilarity matrix.

use crate::permanova::group_ids;
use crate::rank::average_ranks;
use crate::StatsError;
use nalgebra::DMatrix;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt;

/// The ANOSIM R statistic and its permutation significance.
#[derive(Debug, Clone)]
pub struct AnosimResult {
    /// R ranges over [-1, 1]: near 1 when between-group dissimilarities
    /// rank above within-group ones, near 0 under no separation.
    pub r_statistic: f64,
    pub p_value: f64,
    pub permutations: usize,
}

impl fmt::Display for AnosimResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ANOSIM statistic R: {:.4}", self.r_statistic)?;
        writeln!(f, "      Significance: {:.3}", self.p_value)?;
        write!(f, "Number of permutations: {}", self.permutations)
    }
}

/// ANOSIM: R = (mean between-group rank - mean within-group rank) / (M/2),
/// with the dissimilarity ranks held fixed and group labels permuted.
pub fn anosim<L: Eq>(
    distances: &DMatrix<f64>,
    labels: &[L],
    permutations: usize,
    seed: u64,
) -> Result<AnosimResult, StatsError> {
    let n = distances.nrows();
    if n == 0 {
        return Err(StatsError::EmptyMatrix);
    }
    if labels.len() != n {
        return Err(StatsError::DimensionMismatch {
            labels: labels.len(),
            sites: n,
        });
    }
    let (mut assignment, group_count) = group_ids(labels);
    if group_count < 2 {
        return Err(StatsError::TooFewGroups(group_count));
    }

    let pairs = pair_indices(n);
    let dissimilarities: Vec<f64> = pairs.iter().map(|&(i, j)| distances[(i, j)]).collect();
    let ranks = average_ranks(&dissimilarities);
    let half_m = pairs.len() as f64 / 2.0;

    let r_of = |assignment: &[usize]| {
        let mut within_sum = 0.0;
        let mut within_count = 0usize;
        let mut between_sum = 0.0;
        let mut between_count = 0usize;
        for (pair, &(i, j)) in pairs.iter().enumerate() {
            if assignment[i] == assignment[j] {
                within_sum += ranks[pair];
                within_count += 1;
            } else {
                between_sum += ranks[pair];
                between_count += 1;
            }
        }
        if within_count == 0 || between_count == 0 {
            return 0.0;
        }
        let mean_within = within_sum / within_count as f64;
        let mean_between = between_sum / between_count as f64;
        (mean_between - mean_within) / half_m
    };

    let observed_r = r_of(&assignment);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut at_least_as_extreme = 0usize;
    for _ in 0..permutations {
        assignment.shuffle(&mut rng);
        if r_of(&assignment) >= observed_r {
            at_least_as_extreme += 1;
        }
    }
    let p_value = (1 + at_least_as_extreme) as f64 / (1 + permutations) as f64;

    Ok(AnosimResult {
        r_statistic: observed_r,
        p_value,
        permutations,
    })
}

fn pair_indices(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::anosim;
    use crate::distance::bray_curtis_matrix;

    #[test]
    fn test_separated_clusters_give_r_near_one() {
        let rows = vec![
            vec![5.0, 4.0, 0.0, 0.2],
            vec![4.5, 5.0, 0.1, 0.0],
            vec![5.2, 3.8, 0.0, 0.1],
            vec![0.1, 0.0, 6.0, 5.0],
            vec![0.0, 0.2, 5.5, 4.8],
            vec![0.2, 0.1, 6.2, 5.1],
        ];
        let distances = bray_curtis_matrix(&rows).unwrap();
        let labels = ["AL", "AL", "AL", "BL", "BL", "BL"];
        let result = anosim(&distances, &labels, 999, 7).unwrap();
        // every between-group pair is more dissimilar than every
        // within-group pair
        assert!((result.r_statistic - 1.0).abs() < 1e-9);
        assert!(result.p_value > 0.0 && result.p_value <= 1.0);
    }

    #[test]
    fn test_r_stays_in_range_without_structure() {
        let rows = vec![
            vec![1.0, 2.0, 0.5],
            vec![2.0, 1.0, 0.5],
            vec![0.5, 1.5, 2.0],
            vec![1.5, 0.5, 1.0],
            vec![1.0, 1.0, 1.0],
            vec![0.5, 2.0, 1.5],
        ];
        let distances = bray_curtis_matrix(&rows).unwrap();
        let labels = ["AL", "BL", "AL", "BL", "AL", "BL"];
        let result = anosim(&distances, &labels, 999, 7).unwrap();
        assert!(result.r_statistic >= -1.0 && result.r_statistic <= 1.0);
        assert!(result.p_value > 0.0 && result.p_value <= 1.0);
    }
}

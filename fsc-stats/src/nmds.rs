//! Non-metric multidimensional scaling of a dissimilarity matrix.
//!
//! Kruskal's formulation: find a low-dimensional configuration whose
//! inter-point distances are, as nearly as possible, a monotone function of
//! the observed dissimilarities. Fit quality is stress-1. The configuration
//! is refined by Guttman-transform majorization with an isotonic
//! (pool-adjacent-violators) regression step each iteration, started from a
//! principal-coordinates solution plus seeded random restarts.

use crate::StatsError;
use log::debug;
use nalgebra::{DMatrix, SymmetricEigen};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Default RNG seed for the random restarts, fixed so runs reproduce.
pub const DEFAULT_SEED: u64 = 0x5EAF00D;

/// A fitted ordination: per-site coordinates plus the stress diagnostic.
#[derive(Debug, Clone)]
pub struct OrdinationResult {
    /// n-sites x k-dimensions coordinate matrix, centered and rotated to
    /// principal axes (axis 1 carries the most variance).
    pub coordinates: DMatrix<f64>,
    /// Final Kruskal stress-1 of the best configuration.
    pub stress: f64,
    /// Iterations spent on the best configuration.
    pub iterations: usize,
    /// Whether the best run met the stress tolerance before the iteration
    /// cap.
    pub converged: bool,
}

/// The pluggable ordination seam: a distance matrix in, an embedding with a
/// stress diagnostic out.
pub trait Ordination {
    fn ordinate(&self, distances: &DMatrix<f64>) -> Result<OrdinationResult, StatsError>;
}

/// Non-metric MDS configuration.
#[derive(Debug, Clone)]
pub struct Nmds {
    /// Embedding dimensionality (the community analysis uses 3).
    pub dimensions: usize,
    /// Majorization iteration cap per start.
    pub max_iterations: usize,
    /// Stop when stress improves by less than this between iterations.
    pub tolerance: f64,
    /// Random restarts tried after the principal-coordinates start.
    pub restarts: usize,
    /// RNG seed for the random restarts.
    pub seed: u64,
}

impl Default for Nmds {
    fn default() -> Self {
        Nmds {
            dimensions: 3,
            max_iterations: 300,
            tolerance: 1e-7,
            restarts: 8,
            seed: DEFAULT_SEED,
        }
    }
}

impl Ordination for Nmds {
    fn ordinate(&self, distances: &DMatrix<f64>) -> Result<OrdinationResult, StatsError> {
        let n = distances.nrows();
        if n == 0 {
            return Err(StatsError::EmptyMatrix);
        }
        // a k-dimensional configuration needs more than k+1 points to be
        // non-trivial
        let needed = self.dimensions + 2;
        if n < needed {
            return Err(StatsError::TooFewSites { needed, got: n });
        }

        let pairs = pair_indices(n);
        let observed: Vec<f64> = pairs.iter().map(|&(i, j)| distances[(i, j)]).collect();

        let mut best: Option<(DMatrix<f64>, f64, usize, bool)> = None;
        for start in 0..=self.restarts {
            let init = if start == 0 {
                principal_coordinates(distances, self.dimensions)
            } else {
                let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(start as u64));
                DMatrix::from_fn(n, self.dimensions, |_, _| rng.gen_range(-1.0..1.0))
            };
            let (coords, stress, iterations, converged) =
                self.majorize(init, &pairs, &observed);
            debug!("nmds start {start}: stress {stress:.6} after {iterations} iterations");
            let better = best
                .as_ref()
                .map(|(_, best_stress, _, _)| stress < *best_stress)
                .unwrap_or(true);
            if better {
                best = Some((coords, stress, iterations, converged));
            }
        }

        // unwrap is fine: the loop above always runs at least once
        let (coords, stress, iterations, converged) = best.unwrap();
        Ok(OrdinationResult {
            coordinates: principal_axis_rotation(coords),
            stress,
            iterations,
            converged,
        })
    }
}

impl Nmds {
    fn majorize(
        &self,
        mut coords: DMatrix<f64>,
        pairs: &[(usize, usize)],
        observed: &[f64],
    ) -> (DMatrix<f64>, f64, usize, bool) {
        let mut stress = f64::INFINITY;
        let mut iterations = 0;
        let mut converged = false;

        for iteration in 1..=self.max_iterations {
            iterations = iteration;
            let config = configuration_distances(&coords, pairs);
            let fitted = monotone_fit(observed, &config);

            let mut misfit = 0.0;
            let mut scale = 0.0;
            for (d, dhat) in config.iter().zip(fitted.iter()) {
                misfit += (d - dhat) * (d - dhat);
                scale += d * d;
            }
            if scale <= f64::EPSILON {
                // degenerate collapsed configuration
                stress = 1.0;
                break;
            }
            let new_stress = (misfit / scale).sqrt();
            if (stress - new_stress).abs() < self.tolerance {
                stress = new_stress;
                converged = true;
                break;
            }
            stress = new_stress;

            coords = guttman_update(&coords, pairs, &config, &fitted);
            center_columns(&mut coords);
        }

        (coords, stress, iterations, converged)
    }
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

fn configuration_distances(coords: &DMatrix<f64>, pairs: &[(usize, usize)]) -> Vec<f64> {
    pairs
        .iter()
        .map(|&(i, j)| {
            let mut sum = 0.0;
            for dim in 0..coords.ncols() {
                let delta = coords[(i, dim)] - coords[(j, dim)];
                sum += delta * delta;
            }
            sum.sqrt()
        })
        .collect()
}

/// Fit the monotone regression of configuration distances on the rank order
/// of the observed dissimilarities (Kruskal's primary approach to ties:
/// within a tie block the configuration distances are free to order
/// themselves).
fn monotone_fit(observed: &[f64], config: &[f64]) -> Vec<f64> {
    let m = observed.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| {
        observed[a]
            .total_cmp(&observed[b])
            .then(config[a].total_cmp(&config[b]))
    });

    let ordered: Vec<f64> = order.iter().map(|&p| config[p]).collect();
    let fitted_ordered = pool_adjacent_violators(&ordered);

    let mut fitted = vec![0.0; m];
    for (position, &pair) in order.iter().enumerate() {
        fitted[pair] = fitted_ordered[position];
    }
    fitted
}

/// Unweighted pool-adjacent-violators: the least-squares non-decreasing
/// fit to the input sequence.
fn pool_adjacent_violators(values: &[f64]) -> Vec<f64> {
    // (sum, count) per merged block
    let mut blocks: Vec<(f64, f64)> = Vec::with_capacity(values.len());
    for &value in values {
        let mut sum = value;
        let mut count = 1.0;
        while let Some(&(prev_sum, prev_count)) = blocks.last() {
            if prev_sum / prev_count > sum / count {
                blocks.pop();
                sum += prev_sum;
                count += prev_count;
            } else {
                break;
            }
        }
        blocks.push((sum, count));
    }

    let mut fitted = Vec::with_capacity(values.len());
    for (sum, count) in blocks {
        let mean = sum / count;
        for _ in 0..count as usize {
            fitted.push(mean);
        }
    }
    fitted
}

/// One Guttman-transform majorization step.
fn guttman_update(
    coords: &DMatrix<f64>,
    pairs: &[(usize, usize)],
    config: &[f64],
    fitted: &[f64],
) -> DMatrix<f64> {
    let n = coords.nrows();
    let k = coords.ncols();
    let mut updated = DMatrix::zeros(n, k);
    for (pair, &(i, j)) in pairs.iter().enumerate() {
        let d = config[pair];
        if d <= f64::EPSILON {
            continue;
        }
        let ratio = fitted[pair] / d;
        for dim in 0..k {
            let delta = coords[(i, dim)] - coords[(j, dim)];
            updated[(i, dim)] += ratio * delta;
            updated[(j, dim)] -= ratio * delta;
        }
    }
    updated / n as f64
}

fn center_columns(coords: &mut DMatrix<f64>) {
    let n = coords.nrows() as f64;
    for dim in 0..coords.ncols() {
        let mean = coords.column(dim).sum() / n;
        for i in 0..coords.nrows() {
            coords[(i, dim)] -= mean;
        }
    }
}

/// Principal-coordinates (classical MDS) start: double-center the squared
/// dissimilarities and take the leading eigenvectors.
fn principal_coordinates(distances: &DMatrix<f64>, k: usize) -> DMatrix<f64> {
    let n = distances.nrows();
    let mut gram = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            gram[(i, j)] = -0.5 * distances[(i, j)] * distances[(i, j)];
        }
    }
    double_center(&mut gram);

    let eigen = SymmetricEigen::new(gram);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));

    DMatrix::from_fn(n, k, |i, dim| {
        let axis = order[dim];
        let eigenvalue = eigen.eigenvalues[axis].max(0.0);
        eigen.eigenvectors[(i, axis)] * eigenvalue.sqrt()
    })
}

fn double_center(matrix: &mut DMatrix<f64>) {
    let n = matrix.nrows();
    let row_means: Vec<f64> = (0..n).map(|i| matrix.row(i).sum() / n as f64).collect();
    let grand_mean = row_means.iter().sum::<f64>() / n as f64;
    for i in 0..n {
        for j in 0..n {
            matrix[(i, j)] += grand_mean - row_means[i] - row_means[j];
        }
    }
}

/// Center the final configuration and rotate it so axis 1 carries the most
/// variance, axis 2 the next, and so on.
fn principal_axis_rotation(mut coords: DMatrix<f64>) -> DMatrix<f64> {
    center_columns(&mut coords);
    let covariance = coords.transpose() * &coords;
    let eigen = SymmetricEigen::new(covariance);
    let k = coords.ncols();
    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| eigen.eigenvalues[b].total_cmp(&eigen.eigenvalues[a]));
    let rotation = DMatrix::from_fn(k, k, |i, j| eigen.eigenvectors[(i, order[j])]);
    coords * rotation
}

#[cfg(test)]
mod tests {
    use super::{pool_adjacent_violators, Nmds, Ordination};
    use crate::distance::bray_curtis_matrix;

    #[test]
    fn test_pava_monotone_and_mean_preserving() {
        let fitted = pool_adjacent_violators(&[1.0, 3.0, 2.0, 4.0]);
        assert_eq!(fitted, vec![1.0, 2.5, 2.5, 4.0]);
        let already_sorted = pool_adjacent_violators(&[0.1, 0.2, 0.3]);
        assert_eq!(already_sorted, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_nmds_shape_and_stress() {
        // two loose clusters of abundance profiles
        let rows = vec![
            vec![5.0, 4.0, 0.0, 0.2],
            vec![4.5, 5.0, 0.1, 0.0],
            vec![5.2, 3.8, 0.0, 0.1],
            vec![0.1, 0.0, 6.0, 5.0],
            vec![0.0, 0.2, 5.5, 4.8],
            vec![0.2, 0.1, 6.2, 5.1],
        ];
        let distances = bray_curtis_matrix(&rows).unwrap();
        let nmds = Nmds {
            dimensions: 2,
            ..Nmds::default()
        };
        let result = nmds.ordinate(&distances).unwrap();
        assert_eq!(result.coordinates.nrows(), 6);
        assert_eq!(result.coordinates.ncols(), 2);
        assert!(result.stress.is_finite());
        assert!(result.stress >= 0.0);
        // a clean two-cluster structure embeds with low stress
        assert!(result.stress < 0.15, "stress was {}", result.stress);

        // clusters separate on the rotated first axis
        let first: Vec<f64> = (0..6).map(|i| result.coordinates[(i, 0)]).collect();
        let same_side =
            |a: f64, b: f64| (a > 0.0) == (b > 0.0);
        assert!(same_side(first[0], first[1]) && same_side(first[1], first[2]));
        assert!(same_side(first[3], first[4]) && same_side(first[4], first[5]));
        assert!(!same_side(first[0], first[3]));
    }

    #[test]
    fn test_nmds_is_deterministic_for_a_seed() {
        let rows = vec![
            vec![1.0, 0.0, 2.0, 0.5],
            vec![0.0, 3.0, 1.0, 0.0],
            vec![1.0, 1.0, 1.0, 1.0],
            vec![2.0, 0.5, 0.0, 3.0],
            vec![0.5, 2.5, 0.5, 0.5],
            vec![3.0, 0.0, 0.5, 1.5],
        ];
        let distances = bray_curtis_matrix(&rows).unwrap();
        let nmds = Nmds {
            dimensions: 2,
            ..Nmds::default()
        };
        let first = nmds.ordinate(&distances).unwrap();
        let second = nmds.ordinate(&distances).unwrap();
        assert_eq!(first.stress, second.stress);
        assert_eq!(first.coordinates, second.coordinates);
    }

    #[test]
    fn test_too_few_sites_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![2.0, 1.0], vec![1.0, 1.0]];
        let distances = bray_curtis_matrix(&rows).unwrap();
        let nmds = Nmds::default(); // k = 3 needs at least 5 sites
        assert!(nmds.ordinate(&distances).is_err());
    }
}

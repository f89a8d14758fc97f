//! One-way permutational multivariate analysis of variance on a distance
//! matrix.

use crate::StatsError;
use nalgebra::DMatrix;
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt;

/// The PERMANOVA result, laid out like the R `adonis2` table it prints as.
#[derive(Debug, Clone)]
pub struct PermanovaTable {
    /// Name of the grouping term (e.g. "Region").
    pub term: String,
    pub df_model: usize,
    pub df_residual: usize,
    pub ss_model: f64,
    pub ss_residual: f64,
    pub ss_total: f64,
    pub r_squared: f64,
    pub pseudo_f: f64,
    pub p_value: f64,
    pub permutations: usize,
}

impl fmt::Display for PermanovaTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<9} {:>3} {:>9} {:>8} {:>7} {:>7}",
            "", "Df", "SumOfSqs", "R2", "F", "Pr(>F)"
        )?;
        writeln!(
            f,
            "{:<9} {:>3} {:>9.5} {:>8.5} {:>7.4} {:>7.3}",
            self.term, self.df_model, self.ss_model, self.r_squared, self.pseudo_f, self.p_value
        )?;
        writeln!(
            f,
            "{:<9} {:>3} {:>9.5} {:>8.5}",
            "Residual",
            self.df_residual,
            self.ss_residual,
            self.ss_residual / self.ss_total
        )?;
        writeln!(
            f,
            "{:<9} {:>3} {:>9.5} {:>8.5}",
            "Total",
            self.df_model + self.df_residual,
            self.ss_total,
            1.0
        )?;
        write!(f, "Number of permutations: {}", self.permutations)
    }
}

/// Map arbitrary labels onto dense group ids, preserving first-seen order.
pub(crate) fn group_ids<L: Eq>(labels: &[L]) -> (Vec<usize>, usize) {
    let mut unique: Vec<&L> = Vec::new();
    let mut assignment = Vec::with_capacity(labels.len());
    for label in labels {
        let id = match unique.iter().position(|u| *u == label) {
            Some(id) => id,
            None => {
                unique.push(label);
                unique.len() - 1
            }
        };
        assignment.push(id);
    }
    (assignment, unique.len())
}

/// One-way PERMANOVA: partition the total sum of squared dissimilarities
/// into among- and within-group components, form the pseudo-F ratio, and
/// assess it against label permutations.
pub fn permanova<L: Eq>(
    distances: &DMatrix<f64>,
    labels: &[L],
    term: &str,
    permutations: usize,
    seed: u64,
) -> Result<PermanovaTable, StatsError> {
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
    if n <= group_count {
        return Err(StatsError::TooFewSites {
            needed: group_count + 1,
            got: n,
        });
    }

    let mut group_sizes = vec![0usize; group_count];
    for &g in &assignment {
        group_sizes[g] += 1;
    }

    let pairs = pair_indices(n);
    let squared: Vec<f64> = pairs
        .iter()
        .map(|&(i, j)| distances[(i, j)] * distances[(i, j)])
        .collect();
    let ss_total = squared.iter().sum::<f64>() / n as f64;

    let df_model = group_count - 1;
    let df_residual = n - group_count;
    let pseudo_f_of = |assignment: &[usize]| {
        let ss_residual = within_ss(&pairs, &squared, assignment, &group_sizes);
        let ss_model = ss_total - ss_residual;
        (ss_model / df_model as f64) / (ss_residual / df_residual as f64)
    };

    let ss_residual = within_ss(&pairs, &squared, &assignment, &group_sizes);
    let ss_model = ss_total - ss_residual;
    let observed_f = (ss_model / df_model as f64) / (ss_residual / df_residual as f64);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut at_least_as_extreme = 0usize;
    for _ in 0..permutations {
        assignment.shuffle(&mut rng);
        if pseudo_f_of(&assignment) >= observed_f {
            at_least_as_extreme += 1;
        }
    }
    let p_value = (1 + at_least_as_extreme) as f64 / (1 + permutations) as f64;

    Ok(PermanovaTable {
        term: term.to_string(),
        df_model,
        df_residual,
        ss_model,
        ss_residual,
        ss_total,
        r_squared: ss_model / ss_total,
        pseudo_f: observed_f,
        p_value,
        permutations,
    })
}

/// Within-group sum of squares: each same-group pair contributes its
/// squared dissimilarity divided by the group size.
fn within_ss(
    pairs: &[(usize, usize)],
    squared: &[f64],
    assignment: &[usize],
    group_sizes: &[usize],
) -> f64 {
    let mut per_group = vec![0.0; group_sizes.len()];
    for (pair, &(i, j)) in pairs.iter().enumerate() {
        if assignment[i] == assignment[j] {
            per_group[assignment[i]] += squared[pair];
        }
    }
    per_group
        .iter()
        .zip(group_sizes.iter())
        .map(|(ss, size)| ss / *size as f64)
        .sum()
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

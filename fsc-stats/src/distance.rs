//! Bray-Curtis dissimilarity between abundance vectors.

use crate::StatsError;
use nalgebra::DMatrix;

/// Bray-Curtis dissimilarity between two non-negative abundance vectors:
/// sum of absolute differences over sum of totals. 0 for identical
/// communities, 1 for communities sharing no taxa. Two all-zero vectors
/// compare as identical.
pub fn bray_curtis(a: &[f64], b: &[f64]) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        numerator += (x - y).abs();
        denominator += x + y;
    }
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Pairwise Bray-Curtis distance matrix over the rows of an abundance
/// matrix. Rows must be equal-length and non-negative.
pub fn bray_curtis_matrix(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, StatsError> {
    if rows.is_empty() || rows[0].is_empty() {
        return Err(StatsError::EmptyMatrix);
    }
    let width = rows[0].len();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(StatsError::RaggedRow {
                row: i,
                got: row.len(),
                expected: width,
            });
        }
        for (j, &value) in row.iter().enumerate() {
            if value < 0.0 {
                return Err(StatsError::NegativeAbundance {
                    row: i,
                    column: j,
                    value,
                });
            }
        }
    }

    let n = rows.len();
    let mut distances = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = bray_curtis(&rows[i], &rows[j]);
            distances[(i, j)] = d;
            distances[(j, i)] = d;
        }
    }
    Ok(distances)
}

#[cfg(test)]
mod tests {
    use super::{bray_curtis, bray_curtis_matrix};

    #[test]
    fn test_identical_communities() {
        let a = [3.0, 1.0, 0.5];
        assert_eq!(bray_curtis(&a, &a), 0.0);
    }

    #[test]
    fn test_disjoint_communities() {
        let a = [2.0, 0.0, 1.0, 0.0];
        let b = [0.0, 4.0, 0.0, 0.5];
        assert!((bray_curtis(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_value() {
        // |6-5| + |7-0| + |4-4| = 8; 11 + 9 + 8 = 26
        let a = [6.0, 7.0, 4.0];
        let b = [5.0, 0.0, 4.0];
        assert!((bray_curtis(&a, &b) - 8.0 / 26.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric_with_zero_diagonal() {
        let rows = vec![
            vec![1.0, 0.0, 2.0],
            vec![0.0, 3.0, 1.0],
            vec![1.0, 1.0, 1.0],
        ];
        let d = bray_curtis_matrix(&rows).unwrap();
        assert_eq!(d.nrows(), 3);
        for i in 0..3 {
            assert_eq!(d[(i, i)], 0.0);
            for j in 0..3 {
                assert!((d[(i, j)] - d[(j, i)]).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn test_negative_abundance_rejected() {
        let rows = vec![vec![1.0, -0.1], vec![0.5, 0.5]];
        assert!(bray_curtis_matrix(&rows).is_err());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![0.5]];
        assert!(bray_curtis_matrix(&rows).is_err());
    }
}

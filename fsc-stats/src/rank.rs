//! Average-rank assignment shared by the rank-based tests.

/// Assign 1-based ranks to values, averaging ranks over ties.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let m = values.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; m];
    let mut i = 0;
    while i < m {
        let mut j = i + 1;
        while j < m && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // positions i..j share the average of ranks i+1..=j
        let average = (i + 1 + j) as f64 / 2.0;
        for &index in &order[i..j] {
            ranks[index] = average;
        }
        i = j;
    }
    ranks
}

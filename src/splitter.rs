//! Splitter
//!
//! Exhaustive search over features and thresholds for the partition with
//! the lowest weighted Gini impurity.
use crate::data::Matrix;
use hashbrown::HashMap;

/// The winning split for one node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitInfo {
    /// Column the split tests.
    pub feature: usize,
    /// Rows with `value <= threshold` go left.
    pub threshold: f64,
    /// Count-weighted Gini impurity of the two sides.
    pub weighted_impurity: f64,
}

/// Gini impurity of the labels selected by `indices`.
///
/// `1 - sum(p_c^2)` over class proportions. An empty selection scores 0.0.
pub fn gini_impurity(y: &[i64], indices: &[usize]) -> f64 {
    let mut counts: HashMap<i64, usize> = HashMap::new();
    for &i in indices {
        *counts.entry(y[i]).or_insert(0) += 1;
    }
    gini_from_counts(&counts, indices.len())
}

fn gini_from_counts(counts: &HashMap<i64, usize>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let sum_sq: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            p * p
        })
        .sum();
    (1.0 - sum_sq).max(0.0)
}

/// Search every feature and every distinct threshold for the split of the
/// rows in `indices` with the lowest weighted impurity.
///
/// Candidates leaving either side empty are skipped, so `None` comes back
/// when no feature has two distinct values among the selected rows. Ties
/// resolve to the first candidate found, scanning features ascending and
/// thresholds ascending within a feature. Any usable candidate is returned
/// even when it does not improve on the node's own impurity.
pub fn best_split(data: &Matrix<f64>, y: &[i64], indices: &[usize]) -> Option<SplitInfo> {
    let n = indices.len();
    if n < 2 {
        return None;
    }

    // Label counts over the whole node, the starting right side for every
    // feature sweep.
    let mut node_counts: HashMap<i64, usize> = HashMap::new();
    for &i in indices {
        *node_counts.entry(y[i]).or_insert(0) += 1;
    }

    let mut best: Option<SplitInfo> = None;
    let mut best_impurity = f64::INFINITY;
    let mut pairs: Vec<(f64, i64)> = Vec::with_capacity(n);

    for feature in 0..data.cols {
        let col = data.get_col(feature);
        pairs.clear();
        pairs.extend(indices.iter().map(|&i| (col[i], y[i])));
        // One sort per feature; the sweep below never re-sorts.
        pairs.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
        if pairs[0].0 == pairs[n - 1].0 {
            continue;
        }

        let mut left: HashMap<i64, usize> = HashMap::new();
        let mut right = node_counts.clone();
        for k in 1..n {
            let (value, label) = pairs[k - 1];
            *left.entry(label).or_insert(0) += 1;
            if let Some(count) = right.get_mut(&label) {
                *count -= 1;
            }
            // A candidate threshold sits at each boundary between distinct
            // values; the rows at or below it are exactly the first k.
            if pairs[k].0 > value {
                let left_gini = gini_from_counts(&left, k);
                let right_gini = gini_from_counts(&right, n - k);
                let weighted = (k as f64 * left_gini + (n - k) as f64 * right_gini) / n as f64;
                if weighted < best_impurity {
                    best_impurity = weighted;
                    best = Some(SplitInfo {
                        feature,
                        threshold: value,
                        weighted_impurity: weighted,
                    });
                }
            }
        }
    }
    best
}

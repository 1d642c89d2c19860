//! Label-correction evaluation metrics.
//!
//! Measures for judging a corrected labeling against ground truth, or against
//! the labeling it started from.
//!
//! | Metric | Range | Best | Properties |
//! |--------|-------|------|------------|
//! | [`accuracy`] | [0, 1] | 1 | Label-for-label agreement, label names matter |
//! | [`purity`] | [0, 1] | 1 | Agreement up to renaming, favors many classes |
//!
//! [`changed_indices`] and [`confusion`] are diagnostics rather than scores.
//!
//! # Example
//!
//! ```rust
//! use relabel::metrics::{accuracy, changed_indices};
//!
//! let noisy = ["a", "a", "b", "a"];
//! let fixed = ["a", "a", "b", "b"];
//! let truth = ["a", "a", "b", "b"];
//!
//! assert_eq!(changed_indices(&noisy, &fixed), vec![3]);
//! assert!((accuracy(&noisy, &truth) - 0.75).abs() < 1e-12);
//! assert!((accuracy(&fixed, &truth) - 1.0).abs() < 1e-12);
//! ```

use std::collections::HashMap;
use std::hash::Hash;

/// Fraction of positions where `pred` and `truth` carry the same label.
///
/// Returns 0.0 for empty or mismatched inputs.
pub fn accuracy<L: PartialEq>(pred: &[L], truth: &[L]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }
    let hits = pred.iter().zip(truth).filter(|(p, t)| p == t).count();
    hits as f64 / pred.len() as f64
}

/// Positions where the two labelings differ, ascending.
///
/// Positions past the shorter input are ignored.
pub fn changed_indices<L: PartialEq>(before: &[L], after: &[L]) -> Vec<usize> {
    before
        .iter()
        .zip(after)
        .enumerate()
        .filter(|(_, (b, a))| b != a)
        .map(|(i, _)| i)
        .collect()
}

/// Count of each `(pred, truth)` label pair.
pub fn confusion<L: Clone + Eq + Hash>(pred: &[L], truth: &[L]) -> HashMap<(L, L), usize> {
    let mut table = HashMap::new();
    for (p, t) in pred.iter().zip(truth) {
        *table.entry((p.clone(), t.clone())).or_insert(0) += 1;
    }
    table
}

/// Purity of `pred` against `truth`.
///
/// Each predicted class is credited with its most common true label.
/// Returns 0.0 for empty or mismatched inputs.
pub fn purity<L: Clone + Eq + Hash>(pred: &[L], truth: &[L]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let mut best: HashMap<L, usize> = HashMap::new();
    for ((p, _), count) in confusion(pred, truth) {
        let current = best.entry(p).or_insert(0);
        *current = (*current).max(count);
    }

    let correct: usize = best.values().sum();
    correct as f64 / pred.len() as f64
}

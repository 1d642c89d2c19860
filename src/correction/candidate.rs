//! Candidate relabelings.
//!
//! A sample is suspicious when the class it is most attached to (argmax of its
//! membership row) is not the class it is labeled with. Moving sample `i` from
//! class `old` to class `new` changes modularity by approximately
//!
//! ```text
//! ΔQ = A[i][new] - A[i][old] - (d_i·(a_new - a_old) + d_i²/2)
//! ```
//!
//! where `d_i` is the row sum of A and `a_c` the row sum of E. The first two
//! terms are the direct gain in within-class mass; the bracket is the null-model
//! correction that penalizes moving into classes that are already heavy. The
//! exact change additionally contains `S[i][i] / tot`, which is non-negative,
//! so a positive ΔQ is always a real improvement for a single move.

use super::matrices::Matrices;
use crate::partition::Partition;
use ndarray::ArrayView1;
use std::collections::BTreeMap;

/// A proposed single-sample relabeling with positive gain.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Sample index.
    pub sample: usize,
    /// Current class index.
    pub from: usize,
    /// Proposed class index.
    pub to: usize,
    /// Modularity gain of the move.
    pub delta: f64,
}

/// Candidates keyed by sample; inserting for a known sample replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    by_sample: BTreeMap<usize, Candidate>,
}

impl CandidateSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, returning the candidate previously held for the same sample.
    pub fn insert(&mut self, candidate: Candidate) -> Option<Candidate> {
        self.by_sample.insert(candidate.sample, candidate)
    }

    /// Candidate for `sample`, if any.
    pub fn get(&self, sample: usize) -> Option<&Candidate> {
        self.by_sample.get(&sample)
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.by_sample.len()
    }

    /// True if there is nothing to fix.
    pub fn is_empty(&self) -> bool {
        self.by_sample.is_empty()
    }

    /// Candidates in ascending sample order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.by_sample.values()
    }

    /// Candidates sorted by descending gain.
    ///
    /// The sort is stable over ascending sample order, so equal gains keep
    /// the lower sample index first.
    pub fn into_ranked(self) -> Vec<Candidate> {
        let mut ranked: Vec<Candidate> = self.by_sample.into_values().collect();
        ranked.sort_by(|a, b| b.delta.total_cmp(&a.delta));
        ranked
    }
}

/// Index of the largest entry; ties go to the lowest index.
pub fn best_class(row: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (c, &v) in row.iter().enumerate() {
        if v > best_value {
            best_value = v;
            best = c;
        }
    }
    best
}

/// ΔQ for moving `sample` from class `from` to class `to`.
pub fn modularity_gain(matrices: &Matrices, sample: usize, from: usize, to: usize) -> f64 {
    let row = matrices.membership_of(sample);
    let d = row.sum();
    let a_old = matrices.class_weight(from);
    let a_new = matrices.class_weight(to);
    row[to] - row[from] - (d * (a_new - a_old) + d * d / 2.0)
}

/// Scan every sample and collect the moves with strictly positive gain.
pub fn generate(matrices: &Matrices, partition: &Partition) -> CandidateSet {
    let mut candidates = CandidateSet::new();
    for sample in 0..partition.n_samples() {
        let current = partition.class_of(sample);
        let best = best_class(matrices.membership_of(sample));
        if best == current {
            continue;
        }

        let delta = modularity_gain(matrices, sample, current, best);
        if delta > 0.0 {
            let _ = candidates.insert(Candidate {
                sample,
                from: current,
                to: best,
                delta,
            });
        }
    }
    candidates
}

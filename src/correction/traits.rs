//! Label-correction traits.

use crate::error::Result;
use crate::similarity::SimilarityMatrix;
use std::hash::Hash;

/// Trait for label-noise correction strategies.
pub trait LabelCorrection {
    /// Correct `labels` using pairwise similarity.
    ///
    /// Returns one label per sample, in input order, drawn from the labels
    /// present in the input.
    fn correct<L>(&self, similarity: &SimilarityMatrix, labels: &[L]) -> Result<Vec<L>>
    where
        L: Clone + Eq + Hash;
}

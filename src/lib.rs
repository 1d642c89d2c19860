//! # relabel
//!
//! Similarity-driven label-noise correction: relabel samples so the labeling,
//! viewed as a partition of a weighted similarity graph, reaches a local
//! maximum of modularity.
//!
//! Inputs are a symmetric non-negative similarity matrix and one label per
//! sample; the output is one label per sample drawn from the same label set.

pub mod correction;
/// Error types used across `relabel`.
pub mod error;
pub mod metrics;
pub mod partition;
pub mod similarity;


pub use correction::{fix, Candidate, LabelCorrection, Matrices, Relabeler, Relabeling, RoundStats};
pub use error::{Error, Result};
pub use metrics::{accuracy, changed_indices, confusion, purity};
pub use partition::{ClassSet, Partition};
pub use similarity::SimilarityMatrix;

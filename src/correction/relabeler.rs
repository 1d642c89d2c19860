//! The relabeling loop.
//!
//! ```text
//! build C, E, A
//! loop:
//!     candidates = generate(E, A, L)
//!     if candidates is empty: converged, return L
//!     commit best-first batch, rebuild E, A
//! ```
//!
//! Each round rebuilds E and A from the committed labels; the incremental
//! [`Matrices::apply_move`] path is not used here.

use super::candidate::generate;
use super::commit::commit;
use super::matrices::Matrices;
use super::traits::LabelCorrection;
use crate::error::{Error, Result};
use crate::partition::{ClassSet, Partition};
use crate::similarity::{SimilarityMatrix, DEFAULT_SYMMETRY_TOLERANCE};
use ndarray::ArrayView2;
use std::hash::Hash;
use tracing::{debug, info, warn};

/// Modularity-driven label corrector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relabeler {
    /// Acceptance tolerance of the batch chain, in (0, 1].
    alpha: f64,
    /// Cap on committed rounds; `None` runs to the fixed point.
    max_rounds: Option<usize>,
    /// Absolute symmetry tolerance for dense input.
    symmetry_tolerance: f64,
}

/// Statistics for one committed round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundStats {
    /// 1-based round number.
    pub round: usize,
    /// Candidates found by the scan.
    pub candidates: usize,
    /// Labels changed by the commit.
    pub fixed: usize,
    /// Modularity before the commit.
    pub modularity: f64,
}

/// Result of a relabeling run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relabeling<L> {
    /// Corrected labels, in input order.
    pub labels: Vec<L>,
    /// Committed rounds.
    pub rounds: usize,
    /// Per-round statistics.
    pub history: Vec<RoundStats>,
    /// Modularity of the final labeling.
    pub modularity: f64,
    /// Samples whose label differs from the input, ascending.
    pub changed: Vec<usize>,
}

impl Relabeler {
    /// Create a relabeler with default settings.
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            max_rounds: None,
            symmetry_tolerance: DEFAULT_SYMMETRY_TOLERANCE,
        }
    }

    /// Set the acceptance tolerance.
    ///
    /// Smaller values accept fewer candidates per round.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fail with [`Error::ConvergenceFailure`] if candidates remain after this many rounds.
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Set the symmetry tolerance used by [`Relabeler::run_dense`].
    pub fn with_symmetry_tolerance(mut self, tolerance: f64) -> Self {
        self.symmetry_tolerance = tolerance;
        self
    }

    /// Acceptance tolerance.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Round cap, if any.
    pub fn max_rounds(&self) -> Option<usize> {
        self.max_rounds
    }

    fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "alpha",
                message: "must be in (0, 1]",
            });
        }
        if !self.symmetry_tolerance.is_finite() || self.symmetry_tolerance < 0.0 {
            return Err(Error::InvalidParameter {
                name: "symmetry_tolerance",
                message: "must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Validate a dense matrix and run.
    pub fn run_dense<L>(&self, similarity: ArrayView2<'_, f64>, labels: &[L]) -> Result<Relabeling<L>>
    where
        L: Clone + Eq + Hash,
    {
        let similarity =
            SimilarityMatrix::with_tolerance(similarity.to_owned(), self.symmetry_tolerance)?;
        self.run(&similarity, labels)
    }

    /// Relabel until no candidate with positive gain remains.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] for a bad configuration
    /// - [`Error::DimensionMismatch`] if `labels` and `similarity` differ in length
    /// - [`Error::ZeroMass`] if the similarity matrix is all zero
    /// - [`Error::NonFiniteMass`] if the similarity sum overflows
    /// - [`Error::ConvergenceFailure`] if the round cap is reached
    pub fn run<L>(&self, similarity: &SimilarityMatrix, labels: &[L]) -> Result<Relabeling<L>>
    where
        L: Clone + Eq + Hash,
    {
        self.validate()?;
        let m = similarity.n_samples();
        if labels.len() != m {
            return Err(Error::DimensionMismatch {
                expected: m,
                found: labels.len(),
            });
        }

        let classes = ClassSet::from_labels(labels);
        if classes.len() < 2 {
            debug!(classes = classes.len(), "fewer than two classes, nothing to relabel");
            return Ok(Relabeling {
                labels: labels.to_vec(),
                rounds: 0,
                history: Vec::new(),
                modularity: 0.0,
                changed: Vec::new(),
            });
        }

        let mut partition = Partition::from_labels(labels, &classes)?;
        let mut matrices = Matrices::build(similarity, &partition)?;
        let mut history: Vec<RoundStats> = Vec::new();

        loop {
            let round = history.len() + 1;
            let candidates = generate(&matrices, &partition);
            let modularity = matrices.modularity();
            info!(
                round = round,
                candidates = candidates.len(),
                modularity = modularity,
                "scanned for mislabeled samples"
            );

            if candidates.is_empty() {
                break;
            }
            if let Some(max_rounds) = self.max_rounds {
                if history.len() >= max_rounds {
                    warn!(
                        max_rounds = max_rounds,
                        remaining = candidates.len(),
                        "round limit reached before convergence"
                    );
                    return Err(Error::ConvergenceFailure {
                        iterations: history.len(),
                    });
                }
            }

            let found = candidates.len();
            let committed = commit(candidates, self.alpha, similarity, &mut partition)?;
            info!(round = round, fixed = committed.accepted.len(), "labels fixed");

            history.push(RoundStats {
                round,
                candidates: found,
                fixed: committed.accepted.len(),
                modularity,
            });
            matrices = committed.matrices;
        }

        let changed = partition
            .assignments()
            .iter()
            .zip(labels)
            .enumerate()
            .filter(|&(_, (&c, l))| classes.label(c) != l)
            .map(|(i, _)| i)
            .collect();

        Ok(Relabeling {
            labels: partition.to_labels(&classes),
            rounds: history.len(),
            history,
            modularity: matrices.modularity(),
            changed,
        })
    }
}

impl Default for Relabeler {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelCorrection for Relabeler {
    fn correct<L>(&self, similarity: &SimilarityMatrix, labels: &[L]) -> Result<Vec<L>>
    where
        L: Clone + Eq + Hash,
    {
        self.run(similarity, labels).map(|r| r.labels)
    }
}

/// Correct `labels` against a dense similarity matrix.
///
/// Shorthand for `Relabeler::new().with_alpha(alpha).run_dense(..)`, keeping
/// only the labels.
///
/// There is no round cap. Batched moves can undo each other, and on such
/// inputs `fix` does not return. Use [`Relabeler::with_max_rounds`] to bound
/// the loop and get [`Error::ConvergenceFailure`] instead.
///
/// ```rust
/// use ndarray::array;
///
/// let s = array![
///     [1.0, 0.9, 0.1],
///     [0.9, 1.0, 0.1],
///     [0.1, 0.1, 1.0],
/// ];
/// let fixed = relabel::fix(s.view(), &["a", "a", "b"], 1.0).unwrap();
/// assert_eq!(fixed, vec!["a", "a", "b"]);
/// ```
pub fn fix<L>(similarity: ArrayView2<'_, f64>, labels: &[L], alpha: f64) -> Result<Vec<L>>
where
    L: Clone + Eq + Hash,
{
    Relabeler::new()
        .with_alpha(alpha)
        .run_dense(similarity, labels)
        .map(|r| r.labels)
}

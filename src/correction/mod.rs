//! Label-noise correction by modularity maximization.
//!
//! Treat the similarity matrix as a weighted graph and the current labeling as
//! a partition of it. A correct labeling should look like a good community
//! structure: samples are more similar to their own class than a random
//! baseline predicts. Mislabeled samples are the ones whose move to another
//! class would raise the partition's **modularity**.
//!
//! ## The Quantities
//!
//! With `tot = Σ S / 2`:
//!
//! - **E** (class × class): `E[a][b]`, share of similarity mass between classes
//!   a and b. Sums to 1.
//! - **A** (sample × class): `A[i][c]`, mass from sample i into class c over `tot`.
//! - `a_c = Σ_b E[c][b]`, `d_i = Σ_c A[i][c]`.
//!
//! ```text
//! Q = Σ_c (E[c][c] - a_c²)
//! ```
//!
//! ## The Loop
//!
//! 1. **Scan**: every sample whose argmax class in A differs from its label is
//!    scored with the single-move gain ΔQ; positive gains become candidates.
//! 2. **Commit**: candidates are taken best-first along a descending chain
//!    controlled by `alpha`, labels are rewritten, E and A are rebuilt.
//! 3. Repeat until a scan finds nothing.
//!
//! The class set is fixed to the labels present in the input. Classes may
//! become empty but never appear.
//!
//! ## Usage
//!
//! ```rust
//! use ndarray::array;
//! use relabel::{Relabeler, SimilarityMatrix};
//!
//! let s = SimilarityMatrix::new(array![
//!     [1.0, 0.1, 0.1, 0.1, 0.9, 0.9],
//!     [0.1, 1.0, 0.9, 0.9, 0.1, 0.1],
//!     [0.1, 0.9, 1.0, 0.9, 0.1, 0.1],
//!     [0.1, 0.9, 0.9, 1.0, 0.1, 0.1],
//!     [0.9, 0.1, 0.1, 0.1, 1.0, 0.9],
//!     [0.9, 0.1, 0.1, 0.1, 0.9, 1.0],
//! ]).unwrap();
//!
//! let report = Relabeler::new().run(&s, &["0", "1", "1", "0", "0", "0"]).unwrap();
//! assert_eq!(report.labels, vec!["0", "1", "1", "1", "0", "0"]);
//! assert_eq!(report.changed, vec![3]);
//! ```
//!
//! ## References
//!
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."
//! - Clauset, Newman & Moore (2004). "Finding community structure in very large networks."

mod candidate;
mod commit;
mod matrices;
mod relabeler;
mod traits;

pub use candidate::{best_class, generate, modularity_gain, Candidate, CandidateSet};
pub use commit::{accepted_prefix, commit, Commit};
pub use matrices::Matrices;
pub use relabeler::{fix, Relabeler, Relabeling, RoundStats};
pub use traits::LabelCorrection;

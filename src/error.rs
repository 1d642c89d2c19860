use thiserror::Error;

/// Result alias for `relabel`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by similarity validation and the relabeling loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Label count does not match the similarity matrix order.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Shape mismatch (string description).
    #[error("shape mismatch: expected {expected}, actual {actual}")]
    ShapeMismatch {
        /// Expected shape description.
        expected: String,
        /// Actual shape description.
        actual: String,
    },

    /// `S[row][col]` and `S[col][row]` differ by more than the tolerance.
    #[error("similarity matrix is not symmetric at ({row}, {col}): difference {difference}")]
    Asymmetric {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// Absolute difference between the mirrored entries.
        difference: f64,
    },

    /// A similarity entry is below zero.
    #[error("negative similarity {value} at ({row}, {col})")]
    NegativeSimilarity {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// The entry.
        value: f64,
    },

    /// A similarity entry is NaN or infinite.
    #[error("non-finite similarity at ({row}, {col})")]
    NonFiniteSimilarity {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
    },

    /// The similarity matrix sums to zero, so nothing can be normalized.
    #[error("similarity matrix has zero total mass")]
    ZeroMass,

    /// The similarity entries are finite but their sum overflows.
    #[error("similarity matrix total mass is not finite")]
    NonFiniteMass,

    /// Relabeling did not reach a fixed point within the round limit.
    #[error("did not converge after {iterations} iterations")]
    ConvergenceFailure {
        /// Number of rounds attempted.
        iterations: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },
}

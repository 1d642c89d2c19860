//! Validated similarity matrices.
//!
//! The relabeler treats samples as nodes of a weighted undirected graph whose
//! adjacency matrix is the pairwise similarity matrix `S`. Every entry must be
//! finite and non-negative, and `S` must be symmetric. The diagonal is kept as
//! self-similarity and takes part in every sum.
//!
//! The total mass
//!
//! ```text
//! tot = Σᵢⱼ S[i][j] / 2
//! ```
//!
//! is the graph's total edge weight with the symmetric double count removed.

use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView2};
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;

/// Default absolute tolerance for the symmetry check.
pub const DEFAULT_SYMMETRY_TOLERANCE: f64 = 1e-9;

/// A square, symmetric, non-negative similarity matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    inner: Array2<f64>,
    total_mass: f64,
}

impl SimilarityMatrix {
    /// Validate `matrix` with the default symmetry tolerance.
    pub fn new(matrix: Array2<f64>) -> Result<Self> {
        Self::with_tolerance(matrix, DEFAULT_SYMMETRY_TOLERANCE)
    }

    /// Validate `matrix`, allowing mirrored entries to differ by at most `tolerance`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] for a 0 x 0 matrix
    /// - [`Error::ShapeMismatch`] if the matrix is not square
    /// - [`Error::NonFiniteSimilarity`] / [`Error::NegativeSimilarity`] for bad entries
    /// - [`Error::Asymmetric`] if `|S[i][j] - S[j][i]| > tolerance`
    pub fn with_tolerance(matrix: Array2<f64>, tolerance: f64) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(Error::InvalidParameter {
                name: "symmetry_tolerance",
                message: "must be finite and non-negative",
            });
        }

        let (rows, cols) = matrix.dim();
        if rows == 0 && cols == 0 {
            return Err(Error::EmptyInput);
        }
        if rows != cols {
            return Err(Error::ShapeMismatch {
                expected: format!("{rows} x {rows}"),
                actual: format!("{rows} x {cols}"),
            });
        }

        for ((row, col), &value) in matrix.indexed_iter() {
            if !value.is_finite() {
                return Err(Error::NonFiniteSimilarity { row, col });
            }
            if value < 0.0 {
                return Err(Error::NegativeSimilarity { row, col, value });
            }
        }

        for row in 0..rows {
            for col in (row + 1)..cols {
                let difference = (matrix[[row, col]] - matrix[[col, row]]).abs();
                if difference > tolerance {
                    return Err(Error::Asymmetric {
                        row,
                        col,
                        difference,
                    });
                }
            }
        }

        let total_mass = matrix.sum() / 2.0;
        Ok(Self {
            inner: matrix,
            total_mass,
        })
    }

    /// Build from row vectors.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::EmptyInput);
        }
        let n = rows.len();
        if let Some(row) = rows.iter().find(|r| r.len() != n) {
            return Err(Error::ShapeMismatch {
                expected: format!("{n} x {n}"),
                actual: format!("row of length {}", row.len()),
            });
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let matrix = Array2::from_shape_vec((n, n), flat).map_err(|e| Error::ShapeMismatch {
            expected: format!("{n} x {n}"),
            actual: e.to_string(),
        })?;
        Self::new(matrix)
    }

    /// Build a dense similarity matrix from a weighted undirected graph.
    ///
    /// Each edge contributes its weight to both mirrored entries; a self-loop
    /// contributes to the diagonal once. Parallel edges accumulate.
    pub fn from_graph<N, E>(graph: &UnGraph<N, E>) -> Result<Self>
    where
        E: Copy + Into<f64>,
    {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let mut matrix = Array2::<f64>::zeros((n, n));
        for edge in graph.edge_references() {
            let i = edge.source().index();
            let j = edge.target().index();
            let w: f64 = (*edge.weight()).into();
            if i == j {
                matrix[[i, i]] += w;
            } else {
                matrix[[i, j]] += w;
                matrix[[j, i]] += w;
            }
        }
        Self::new(matrix)
    }

    /// Number of samples (matrix order).
    pub fn n_samples(&self) -> usize {
        self.inner.nrows()
    }

    /// `sum(S) / 2`.
    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    /// Similarity between samples `i` and `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner[[i, j]]
    }

    /// Borrow the underlying matrix.
    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.inner.view()
    }

    /// Consume and return the underlying matrix.
    pub fn into_inner(self) -> Array2<f64> {
        self.inner
    }
}

impl TryFrom<Array2<f64>> for SimilarityMatrix {
    type Error = Error;

    fn try_from(matrix: Array2<f64>) -> Result<Self> {
        Self::new(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_total_mass_halves_sum() {
        let s = SimilarityMatrix::new(array![[1.0, 0.5], [0.5, 1.0]]).unwrap();
        assert!((s.total_mass() - 1.5).abs() < 1e-12);
        assert_eq!(s.n_samples(), 2);
    }

    #[test]
    fn test_try_from_keeps_entries() {
        let m = array![[0.0, 2.0], [2.0, 1.0]];
        let s = SimilarityMatrix::try_from(m.clone()).unwrap();
        assert!((s.total_mass() - 2.5).abs() < 1e-12);
        assert_eq!(s.into_inner(), m);
    }

    #[test]
    fn test_rejects_non_square() {
        let err = SimilarityMatrix::new(Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(
            SimilarityMatrix::new(Array2::zeros((0, 0))).unwrap_err(),
            Error::EmptyInput
        );
        assert_eq!(SimilarityMatrix::from_rows(&[]).unwrap_err(), Error::EmptyInput);
    }

    #[test]
    fn test_rejects_asymmetric() {
        let err = SimilarityMatrix::new(array![[1.0, 0.2], [0.3, 1.0]]).unwrap_err();
        match err {
            Error::Asymmetric { row, col, difference } => {
                assert_eq!((row, col), (0, 1));
                assert!((difference - 0.1).abs() < 1e-12);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tolerance_admits_small_asymmetry() {
        let m = array![[1.0, 0.2], [0.2 + 1e-6, 1.0]];
        assert!(SimilarityMatrix::new(m.clone()).is_err());
        assert!(SimilarityMatrix::with_tolerance(m, 1e-4).is_ok());
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let err = SimilarityMatrix::new(array![[1.0, -0.2], [-0.2, 1.0]]).unwrap_err();
        assert!(matches!(err, Error::NegativeSimilarity { row: 0, col: 1, .. }));

        let err = SimilarityMatrix::new(array![[f64::NAN, 0.0], [0.0, 1.0]]).unwrap_err();
        assert_eq!(err, Error::NonFiniteSimilarity { row: 0, col: 0 });
    }

    #[test]
    fn test_rejects_bad_tolerance() {
        let err = SimilarityMatrix::with_tolerance(array![[1.0]], -1.0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![1.0, 0.1], vec![0.1]];
        assert!(matches!(
            SimilarityMatrix::from_rows(&rows).unwrap_err(),
            Error::ShapeMismatch { .. }
        ));
    }

    #[test]
    fn test_from_graph_mirrors_edges() {
        let mut graph = UnGraph::<(), f64>::new_undirected();
        let a = graph.add_node(());
        let b = graph.add_node(());
        let c = graph.add_node(());
        let _ = graph.add_edge(a, b, 0.5);
        let _ = graph.add_edge(b, c, 0.25);
        let _ = graph.add_edge(c, c, 1.0);

        let s = SimilarityMatrix::from_graph(&graph).unwrap();
        assert_eq!(s.get(0, 1), 0.5);
        assert_eq!(s.get(1, 0), 0.5);
        assert_eq!(s.get(2, 1), 0.25);
        assert_eq!(s.get(2, 2), 1.0);
        assert_eq!(s.get(0, 2), 0.0);
        // 2 * (0.5 + 0.25) + 1.0 over two
        assert!((s.total_mass() - 1.25).abs() < 1e-12);
    }
}

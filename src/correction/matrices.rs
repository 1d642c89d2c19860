//! Group-association (E) and membership (A) matrices.
//!
//! With `tot = Σ S / 2`:
//!
//! ```text
//! A[i][c] = Σ_{j ∈ c} S[i][j] / tot            (m × k)
//! E[a][b] = Σ_{i ∈ a, j ∈ b} S[i][j] / (2·tot)  (k × k)
//! ```
//!
//! E is a probability mass over class pairs (entries sum to 1) and its row sum
//! `a_c` is the fraction of all similarity mass incident to class c. The
//! partition modularity is
//!
//! ```text
//! Q = Σ_c (E[c][c] - a_c²)
//! ```

use crate::error::{Error, Result};
use crate::partition::Partition;
use crate::similarity::SimilarityMatrix;
use ndarray::{Array2, ArrayView1, ArrayView2};

/// E and A for one partition of one similarity matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrices {
    group: Array2<f64>,
    membership: Array2<f64>,
    total_mass: f64,
}

impl Matrices {
    /// Build E and A from scratch.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if the partition and matrix disagree on sample count
    /// - [`Error::NonFiniteMass`] if the similarity sum overflows
    /// - [`Error::ZeroMass`] if the similarity matrix sums to zero
    pub fn build(similarity: &SimilarityMatrix, partition: &Partition) -> Result<Self> {
        let m = similarity.n_samples();
        if partition.n_samples() != m {
            return Err(Error::DimensionMismatch {
                expected: m,
                found: partition.n_samples(),
            });
        }

        let tot = similarity.total_mass();
        if !tot.is_finite() {
            return Err(Error::NonFiniteMass);
        }
        if tot <= 0.0 {
            return Err(Error::ZeroMass);
        }

        let k = partition.n_classes();

        // Raw similarity mass from each sample to each class
        let mut mass = Array2::<f64>::zeros((m, k));
        for (i, row) in similarity.view().outer_iter().enumerate() {
            for (j, &w) in row.iter().enumerate() {
                mass[[i, partition.class_of(j)]] += w;
            }
        }

        // Upper triangle, mirrored so E is exactly symmetric
        let mut group = Array2::<f64>::zeros((k, k));
        for a in 0..k {
            for b in a..k {
                let pair_mass: f64 = partition.members(a).iter().map(|&i| mass[[i, b]]).sum();
                let e = pair_mass / (2.0 * tot);
                group[[a, b]] = e;
                group[[b, a]] = e;
            }
        }

        Ok(Self {
            group,
            membership: mass / tot,
            total_mass: tot,
        })
    }

    /// E, the class × class association matrix.
    pub fn group(&self) -> ArrayView2<'_, f64> {
        self.group.view()
    }

    /// A, the sample × class membership matrix.
    pub fn membership(&self) -> ArrayView2<'_, f64> {
        self.membership.view()
    }

    /// Membership row of one sample.
    pub fn membership_of(&self, sample: usize) -> ArrayView1<'_, f64> {
        self.membership.row(sample)
    }

    /// `tot` used for normalization.
    pub fn total_mass(&self) -> f64 {
        self.total_mass
    }

    /// Number of classes.
    pub fn n_classes(&self) -> usize {
        self.group.nrows()
    }

    /// `a_c`, the row sum of E.
    pub fn class_weight(&self, class: usize) -> f64 {
        self.group.row(class).sum()
    }

    /// `d_i`, the row sum of A.
    pub fn degree(&self, sample: usize) -> f64 {
        self.membership.row(sample).sum()
    }

    /// Partition modularity `Σ_c (E[c][c] - a_c²)`.
    pub fn modularity(&self) -> f64 {
        (0..self.n_classes())
            .map(|c| {
                let a = self.class_weight(c);
                self.group[[c, c]] - a * a
            })
            .sum()
    }

    /// Move one sample to class `to`, patching E and A in place.
    ///
    /// Only the rows and columns of the old and new class change in E, and only
    /// those two columns change in A. The result equals [`Matrices::build`] on
    /// the updated partition up to rounding. This handles exactly one move; a
    /// batch must be applied as a sequence of calls so every call sees the A of
    /// the move before it.
    ///
    /// Returns the sample's previous class.
    pub fn apply_move(
        &mut self,
        similarity: &SimilarityMatrix,
        partition: &mut Partition,
        sample: usize,
        to: usize,
    ) -> Result<usize> {
        let m = self.membership.nrows();
        let k = self.n_classes();
        if sample >= m || partition.n_samples() != m {
            return Err(Error::InvalidParameter {
                name: "sample",
                message: "sample index out of range",
            });
        }
        if to >= k || partition.n_classes() != k {
            return Err(Error::InvalidParameter {
                name: "to",
                message: "class index out of range",
            });
        }

        let from = partition.class_of(sample);
        if from == to {
            return Ok(from);
        }

        let tot = self.total_mass;
        let row = self.membership.row(sample).to_owned();
        // The self-pair (sample, sample) leaves E[from][from] and lands in E[to][to]
        let own = similarity.get(sample, sample) / (2.0 * tot);

        self.group[[from, from]] -= row[from] - own;
        self.group[[to, to]] += row[to] + own;
        let cross = (row[from] - row[to]) / 2.0 - own;
        self.group[[from, to]] += cross;
        self.group[[to, from]] += cross;
        for c in (0..k).filter(|&c| c != from && c != to) {
            let half = row[c] / 2.0;
            self.group[[from, c]] -= half;
            self.group[[c, from]] -= half;
            self.group[[to, c]] += half;
            self.group[[c, to]] += half;
        }

        for (i, mut a_row) in self.membership.outer_iter_mut().enumerate() {
            let w = similarity.get(i, sample) / tot;
            a_row[from] -= w;
            a_row[to] += w;
        }

        let _ = partition.reassign(sample, to);
        Ok(from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::ClassSet;
    use ndarray::array;

    fn two_blocks() -> SimilarityMatrix {
        SimilarityMatrix::new(array![
            [1.0, 0.1, 0.1, 0.1, 0.9, 0.9],
            [0.1, 1.0, 0.9, 0.9, 0.1, 0.1],
            [0.1, 0.9, 1.0, 0.9, 0.1, 0.1],
            [0.1, 0.9, 0.9, 1.0, 0.1, 0.1],
            [0.9, 0.1, 0.1, 0.1, 1.0, 0.9],
            [0.9, 0.1, 0.1, 0.1, 0.9, 1.0],
        ])
        .unwrap()
    }

    fn assert_close(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>, tol: f64) {
        assert_eq!(a.dim(), b.dim());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tol, "{x} vs {y}");
        }
    }

    #[test]
    fn test_group_mass_sums_to_one() {
        let s = two_blocks();
        let labels = ["0", "1", "1", "0", "0", "0"];
        let classes = ClassSet::from_labels(&labels);
        let partition = Partition::from_labels(&labels, &classes).unwrap();
        let mats = Matrices::build(&s, &partition).unwrap();

        assert!((mats.group().sum() - 1.0).abs() < 1e-12);
        assert_eq!(mats.group()[[0, 1]], mats.group()[[1, 0]]);
        // tot = 9.3; class "1" = {1, 2}: 1 + 0.9 + 0.9 + 1
        assert!((mats.group()[[1, 1]] - 3.8 / 18.6).abs() < 1e-12);
        // Sample 3 against class "1": 0.9 + 0.9
        assert!((mats.membership()[[3, 1]] - 1.8 / 9.3).abs() < 1e-12);
    }

    #[test]
    fn test_degree_is_twice_row_share() {
        let s = two_blocks();
        let partition = Partition::from_assignments(vec![0, 1, 1, 0, 0, 0], 2).unwrap();
        let mats = Matrices::build(&s, &partition).unwrap();
        // Row sum of every sample is 3.1
        for i in 0..6 {
            assert!((mats.degree(i) - 3.1 / 9.3).abs() < 1e-12);
        }
        let total_weight: f64 = (0..2).map(|c| mats.class_weight(c)).sum();
        assert!((total_weight - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_modularity_of_noisy_and_clean_partition() {
        let s = two_blocks();
        let noisy = Partition::from_assignments(vec![0, 1, 1, 0, 0, 0], 2).unwrap();
        let clean = Partition::from_assignments(vec![0, 1, 1, 1, 0, 0], 2).unwrap();

        let q_noisy = Matrices::build(&s, &noisy).unwrap().modularity();
        let q_clean = Matrices::build(&s, &clean).unwrap().modularity();
        assert!((q_noisy - 0.186_379_928_315_412_2).abs() < 1e-9);
        assert!((q_clean - 0.403_225_806_451_612_9).abs() < 1e-9);
    }

    #[test]
    fn test_single_class_modularity_is_zero() {
        let s = two_blocks();
        let partition = Partition::from_assignments(vec![0; 6], 1).unwrap();
        let mats = Matrices::build(&s, &partition).unwrap();
        assert!(mats.modularity().abs() < 1e-12);
    }

    #[test]
    fn test_empty_class_is_all_zero() {
        let s = two_blocks();
        let partition = Partition::from_assignments(vec![0, 0, 0, 0, 0, 0], 3).unwrap();
        let mats = Matrices::build(&s, &partition).unwrap();
        assert!(mats.group().row(2).iter().all(|&x| x == 0.0));
        assert!(mats.membership().column(1).iter().all(|&x| x == 0.0));
        assert!(mats.modularity().is_finite());
    }

    #[test]
    fn test_zero_mass_is_rejected() {
        let s = SimilarityMatrix::new(Array2::zeros((3, 3))).unwrap();
        let partition = Partition::from_assignments(vec![0, 1, 0], 2).unwrap();
        assert_eq!(Matrices::build(&s, &partition).unwrap_err(), Error::ZeroMass);
    }

    #[test]
    fn test_overflowing_mass_is_rejected() {
        // Every entry is finite, their sum is not
        let s = SimilarityMatrix::new(array![
            [1e308, 1e308, 0.0],
            [1e308, 1e308, 0.0],
            [0.0, 0.0, 1e308],
        ])
        .unwrap();
        assert!(s.total_mass().is_infinite());
        let partition = Partition::from_assignments(vec![0, 1, 1], 2).unwrap();
        assert_eq!(
            Matrices::build(&s, &partition).unwrap_err(),
            Error::NonFiniteMass
        );
    }

    #[test]
    fn test_size_mismatch_is_rejected() {
        let s = two_blocks();
        let partition = Partition::from_assignments(vec![0, 1], 2).unwrap();
        assert!(matches!(
            Matrices::build(&s, &partition).unwrap_err(),
            Error::DimensionMismatch { expected: 6, found: 2 }
        ));
    }

    #[test]
    fn test_apply_move_matches_rebuild() {
        let s = SimilarityMatrix::new(array![
            [0.7, 0.2, 0.5, 0.1, 0.3],
            [0.2, 0.4, 0.6, 0.9, 0.0],
            [0.5, 0.6, 1.0, 0.3, 0.8],
            [0.1, 0.9, 0.3, 0.2, 0.4],
            [0.3, 0.0, 0.8, 0.4, 0.6],
        ])
        .unwrap();
        let mut partition = Partition::from_assignments(vec![0, 1, 2, 0, 1], 3).unwrap();
        let mut mats = Matrices::build(&s, &partition).unwrap();

        for &(sample, to) in &[(0, 2), (3, 1), (2, 0), (0, 1), (4, 2)] {
            let from = partition.class_of(sample);
            assert_eq!(mats.apply_move(&s, &mut partition, sample, to).unwrap(), from);
            let rebuilt = Matrices::build(&s, &partition).unwrap();
            assert_close(mats.group(), rebuilt.group(), 1e-12);
            assert_close(mats.membership(), rebuilt.membership(), 1e-12);
        }
    }

    #[test]
    fn test_apply_move_to_same_class_is_noop() {
        let s = two_blocks();
        let mut partition = Partition::from_assignments(vec![0, 1, 1, 0, 0, 0], 2).unwrap();
        let mut mats = Matrices::build(&s, &partition).unwrap();
        let before = mats.clone();
        assert_eq!(mats.apply_move(&s, &mut partition, 2, 1).unwrap(), 1);
        assert_eq!(mats, before);
        assert!(mats.apply_move(&s, &mut partition, 9, 0).is_err());
        assert!(mats.apply_move(&s, &mut partition, 0, 5).is_err());
    }
}

//! Labeling-as-partition view of a dataset.
//!
//! A [`ClassSet`] fixes the ordered set of distinct labels seen in the initial
//! label vector; position in the set is the class index used by every matrix.
//! A [`Partition`] is the evolving assignment of samples to those indices,
//! with a member list per class.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::hash::Hash;

/// Ordered distinct labels, in order of first appearance.
#[derive(Debug, Clone)]
pub struct ClassSet<L> {
    labels: Vec<L>,
    index: HashMap<L, usize>,
}

impl<L: Clone + Eq + Hash> ClassSet<L> {
    /// Collect the distinct labels of `labels`, first appearance first.
    pub fn from_labels(labels: &[L]) -> Self {
        let mut ordered = Vec::new();
        let mut index = HashMap::new();
        for label in labels {
            if !index.contains_key(label) {
                let _ = index.insert(label.clone(), ordered.len());
                ordered.push(label.clone());
            }
        }
        Self {
            labels: ordered,
            index,
        }
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if no labels were seen.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Class index of `label`.
    pub fn index_of(&self, label: &L) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Label at class index `class`.
    pub fn label(&self, class: usize) -> &L {
        &self.labels[class]
    }

    /// Labels in class-index order.
    pub fn labels(&self) -> &[L] {
        &self.labels
    }
}

/// Assignment of samples to class indices.
///
/// Member lists are kept sorted by sample index, and a class may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    class_of: Vec<usize>,
    members: Vec<Vec<usize>>,
    revision: u64,
}

impl Partition {
    /// Encode `labels` against `classes`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if a label is not in the class set.
    pub fn from_labels<L: Clone + Eq + Hash>(labels: &[L], classes: &ClassSet<L>) -> Result<Self> {
        let class_of = labels
            .iter()
            .map(|l| {
                classes.index_of(l).ok_or(Error::InvalidParameter {
                    name: "labels",
                    message: "label is not in the class set",
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_assignments(class_of, classes.len())
    }

    /// Build from raw class indices.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if an index is `>= n_classes`.
    pub fn from_assignments(class_of: Vec<usize>, n_classes: usize) -> Result<Self> {
        let mut members = vec![Vec::new(); n_classes];
        for (sample, &class) in class_of.iter().enumerate() {
            members
                .get_mut(class)
                .ok_or(Error::InvalidParameter {
                    name: "class_of",
                    message: "class index out of range",
                })?
                .push(sample);
        }
        Ok(Self {
            class_of,
            members,
            revision: 0,
        })
    }

    /// Number of samples.
    pub fn n_samples(&self) -> usize {
        self.class_of.len()
    }

    /// Number of classes, including empty ones.
    pub fn n_classes(&self) -> usize {
        self.members.len()
    }

    /// Class index of `sample`.
    pub fn class_of(&self, sample: usize) -> usize {
        self.class_of[sample]
    }

    /// Class index per sample.
    pub fn assignments(&self) -> &[usize] {
        &self.class_of
    }

    /// Samples currently in `class`, ascending.
    pub fn members(&self, class: usize) -> &[usize] {
        &self.members[class]
    }

    /// Bumped on every reassignment.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Move `sample` into class `to` and return its previous class.
    pub fn reassign(&mut self, sample: usize, to: usize) -> usize {
        let from = self.class_of[sample];
        if from == to {
            return from;
        }
        if let Ok(pos) = self.members[from].binary_search(&sample) {
            let _ = self.members[from].remove(pos);
        }
        if let Err(pos) = self.members[to].binary_search(&sample) {
            self.members[to].insert(pos, sample);
        }
        self.class_of[sample] = to;
        self.revision += 1;
        from
    }

    /// Decode back into labels.
    pub fn to_labels<L: Clone + Eq + Hash>(&self, classes: &ClassSet<L>) -> Vec<L> {
        self.class_of
            .iter()
            .map(|&c| classes.label(c).clone())
            .collect()
    }
}

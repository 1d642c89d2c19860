//! Batch acceptance of candidates.
//!
//! Candidates are walked best-first along a descending chain: each accepted
//! candidate becomes the reference for the next one, which is accepted only
//! if `delta <= alpha * previous_delta`. The first rejection ends the batch.
//! This is not a fixed `alpha * max` cutoff; with `alpha < 1` the chain only
//! continues through candidates that are clearly weaker than the last one
//! taken.
//!
//! The head of the ranking is always taken, so every non-empty batch commits
//! at least one move and the loop makes progress for any `alpha` in (0, 1].

use super::candidate::{Candidate, CandidateSet};
use super::matrices::Matrices;
use crate::error::Result;
use crate::partition::Partition;
use crate::similarity::SimilarityMatrix;
use tracing::debug;

/// Outcome of one committed batch.
#[derive(Debug, Clone)]
pub struct Commit {
    /// Accepted candidates, best first.
    pub accepted: Vec<Candidate>,
    /// E and A rebuilt for the updated partition.
    pub matrices: Matrices,
}

/// Length of the accepted prefix of `ranked` (sorted by descending delta).
pub fn accepted_prefix(ranked: &[Candidate], alpha: f64) -> usize {
    let Some(head) = ranked.first() else {
        return 0;
    };

    let mut threshold = head.delta;
    let mut accepted = 1;
    for candidate in &ranked[1..] {
        if candidate.delta <= alpha * threshold {
            threshold = candidate.delta;
            accepted += 1;
        } else {
            break;
        }
    }
    accepted
}

/// Apply the accepted prefix of `candidates` to `partition` and rebuild E and A.
///
/// The candidate set is consumed; the next round starts from an empty one.
pub fn commit(
    candidates: CandidateSet,
    alpha: f64,
    similarity: &SimilarityMatrix,
    partition: &mut Partition,
) -> Result<Commit> {
    let mut ranked = candidates.into_ranked();
    let n = accepted_prefix(&ranked, alpha);
    ranked.truncate(n);

    for candidate in &ranked {
        debug!(
            sample = candidate.sample,
            from = candidate.from,
            to = candidate.to,
            delta = candidate.delta,
            "relabeling sample"
        );
        let _ = partition.reassign(candidate.sample, candidate.to);
    }

    let matrices = Matrices::build(similarity, partition)?;
    Ok(Commit {
        accepted: ranked,
        matrices,
    })
}

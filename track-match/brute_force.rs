use rayon::prelude::*;
use track_core::{Match, MatchCandidate};

use crate::distance::DescriptorDistance;

/// Exhaustive matcher comparing every query against every train descriptor
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceMatcher;

impl BruteForceMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Up to `k` candidates per query, nearest first.
    ///
    /// Equal distances are ordered by train index.
    pub fn knn_match<D>(&self, query: &[D], train: &[D], k: usize) -> Vec<Vec<MatchCandidate>>
    where
        D: DescriptorDistance + Sync,
    {
        query
            .par_iter()
            .enumerate()
            .map(|(query_idx, q)| {
                let mut candidates: Vec<MatchCandidate> = train
                    .iter()
                    .enumerate()
                    .map(|(train_idx, t)| MatchCandidate::new(query_idx, train_idx, q.distance(t)))
                    .collect();
                candidates.sort_by(|a, b| {
                    a.distance
                        .total_cmp(&b.distance)
                        .then_with(|| a.train_idx.cmp(&b.train_idx))
                });
                candidates.truncate(k);
                candidates
            })
            .collect()
    }

    /// Nearest train descriptor for every query; empty when `train` is empty
    pub fn match_best<D>(&self, query: &[D], train: &[D]) -> Vec<Match>
    where
        D: DescriptorDistance + Sync,
    {
        self.knn_match(query, train, 1)
            .into_iter()
            .filter_map(|candidates| candidates.first().copied().map(Match::from))
            .collect()
    }
}

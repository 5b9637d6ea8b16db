use log::trace;
use track_core::{InputError, Match, MatchCandidate};

use crate::error::{MatchError, MatchResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_RATIO: f32 = 0.8;

/// Lowe's test: the best candidate must be strictly closer than
/// `ratio` times the second best.
///
/// A zero second distance always fails.
#[inline]
pub fn passes_ratio_test(best: &MatchCandidate, second: &MatchCandidate, ratio: f32) -> bool {
    best.distance < ratio * second.distance
}

/// Keep the best candidate of every pair that passes the ratio test, in input order.
pub fn filter_pairs(pairs: &[(MatchCandidate, MatchCandidate)], ratio: f32) -> Vec<Match> {
    let matches: Vec<Match> = pairs
        .iter()
        .filter(|(best, second)| passes_ratio_test(best, second, ratio))
        .map(|(best, _)| Match::from(*best))
        .collect();
    trace!("ratio {} kept {} of {} queries", ratio, matches.len(), pairs.len());
    matches
}

/// Ratio-filter ranked k-NN lists, reading the first two entries of each.
///
/// A list with fewer than two candidates is an input error rather than a
/// silent drop.
pub fn filter_knn(knn: &[Vec<MatchCandidate>], ratio: f32) -> Result<Vec<Match>, InputError> {
    let mut matches = Vec::with_capacity(knn.len());
    for (query, candidates) in knn.iter().enumerate() {
        match candidates.as_slice() {
            [best, second, ..] => {
                if passes_ratio_test(best, second, ratio) {
                    matches.push(Match::from(*best));
                }
            }
            _ => return Err(InputError::MissingCandidates { query, found: candidates.len() }),
        }
    }
    Ok(matches)
}

/// Validated ratio threshold
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RatioTest {
    ratio: f32,
}

impl RatioTest {
    pub fn new(ratio: f32) -> MatchResult<Self> {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(MatchError::InvalidRatio(ratio));
        }
        Ok(Self { ratio })
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn passes(&self, best: &MatchCandidate, second: &MatchCandidate) -> bool {
        passes_ratio_test(best, second, self.ratio)
    }

    pub fn filter_pairs(&self, pairs: &[(MatchCandidate, MatchCandidate)]) -> Vec<Match> {
        filter_pairs(pairs, self.ratio)
    }

    pub fn filter_knn(&self, knn: &[Vec<MatchCandidate>]) -> MatchResult<Vec<Match>> {
        Ok(filter_knn(knn, self.ratio)?)
    }
}

impl Default for RatioTest {
    fn default() -> Self {
        Self { ratio: DEFAULT_RATIO }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pair(query: usize, best: f32, second: f32) -> (MatchCandidate, MatchCandidate) {
        (MatchCandidate::new(query, 10 + query, best), MatchCandidate::new(query, 20 + query, second))
    }

    #[test]
    fn test_clear_and_ambiguous_pairs() {
        let pairs = [pair(0, 1.0, 2.0), pair(1, 1.8, 2.0)];
        let matches = filter_pairs(&pairs, DEFAULT_RATIO);
        assert_eq!(matches, vec![Match { query_idx: 0, reference_idx: 10, distance: 1.0 }]);
    }

    #[test]
    fn test_zero_second_distance_drops() {
        assert!(filter_pairs(&[pair(0, 0.0, 0.0)], DEFAULT_RATIO).is_empty());
        assert!(!passes_ratio_test(&pair(0, 0.0, 0.0).0, &pair(0, 0.0, 0.0).1, 0.99));

        // A positive best distance with a zero second distance is dropped too
        assert!(filter_pairs(&[pair(0, 3.0, 0.0)], DEFAULT_RATIO).is_empty());
        for best in [0.5f32, 3.0, 256.0] {
            let (b, s) = pair(1, best, 0.0);
            assert!(!passes_ratio_test(&b, &s, 0.99));
        }
        let kept = filter_pairs(&[pair(0, 3.0, 0.0), pair(1, 1.0, 4.0)], DEFAULT_RATIO);
        assert_eq!(kept, vec![Match { query_idx: 1, reference_idx: 11, distance: 1.0 }]);
    }

    #[test]
    fn test_boundary_is_strict() {
        // 0.5 * 2.0 == 1.0 exactly
        let (best, second) = pair(0, 1.0, 2.0);
        assert!(!passes_ratio_test(&best, &second, 0.5));
        assert!(passes_ratio_test(&best, &second, 0.51));
    }

    #[test]
    fn test_filter_knn_reads_first_two() {
        let knn = vec![
            vec![MatchCandidate::new(0, 3, 10.0), MatchCandidate::new(0, 1, 40.0), MatchCandidate::new(0, 2, 41.0)],
            vec![MatchCandidate::new(1, 0, 30.0), MatchCandidate::new(1, 4, 31.0)],
        ];
        let matches = filter_knn(&knn, DEFAULT_RATIO).unwrap();
        assert_eq!(matches, vec![Match { query_idx: 0, reference_idx: 3, distance: 10.0 }]);
    }

    #[test]
    fn test_filter_knn_short_list() {
        let knn = vec![
            vec![MatchCandidate::new(0, 3, 10.0), MatchCandidate::new(0, 1, 40.0)],
            vec![MatchCandidate::new(1, 0, 30.0)],
        ];
        let result = filter_knn(&knn, DEFAULT_RATIO);
        assert!(matches!(result, Err(InputError::MissingCandidates { query: 1, found: 1 })));

        let result = RatioTest::default().filter_knn(&[vec![]]);
        assert!(matches!(result, Err(MatchError::Input(InputError::MissingCandidates { query: 0, found: 0 }))));
    }

    #[test]
    fn test_ratio_validation() {
        assert_eq!(RatioTest::default().ratio(), 0.8);
        assert!(RatioTest::new(0.7).is_ok());
        for bad in [0.0, 1.0, -0.2, 1.5, f32::NAN] {
            assert!(matches!(RatioTest::new(bad), Err(MatchError::InvalidRatio(_))));
        }
    }

    proptest! {
        #[test]
        fn prop_keeps_exactly_passing_queries(
            dists in prop::collection::vec((0.0f32..100.0, 0.0f32..100.0), 0..40),
            ratio in 0.05f32..0.95,
        ) {
            let pairs: Vec<_> = dists
                .iter()
                .enumerate()
                .map(|(q, &(a, b))| pair(q, a.min(b), a.max(b)))
                .collect();
            let matches = filter_pairs(&pairs, ratio);

            let expected: Vec<usize> = pairs
                .iter()
                .filter(|(best, second)| best.distance < ratio * second.distance)
                .map(|(best, _)| best.query_idx)
                .collect();
            let kept: Vec<usize> = matches.iter().map(|m| m.query_idx).collect();
            prop_assert_eq!(kept, expected);

            for m in &matches {
                prop_assert_eq!(m.reference_idx, 10 + m.query_idx);
            }
        }

        #[test]
        fn prop_knn_agrees_with_pairs(dists in prop::collection::vec((0.0f32..50.0, 0.0f32..50.0), 0..30)) {
            let pairs: Vec<_> = dists.iter().enumerate().map(|(q, &(a, b))| pair(q, a.min(b), a.max(b))).collect();
            let knn: Vec<Vec<MatchCandidate>> = pairs.iter().map(|(b, s)| vec![*b, *s]).collect();
            prop_assert_eq!(filter_knn(&knn, DEFAULT_RATIO).unwrap(), filter_pairs(&pairs, DEFAULT_RATIO));
        }
    }
}

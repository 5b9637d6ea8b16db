use std::time::Instant;

use log::{debug, warn};
use track_core::Match;

use crate::brute_force::BruteForceMatcher;
use crate::config::MatchConfig;
use crate::distance::DescriptorDistance;
use crate::error::{MatchError, MatchResult};
use crate::kind::{MatcherKind, SelectorKind};
use crate::ratio::RatioTest;

/// Matches query descriptors against train descriptors with the configured selector
#[derive(Debug, Clone)]
pub struct DescriptorMatcher {
    config: MatchConfig,
    ratio: RatioTest,
    backend: BruteForceMatcher,
}

impl DescriptorMatcher {
    pub fn new(config: MatchConfig) -> MatchResult<Self> {
        let ratio = RatioTest::new(config.ratio)?;
        if config.matcher == MatcherKind::Flann {
            return Err(MatchError::UnsupportedMatcher(config.matcher.name()));
        }
        Ok(Self { config, ratio, backend: BruteForceMatcher::new() })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// NN keeps the best train descriptor per query. KNN takes the two
    /// nearest and keeps queries that pass the ratio test.
    pub fn match_descriptors<D>(&self, query: &[D], train: &[D]) -> MatchResult<Vec<Match>>
    where
        D: DescriptorDistance + Sync,
    {
        let t0 = Instant::now();
        let matches = match self.config.selector {
            SelectorKind::NearestNeighbor => self.backend.match_best(query, train),
            SelectorKind::KNearest => {
                if train.len() < 2 {
                    warn!(
                        "{} needs at least 2 train descriptors, got {}; no matches",
                        self.config.selector,
                        train.len()
                    );
                    return Ok(Vec::new());
                }
                let knn = self.backend.knn_match(query, train, 2);
                self.ratio.filter_knn(&knn)?
            }
        };
        debug!(
            "{} {} with n={} matches from {} queries in {:.2?}",
            self.config.matcher,
            self.config.selector,
            matches.len(),
            query.len(),
            t0.elapsed()
        );
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(bits: &[usize]) -> [u8; 32] {
        let mut d = [0u8; 32];
        for &b in bits {
            d[b / 8] |= 1 << (b % 8);
        }
        d
    }

    #[test]
    fn test_flann_unsupported() {
        let cfg = MatchConfig { matcher: MatcherKind::Flann, ..MatchConfig::default() };
        assert!(matches!(DescriptorMatcher::new(cfg), Err(MatchError::UnsupportedMatcher("MAT_FLANN"))));
        assert!(matches!(
            DescriptorMatcher::new(MatchConfig::default().with_ratio(0.0)),
            Err(MatchError::InvalidRatio(_))
        ));
    }

    #[test]
    fn test_knn_drops_ambiguous_queries() {
        let train = vec![desc(&[]), desc(&(0..40).collect::<Vec<_>>()), desc(&(0..42).collect::<Vec<_>>())];
        // q0 is clearly closest to t0; q1 sits between t1 and t2
        let query = vec![desc(&[1]), desc(&(0..41).collect::<Vec<_>>())];
        let matcher = DescriptorMatcher::new(MatchConfig::default()).unwrap();
        let matches = matcher.match_descriptors(&query, &train).unwrap();
        assert_eq!(matches, vec![Match { query_idx: 0, reference_idx: 0, distance: 1.0 }]);

        let nn = DescriptorMatcher::new(MatchConfig::nearest_neighbor()).unwrap();
        let matches = nn.match_descriptors(&query, &train).unwrap();
        assert_eq!(matches.iter().map(|m| m.reference_idx).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_knn_with_single_train_descriptor() {
        let matcher = DescriptorMatcher::new(MatchConfig::default()).unwrap();
        let matches = matcher.match_descriptors(&[desc(&[0])], &[desc(&[0])]).unwrap();
        assert!(matches.is_empty());

        let nn = DescriptorMatcher::new(MatchConfig::nearest_neighbor()).unwrap();
        assert_eq!(nn.match_descriptors(&[desc(&[0])], &[desc(&[0])]).unwrap().len(), 1);
    }
}

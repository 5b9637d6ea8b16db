use log::{debug, trace};
use track_core::{Keypoint, ResponseField};

use crate::error::{DetectError, DetectResult};
use crate::types::DedupStats;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters of the greedy overlap-based suppression
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DedupConfig {
    /// Cells must be strictly above this value to become candidates
    pub min_response: f32,
    /// Reported keypoint diameter, also used for the overlap geometry
    pub keypoint_size: f32,
    /// Largest tolerated overlap in `[0, 1)`; 0 suppresses any overlap
    pub max_overlap: f32,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            min_response: 100.0,
            keypoint_size: 6.0,
            max_overlap: 0.0,
        }
    }
}

impl DedupConfig {
    pub fn validate(&self) -> DetectResult<()> {
        if !self.min_response.is_finite() {
            return Err(DetectError::InvalidConfig(format!(
                "min_response must be finite, got {}",
                self.min_response
            )));
        }
        if !(self.keypoint_size.is_finite() && self.keypoint_size > 0.0) {
            return Err(DetectError::InvalidConfig(format!(
                "keypoint_size must be positive, got {}",
                self.keypoint_size
            )));
        }
        if !(0.0..1.0).contains(&self.max_overlap) {
            return Err(DetectError::InvalidConfig(format!(
                "max_overlap must lie in [0, 1), got {}",
                self.max_overlap
            )));
        }
        Ok(())
    }
}

/// Greedy non-maximum suppression over a dense response field.
///
/// Cells are visited in row-major order. Each cell above `min_response`
/// becomes a candidate and is compared against the accepted keypoints in
/// insertion order. The first accepted keypoint that overlaps the candidate
/// by more than `max_overlap` and has a strictly lower response is replaced
/// in place, and the comparison stops there. A candidate that overlaps only
/// equal-or-stronger keypoints is dropped; one that overlaps nothing is
/// appended.
///
/// Replacement is first-match, not best-in-neighbourhood, so the result
/// depends on scan order. Equal responses never replace, so the earlier
/// cell wins ties.
pub fn deduplicate(field: &ResponseField, cfg: &DedupConfig) -> DetectResult<Vec<Keypoint>> {
    deduplicate_with_stats(field, cfg).map(|(keypoints, _)| keypoints)
}

/// Same as [`deduplicate`], also returning what happened to each candidate
pub fn deduplicate_with_stats(
    field: &ResponseField,
    cfg: &DedupConfig,
) -> DetectResult<(Vec<Keypoint>, DedupStats)> {
    cfg.validate()?;

    let mut keypoints: Vec<Keypoint> = Vec::new();
    let mut stats = DedupStats::default();

    for (row, col, value) in field.iter_cells() {
        // NaN cells compare false against everything and must not pass
        if value.is_nan() || value <= cfg.min_response {
            continue;
        }
        stats.candidates += 1;

        let candidate = Keypoint::new(col as f32, row as f32, cfg.keypoint_size, value);
        match insert_candidate(&mut keypoints, candidate, cfg.max_overlap) {
            Insertion::Appended => stats.appended += 1,
            Insertion::Replaced(idx) => {
                trace!("({}, {}) replaced keypoint {}", col, row, idx);
                stats.replaced += 1;
            }
            Insertion::Discarded => stats.discarded += 1,
        }
    }

    debug!(
        "dedup: {} candidates -> {} keypoints ({} replaced, {} discarded)",
        stats.candidates,
        keypoints.len(),
        stats.replaced,
        stats.discarded
    );
    Ok((keypoints, stats))
}

enum Insertion {
    Appended,
    Replaced(usize),
    Discarded,
}

fn insert_candidate(keypoints: &mut Vec<Keypoint>, candidate: Keypoint, max_overlap: f32) -> Insertion {
    let mut overlapped = false;
    for (idx, existing) in keypoints.iter_mut().enumerate() {
        if candidate.overlap(existing) > max_overlap {
            overlapped = true;
            if candidate.response > existing.response {
                *existing = candidate;
                return Insertion::Replaced(idx);
            }
        }
    }

    if overlapped {
        Insertion::Discarded
    } else {
        keypoints.push(candidate);
        Insertion::Appended
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field(rows: usize, cols: usize, peaks: &[(usize, usize, f32)]) -> ResponseField {
        let mut f = ResponseField::zeros(rows, cols);
        for &(r, c, v) in peaks {
            f.set(r, c, v);
        }
        f
    }

    fn max_pairwise_overlap(kps: &[Keypoint]) -> f32 {
        let mut worst = 0.0f32;
        for i in 0..kps.len() {
            for j in (i + 1)..kps.len() {
                worst = worst.max(kps[i].overlap(&kps[j]));
            }
        }
        worst
    }

    #[test]
    fn test_single_center_peak() {
        let f = field(3, 3, &[(1, 1, 150.0)]);
        let kps = deduplicate(&f, &DedupConfig::default()).unwrap();
        assert_eq!(kps.len(), 1);
        assert_eq!((kps[0].x, kps[0].y), (1.0, 1.0));
        assert_eq!(kps[0].response, 150.0);
        assert_eq!(kps[0].size, 6.0);
    }

    #[test]
    fn test_adjacent_equal_peaks_keep_first_scanned() {
        let f = field(5, 5, &[(2, 2, 200.0), (2, 3, 200.0)]);
        let (kps, stats) = deduplicate_with_stats(&f, &DedupConfig::default()).unwrap();
        assert_eq!(kps.len(), 1);
        assert_eq!((kps[0].x, kps[0].y), (2.0, 2.0));
        assert_eq!(stats, DedupStats { candidates: 2, appended: 1, replaced: 0, discarded: 1 });

        // Vertical neighbours: the upper row is scanned first
        let f = field(5, 5, &[(1, 2, 200.0), (2, 2, 200.0)]);
        let kps = deduplicate(&f, &DedupConfig::default()).unwrap();
        assert_eq!(kps.len(), 1);
        assert_eq!((kps[0].x, kps[0].y), (2.0, 1.0));
    }

    #[test]
    fn test_stronger_later_peak_replaces_in_place() {
        let f = field(5, 8, &[(2, 2, 150.0), (2, 3, 180.0)]);
        let (kps, stats) = deduplicate_with_stats(&f, &DedupConfig::default()).unwrap();
        assert_eq!(kps.len(), 1);
        assert_eq!((kps[0].x, kps[0].y), (3.0, 2.0));
        assert_eq!(kps[0].response, 180.0);
        assert_eq!(stats.replaced, 1);
    }

    #[test]
    fn test_threshold_is_strict() {
        let f = field(3, 3, &[(0, 0, 100.0), (2, 2, 100.5)]);
        let kps = deduplicate(&f, &DedupConfig::default()).unwrap();
        assert_eq!(kps.len(), 1);
        assert_eq!((kps[0].x, kps[0].y), (2.0, 2.0));
    }

    #[test]
    fn test_distant_peaks_all_survive() {
        let f = field(20, 20, &[(2, 2, 120.0), (2, 12, 130.0), (12, 2, 140.0), (12, 12, 150.0)]);
        let kps = deduplicate(&f, &DedupConfig::default()).unwrap();
        assert_eq!(kps.len(), 4);
        assert_eq!(max_pairwise_overlap(&kps), 0.0);
    }

    #[test]
    fn test_first_match_replacement_is_not_global_best() {
        let f = field(1, 10, &[(0, 0, 110.0), (0, 4, 200.0), (0, 7, 120.0)]);
        let kps = deduplicate(&f, &DedupConfig::default()).unwrap();
        // Scan order: a(0) appended, c(4) overlaps a -> replaces, b(7) overlaps c -> dropped
        assert_eq!(kps.len(), 1);
        assert_eq!(kps[0].x, 4.0);

        // a at col 0 and b at col 7 do not touch (radius 3 each). c, scanned
        // last, overlaps both but only replaces a, leaving c next to b.
        let mut two_rows = ResponseField::zeros(2, 10);
        two_rows.set(0, 0, 110.0);
        two_rows.set(0, 7, 120.0);
        two_rows.set(1, 4, 200.0);
        let kps = deduplicate(&two_rows, &DedupConfig::default()).unwrap();
        assert_eq!(kps.len(), 2);
        assert_eq!((kps[0].x, kps[0].y), (4.0, 1.0));
        assert_eq!((kps[1].x, kps[1].y), (7.0, 0.0));
        assert!(kps[0].overlap(&kps[1]) > 0.0);
    }

    #[test]
    fn test_weaker_overlap_continues_to_later_keypoints() {
        // The candidate loses against the first overlapping keypoint but
        // still replaces a weaker one further down the list.
        let mut f = ResponseField::zeros(2, 10);
        f.set(0, 2, 250.0);
        f.set(0, 8, 120.0);
        f.set(1, 5, 200.0);
        let (kps, stats) = deduplicate_with_stats(&f, &DedupConfig::default()).unwrap();
        assert_eq!(stats.replaced, 1);
        assert_eq!(kps.len(), 2);
        assert_eq!((kps[0].x, kps[0].y), (2.0, 0.0));
        assert_eq!((kps[1].x, kps[1].y), (5.0, 1.0));
    }

    #[test]
    fn test_max_overlap_tolerates_small_overlaps() {
        let f = field(1, 12, &[(0, 2, 150.0), (0, 7, 160.0)]);
        let strict = deduplicate(&f, &DedupConfig::default()).unwrap();
        assert_eq!(strict.len(), 1);

        let loose = DedupConfig { max_overlap: 0.5, ..DedupConfig::default() };
        let kps = deduplicate(&f, &loose).unwrap();
        assert_eq!(kps.len(), 2);
    }

    #[test]
    fn test_invalid_config() {
        let f = ResponseField::zeros(3, 3);
        let cfg = DedupConfig { max_overlap: 1.0, ..DedupConfig::default() };
        assert!(matches!(deduplicate(&f, &cfg), Err(DetectError::InvalidConfig(_))));
        let cfg = DedupConfig { keypoint_size: 0.0, ..DedupConfig::default() };
        assert!(matches!(deduplicate(&f, &cfg), Err(DetectError::InvalidConfig(_))));
        let cfg = DedupConfig { min_response: f32::NAN, ..DedupConfig::default() };
        assert!(matches!(deduplicate(&f, &cfg), Err(DetectError::InvalidConfig(_))));
    }

    #[test]
    fn test_nan_cells_are_skipped() {
        let mut f = ResponseField::zeros(3, 3);
        f.set(1, 1, f32::NAN);
        let (kps, stats) = deduplicate_with_stats(&f, &DedupConfig::default()).unwrap();
        assert!(kps.is_empty());
        assert_eq!(stats.candidates, 0);

        let cfg = DedupConfig { min_response: -1.0, ..DedupConfig::default() };
        f.set(0, 0, f32::NAN);
        let kps = deduplicate(&f, &cfg).unwrap();
        assert!(kps.iter().all(|k| k.response > cfg.min_response));
        assert!(kps.iter().all(|k| !k.response.is_nan()));
    }

    #[test]
    fn test_empty_field() {
        let f = ResponseField::zeros(0, 0);
        let kps = deduplicate(&f, &DedupConfig::default()).unwrap();
        assert!(kps.is_empty());
    }

    fn arb_field() -> impl Strategy<Value = ResponseField> {
        (1usize..12, 1usize..12).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(
                prop_oneof![3 => Just(0.0f32), 1 => 90.0f32..255.0],
                rows * cols,
            )
            .prop_map(move |data| ResponseField::new(rows, cols, data).unwrap())
        })
    }

    fn arb_config() -> impl Strategy<Value = DedupConfig> {
        (90.0f32..200.0, 1.0f32..12.0, 0.0f32..0.9).prop_map(|(min_response, keypoint_size, max_overlap)| {
            DedupConfig { min_response, keypoint_size, max_overlap }
        })
    }

    proptest! {
        #[test]
        fn prop_configured_overlap_bound(f in arb_field(), cfg in arb_config()) {
            let (kps, stats) = deduplicate_with_stats(&f, &cfg).unwrap();
            for kp in &kps {
                prop_assert!(kp.response > cfg.min_response);
                prop_assert_eq!(kp.size, cfg.keypoint_size);
            }
            if stats.replaced == 0 {
                prop_assert!(max_pairwise_overlap(&kps) <= cfg.max_overlap);
            }
        }

        #[test]
        fn prop_responses_above_threshold(f in arb_field()) {
            let cfg = DedupConfig::default();
            let kps = deduplicate(&f, &cfg).unwrap();
            for kp in &kps {
                prop_assert!(kp.response > cfg.min_response);
                prop_assert_eq!(f.get(kp.y as usize, kp.x as usize), Some(kp.response));
            }
        }

        #[test]
        fn prop_stats_are_consistent(f in arb_field()) {
            let (kps, stats) = deduplicate_with_stats(&f, &DedupConfig::default()).unwrap();
            prop_assert_eq!(stats.appended + stats.replaced + stats.discarded, stats.candidates);
            prop_assert_eq!(kps.len(), stats.appended);
        }

        #[test]
        fn prop_no_overlap_without_replacement(f in arb_field()) {
            let cfg = DedupConfig::default();
            let (kps, stats) = deduplicate_with_stats(&f, &cfg).unwrap();
            if stats.replaced == 0 {
                prop_assert!(max_pairwise_overlap(&kps) <= cfg.max_overlap);
            }
        }

        #[test]
        fn prop_idempotent_on_survivors(f in arb_field()) {
            let cfg = DedupConfig::default();
            let (kps, stats) = deduplicate_with_stats(&f, &cfg).unwrap();
            if stats.replaced == 0 {
                let mut degenerate = ResponseField::zeros(f.rows(), f.cols());
                for kp in &kps {
                    degenerate.set(kp.y as usize, kp.x as usize, kp.response);
                }
                let again = deduplicate(&degenerate, &cfg).unwrap();
                prop_assert_eq!(again, kps);
            }
        }

        #[test]
        fn prop_deterministic(f in arb_field()) {
            let cfg = DedupConfig::default();
            prop_assert_eq!(deduplicate(&f, &cfg).unwrap(), deduplicate(&f, &cfg).unwrap());
        }
    }
}

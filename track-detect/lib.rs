//! Corner response fields, greedy keypoint deduplication and the built-in
//! detector variants (Harris, Shi-Tomasi, FAST).

pub mod builder;
pub mod config;
pub mod configured_detector;
pub mod dedup;
pub mod detector;
pub mod error;
pub mod fast;
pub mod kind;
pub mod response;
pub mod suppression;
pub mod types;

pub use builder::DetectorBuilder;
pub use config::DetectorConfig;
pub use configured_detector::ConfiguredDetector;
pub use dedup::{deduplicate, deduplicate_with_stats, DedupConfig};
pub use detector::{FeatureDetector, KeypointDetector};
pub use error::{DetectError, DetectResult};
pub use fast::{has_contiguous_arc, FastCornerDetector, FAST_KEYPOINT_SIZE};
pub use kind::{DetectorKind, FastParams, HarrisParams, ShiTomasiParams};
pub use response::{HarrisResponse, MinEigenResponse, ResponseProvider};
pub use suppression::{local_maxima, min_distance_suppression};
pub use types::DedupStats;

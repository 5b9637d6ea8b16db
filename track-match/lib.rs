//! Brute-force descriptor matching and Lowe ratio-test filtering.

pub mod brute_force;
pub mod config;
pub mod distance;
pub mod error;
pub mod kind;
pub mod matcher;
pub mod ratio;

pub use brute_force::BruteForceMatcher;
pub use config::MatchConfig;
pub use distance::DescriptorDistance;
pub use error::{MatchError, MatchResult};
pub use kind::{MatcherKind, SelectorKind};
pub use matcher::DescriptorMatcher;
pub use ratio::{filter_knn, filter_pairs, passes_ratio_test, RatioTest, DEFAULT_RATIO};

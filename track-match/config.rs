use crate::error::MatchResult;
use crate::kind::{MatcherKind, SelectorKind};
use crate::ratio::{RatioTest, DEFAULT_RATIO};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Matcher backend, selector and ratio threshold
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchConfig {
    pub matcher: MatcherKind,
    pub selector: SelectorKind,
    pub ratio: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherKind::BruteForce,
            selector: SelectorKind::KNearest,
            ratio: DEFAULT_RATIO,
        }
    }
}

impl MatchConfig {
    pub fn nearest_neighbor() -> Self {
        Self { selector: SelectorKind::NearestNeighbor, ..Self::default() }
    }

    pub fn with_ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn validate(&self) -> MatchResult<()> {
        RatioTest::new(self.ratio)?;
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!("MatchConfig: {} / {} ratio={}", self.matcher, self.selector, self.ratio)
    }
}

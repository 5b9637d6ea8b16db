use std::str::FromStr;

use crate::error::MatchError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MatcherKind {
    #[default]
    BruteForce,
    Flann,
}

impl MatcherKind {
    pub fn name(&self) -> &'static str {
        match self {
            MatcherKind::BruteForce => "MAT_BF",
            MatcherKind::Flann => "MAT_FLANN",
        }
    }
}

impl std::fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatcherKind {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MAT_BF" | "BF" => Ok(MatcherKind::BruteForce),
            "MAT_FLANN" | "FLANN" => Ok(MatcherKind::Flann),
            other => Err(MatchError::InvalidConfig(format!("unknown matcher type '{}'", other))),
        }
    }
}

/// How candidates are selected per query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SelectorKind {
    /// Best match only
    NearestNeighbor,
    /// Two nearest, then the ratio test
    #[default]
    KNearest,
}

impl SelectorKind {
    pub fn name(&self) -> &'static str {
        match self {
            SelectorKind::NearestNeighbor => "SEL_NN",
            SelectorKind::KNearest => "SEL_KNN",
        }
    }
}

impl std::fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SelectorKind {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SEL_NN" | "NN" => Ok(SelectorKind::NearestNeighbor),
            "SEL_KNN" | "KNN" => Ok(SelectorKind::KNearest),
            other => Err(MatchError::InvalidConfig(format!("unknown selector type '{}'", other))),
        }
    }
}

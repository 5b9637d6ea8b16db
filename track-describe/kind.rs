use std::str::FromStr;

use track_core::{AkazeParams, BriskParams, OrbParams, SiftParams};

use crate::error::DescribeError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BriefParams {
    /// Descriptor length in bytes
    pub bytes: usize,
    pub use_orientation: bool,
}

impl Default for BriefParams {
    fn default() -> Self {
        Self { bytes: 32, use_orientation: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FreakParams {
    pub orientation_normalized: bool,
    pub scale_normalized: bool,
    pub pattern_scale: f32,
    pub n_octaves: usize,
}

impl Default for FreakParams {
    fn default() -> Self {
        Self {
            orientation_normalized: true,
            scale_normalized: true,
            pattern_scale: 22.0,
            n_octaves: 4,
        }
    }
}

/// Descriptor families, each carrying its fixed tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DescriptorKind {
    Brisk(BriskParams),
    Brief(BriefParams),
    Orb(OrbParams),
    Freak(FreakParams),
    Akaze(AkazeParams),
    Sift(SiftParams),
}

impl DescriptorKind {
    pub fn name(&self) -> &'static str {
        match self {
            DescriptorKind::Brisk(_) => "BRISK",
            DescriptorKind::Brief(_) => "BRIEF",
            DescriptorKind::Orb(_) => "ORB",
            DescriptorKind::Freak(_) => "FREAK",
            DescriptorKind::Akaze(_) => "AKAZE",
            DescriptorKind::Sift(_) => "SIFT",
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, DescriptorKind::Brief(_) | DescriptorKind::Orb(_))
    }

    /// Whether descriptors are compared with Hamming distance
    pub fn is_binary(&self) -> bool {
        !matches!(self, DescriptorKind::Sift(_))
    }
}

impl Default for DescriptorKind {
    fn default() -> Self {
        DescriptorKind::Brief(BriefParams::default())
    }
}

impl std::fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DescriptorKind {
    type Err = DescribeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_uppercase().as_str() {
            "BRISK" => DescriptorKind::Brisk(BriskParams::default()),
            "BRIEF" => DescriptorKind::Brief(BriefParams::default()),
            "ORB" => DescriptorKind::Orb(OrbParams::default()),
            "FREAK" => DescriptorKind::Freak(FreakParams::default()),
            "AKAZE" => DescriptorKind::Akaze(AkazeParams::default()),
            "SIFT" => DescriptorKind::Sift(SiftParams::default()),
            other => {
                return Err(DescribeError::InvalidConfig(format!("unknown descriptor type '{}'", other)));
            }
        };
        Ok(kind)
    }
}

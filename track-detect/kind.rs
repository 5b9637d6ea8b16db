use std::str::FromStr;

use track_core::{AkazeParams, BriskParams, OrbParams, SiftParams};

use crate::dedup::DedupConfig;
use crate::error::DetectError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShiTomasiParams {
    /// Averaging block for the derivative covariation matrix
    pub block_size: usize,
    /// Permissible overlap between two features, shrinks the minimum distance
    pub max_overlap: f32,
    /// Fraction of the strongest response a corner must exceed
    pub quality_level: f32,
    pub k: f32,
}

impl Default for ShiTomasiParams {
    fn default() -> Self {
        Self {
            block_size: 4,
            max_overlap: 0.0,
            quality_level: 0.01,
            k: 0.04,
        }
    }
}

impl ShiTomasiParams {
    pub fn min_distance(&self) -> f32 {
        (1.0 - self.max_overlap) * self.block_size as f32
    }

    /// Upper bound on the number of corners for a `width` x `height` image
    pub fn max_corners(&self, width: usize, height: usize) -> usize {
        ((width * height) as f32 / self.min_distance().max(1.0)) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HarrisParams {
    /// Each pixel considers a `block_size` x `block_size` neighbourhood
    pub block_size: usize,
    /// Sobel aperture
    pub aperture_size: usize,
    /// Minimum value in the 0..255 normalised response
    pub min_response: f32,
    pub k: f32,
    /// Permissible overlap during suppression
    pub max_overlap: f32,
}

impl Default for HarrisParams {
    fn default() -> Self {
        Self {
            block_size: 2,
            aperture_size: 3,
            min_response: 100.0,
            k: 0.04,
            max_overlap: 0.0,
        }
    }
}

impl HarrisParams {
    pub fn dedup_config(&self) -> DedupConfig {
        DedupConfig {
            min_response: self.min_response,
            keypoint_size: 2.0 * self.aperture_size as f32,
            max_overlap: self.max_overlap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FastParams {
    /// Intensity difference between the centre and the circle pixels
    pub threshold: u8,
    pub nonmax_suppression: bool,
    /// Contiguous arc length on the 16-pixel circle (9 = TYPE_9_16)
    pub arc_length: usize,
}

impl Default for FastParams {
    fn default() -> Self {
        Self {
            threshold: 30,
            nonmax_suppression: true,
            arc_length: 9,
        }
    }
}

/// Keypoint detector families, each carrying its fixed tuning
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DetectorKind {
    ShiTomasi(ShiTomasiParams),
    Harris(HarrisParams),
    Fast(FastParams),
    Brisk(BriskParams),
    Orb(OrbParams),
    Akaze(AkazeParams),
    Sift(SiftParams),
}

impl DetectorKind {
    pub fn name(&self) -> &'static str {
        match self {
            DetectorKind::ShiTomasi(_) => "SHITOMASI",
            DetectorKind::Harris(_) => "HARRIS",
            DetectorKind::Fast(_) => "FAST",
            DetectorKind::Brisk(_) => "BRISK",
            DetectorKind::Orb(_) => "ORB",
            DetectorKind::Akaze(_) => "AKAZE",
            DetectorKind::Sift(_) => "SIFT",
        }
    }

    /// Whether the built-in backend can run this detector
    pub fn is_builtin(&self) -> bool {
        matches!(
            self,
            DetectorKind::ShiTomasi(_) | DetectorKind::Harris(_) | DetectorKind::Fast(_)
        )
    }
}

impl Default for DetectorKind {
    fn default() -> Self {
        DetectorKind::ShiTomasi(ShiTomasiParams::default())
    }
}

impl std::fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DetectorKind {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_uppercase().as_str() {
            "SHITOMASI" | "SHI_TOMASI" | "SHI-TOMASI" => DetectorKind::ShiTomasi(ShiTomasiParams::default()),
            "HARRIS" => DetectorKind::Harris(HarrisParams::default()),
            "FAST" => DetectorKind::Fast(FastParams::default()),
            "BRISK" => DetectorKind::Brisk(BriskParams::default()),
            "ORB" => DetectorKind::Orb(OrbParams::default()),
            "AKAZE" => DetectorKind::Akaze(AkazeParams::default()),
            "SIFT" => DetectorKind::Sift(SiftParams::default()),
            other => {
                return Err(DetectError::InvalidConfig(format!("unknown detector type '{}'", other)))
            }
        };
        Ok(kind)
    }
}

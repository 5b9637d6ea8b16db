//! Fixed tuning parameters for algorithm families that appear both as
//! detectors and as descriptor extractors.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BriskParams {
    /// FAST/AGAST detection threshold score
    pub threshold: u8,
    /// Detection octaves (0 = single scale)
    pub octaves: usize,
    /// Scale applied to the sampling pattern
    pub pattern_scale: f32,
}

impl Default for BriskParams {
    fn default() -> Self {
        Self { threshold: 30, octaves: 3, pattern_scale: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OrbScore {
    Harris,
    Fast,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrbParams {
    pub n_features: usize,
    pub scale_factor: f32,
    pub n_levels: usize,
    pub edge_threshold: usize,
    pub first_level: usize,
    pub wta_k: usize,
    pub score: OrbScore,
    pub patch_size: usize,
    pub fast_threshold: u8,
}

impl Default for OrbParams {
    fn default() -> Self {
        Self {
            n_features: 500,
            scale_factor: 1.2,
            n_levels: 8,
            edge_threshold: 31,
            first_level: 0,
            wta_k: 2,
            score: OrbScore::Harris,
            patch_size: 31,
            fast_threshold: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AkazeDescriptorType {
    Kaze,
    KazeUpright,
    Mldb,
    MldbUpright,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Diffusivity {
    PmG1,
    PmG2,
    Weickert,
    Charbonnier,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AkazeParams {
    pub descriptor_type: AkazeDescriptorType,
    /// 0 = full size
    pub descriptor_size: usize,
    pub descriptor_channels: usize,
    pub threshold: f32,
    pub n_octaves: usize,
    pub n_octave_layers: usize,
    pub diffusivity: Diffusivity,
}

impl Default for AkazeParams {
    fn default() -> Self {
        Self {
            descriptor_type: AkazeDescriptorType::Mldb,
            descriptor_size: 0,
            descriptor_channels: 3,
            threshold: 0.001,
            n_octaves: 4,
            n_octave_layers: 4,
            diffusivity: Diffusivity::PmG2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SiftParams {
    /// 0 = keep all
    pub n_features: usize,
    pub n_octave_layers: usize,
    pub contrast_threshold: f64,
    pub edge_threshold: f64,
    pub sigma: f64,
}

impl Default for SiftParams {
    fn default() -> Self {
        Self {
            n_features: 0,
            n_octave_layers: 3,
            contrast_threshold: 0.04,
            edge_threshold: 10.0,
            sigma: 1.6,
        }
    }
}

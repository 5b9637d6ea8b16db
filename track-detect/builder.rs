use crate::config::DetectorConfig;
use crate::configured_detector::ConfiguredDetector;
use crate::detector::FeatureDetector;
use crate::error::DetectResult;
use crate::kind::{DetectorKind, FastParams, HarrisParams, ShiTomasiParams};

/// Builder for creating a `ConfiguredDetector`
#[derive(Debug, Clone)]
pub struct DetectorBuilder {
    kind: DetectorKind,
    width: usize,
    height: usize,
    threads: usize,
}

impl DetectorBuilder {
    /// Create a new builder with default settings
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            kind: DetectorKind::default(),
            width,
            height,
            threads: 1,
        }
    }

    /// Select the detector family
    pub fn kind(mut self, kind: DetectorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.threads = n_threads;
        self
    }

    /// Harris response threshold (switches to Harris if needed)
    pub fn min_response(mut self, min_response: f32) -> Self {
        let mut p = self.harris_params();
        p.min_response = min_response;
        self.kind = DetectorKind::Harris(p);
        self
    }

    /// Permissible overlap for Harris or Shi-Tomasi suppression
    pub fn max_overlap(mut self, max_overlap: f32) -> Self {
        self.kind = match self.kind {
            DetectorKind::ShiTomasi(mut p) => {
                p.max_overlap = max_overlap;
                DetectorKind::ShiTomasi(p)
            }
            _ => {
                let mut p = self.harris_params();
                p.max_overlap = max_overlap;
                DetectorKind::Harris(p)
            }
        };
        self
    }

    /// FAST intensity threshold (switches to FAST if needed)
    pub fn fast_threshold(mut self, threshold: u8) -> Self {
        let mut p = match self.kind {
            DetectorKind::Fast(p) => p,
            _ => FastParams::default(),
        };
        p.threshold = threshold;
        self.kind = DetectorKind::Fast(p);
        self
    }

    /// Apply the Harris preset
    pub fn preset_harris(mut self) -> Self {
        self.kind = DetectorKind::Harris(HarrisParams::default());
        self
    }

    /// Apply the Shi-Tomasi preset
    pub fn preset_shi_tomasi(mut self) -> Self {
        self.kind = DetectorKind::ShiTomasi(ShiTomasiParams::default());
        self
    }

    /// Apply the FAST preset
    pub fn preset_fast(mut self) -> Self {
        self.kind = DetectorKind::Fast(FastParams::default());
        self
    }

    fn harris_params(&self) -> HarrisParams {
        match self.kind {
            DetectorKind::Harris(p) => p,
            _ => HarrisParams::default(),
        }
    }

    /// Build the `ConfiguredDetector`
    pub fn build(self) -> DetectResult<ConfiguredDetector> {
        self.clone().to_config().validate()?;
        let detector = FeatureDetector::new(self.kind, self.width, self.height)?;
        Ok(ConfiguredDetector {
            detector,
            config: self,
        })
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.clone().to_config().summary()
    }

    /// Create a builder from an existing `DetectorConfig`
    pub fn from_config(config: DetectorConfig) -> Self {
        Self {
            kind: config.kind,
            width: config.width,
            height: config.height,
            threads: config.threads,
        }
    }

    /// Convert the builder into a `DetectorConfig`
    pub fn to_config(self) -> DetectorConfig {
        DetectorConfig {
            kind: self.kind,
            width: self.width,
            height: self.height,
            threads: self.threads,
            name: None,
            description: None,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn thread_count(&self) -> usize {
        self.threads
    }
}

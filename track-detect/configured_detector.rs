use track_core::{Keypoint, ResponseField};

use crate::builder::DetectorBuilder;
use crate::detector::{FeatureDetector, KeypointDetector};
use crate::error::DetectResult;

/// A detector that has been configured with a specific builder.
///
/// This struct holds a `FeatureDetector` and a `DetectorBuilder`,
/// providing a convenient way to run the detector and access its configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredDetector {
    pub(crate) detector: FeatureDetector,
    pub(crate) config: DetectorBuilder,
}

impl ConfiguredDetector {
    /// Detect keypoints in the given image.
    ///
    /// # Arguments
    /// * `img` - A row-major 8-bit grayscale image.
    ///
    /// # Returns
    /// A `DetectResult` containing a vector of `Keypoint`s.
    pub fn detect_keypoints(&self, img: &[u8]) -> DetectResult<Vec<Keypoint>> {
        self.detector.detect_keypoints(img)
    }

    /// Dense response field for detectors that have one
    pub fn response_field(&self, img: &[u8]) -> DetectResult<ResponseField> {
        self.detector.response_field(img)
    }

    /// Get a reference to the underlying `FeatureDetector`.
    pub fn detector(&self) -> &FeatureDetector {
        &self.detector
    }

    /// Get a summary of the detector's configuration.
    pub fn config_summary(&self) -> String {
        self.config.summary()
    }

    /// Get the image dimensions (width, height) the detector is configured for.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.config.width(), self.config.height())
    }

    pub fn threads(&self) -> usize {
        self.config.thread_count()
    }
}

impl KeypointDetector for ConfiguredDetector {
    fn detect(&self, img: &[u8]) -> DetectResult<Vec<Keypoint>> {
        self.detect_keypoints(img)
    }
}

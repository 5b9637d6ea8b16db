use std::time::Instant;

use log::debug;
use track_core::{Keypoint, ResponseField};

use crate::dedup::deduplicate;
use crate::error::{validate_image, DetectError, DetectResult};
use crate::fast::FastCornerDetector;
use crate::kind::{DetectorKind, FastParams, HarrisParams, ShiTomasiParams};
use crate::response::{HarrisResponse, MinEigenResponse, ResponseProvider};
use crate::suppression::{local_maxima, min_distance_suppression};

/// Seam for detector backends
pub trait KeypointDetector {
    fn detect(&self, img: &[u8]) -> DetectResult<Vec<Keypoint>>;
}

/// Built-in detector for a fixed image size
#[derive(Debug, Clone)]
pub struct FeatureDetector {
    kind: DetectorKind,
    w: usize,
    h: usize,
}

impl FeatureDetector {
    /// Creates a new detector with validation
    pub fn new(kind: DetectorKind, width: usize, height: usize) -> DetectResult<Self> {
        if width == 0 || height == 0 {
            return Err(DetectError::InvalidImageSize { width, height });
        }
        if !kind.is_builtin() {
            return Err(DetectError::UnsupportedDetector(kind.name()));
        }
        match &kind {
            DetectorKind::Harris(p) => {
                if p.aperture_size != 3 {
                    return Err(DetectError::InvalidAperture(p.aperture_size));
                }
                p.dedup_config().validate()?;
            }
            DetectorKind::ShiTomasi(p) => {
                if p.block_size == 0 {
                    return Err(DetectError::InvalidBlockSize(p.block_size));
                }
                if !(0.0..1.0).contains(&p.max_overlap) {
                    return Err(DetectError::InvalidConfig(format!(
                        "max_overlap must lie in [0, 1), got {}",
                        p.max_overlap
                    )));
                }
            }
            DetectorKind::Fast(p) => {
                FastCornerDetector::new(*p)?;
            }
            _ => {}
        }
        Ok(Self { kind, w: width, h: height })
    }

    pub fn detect_keypoints(&self, img: &[u8]) -> DetectResult<Vec<Keypoint>> {
        validate_image(img, self.w, self.h)?;

        let t0 = Instant::now();
        let keypoints = match &self.kind {
            DetectorKind::ShiTomasi(p) => self.detect_shi_tomasi(img, p)?,
            DetectorKind::Harris(p) => self.detect_harris(img, p)?,
            DetectorKind::Fast(p) => self.detect_fast(img, p)?,
            other => return Err(DetectError::UnsupportedDetector(other.name())),
        };
        debug!(
            "{} detection with n={} keypoints in {:.2?}",
            self.kind.name(),
            keypoints.len(),
            t0.elapsed()
        );

        Ok(keypoints)
    }

    /// Dense response the detector selects keypoints from.
    ///
    /// Harris fields are min-max normalised to `[0, 255]`; FAST has no dense
    /// field and reports `UnsupportedDetector`.
    pub fn response_field(&self, img: &[u8]) -> DetectResult<ResponseField> {
        validate_image(img, self.w, self.h)?;
        match &self.kind {
            DetectorKind::Harris(p) => {
                let provider = HarrisResponse {
                    block_size: p.block_size,
                    aperture_size: p.aperture_size,
                    k: p.k,
                };
                Ok(provider.compute(img, self.w, self.h)?.normalized(0.0, 255.0))
            }
            DetectorKind::ShiTomasi(p) => {
                MinEigenResponse { block_size: p.block_size, aperture_size: 3 }.compute(img, self.w, self.h)
            }
            other => Err(DetectError::UnsupportedDetector(other.name())),
        }
    }

    fn detect_harris(&self, img: &[u8], p: &HarrisParams) -> DetectResult<Vec<Keypoint>> {
        let field = self.response_field(img)?;
        deduplicate(&field, &p.dedup_config())
    }

    fn detect_shi_tomasi(&self, img: &[u8], p: &ShiTomasiParams) -> DetectResult<Vec<Keypoint>> {
        let field = self.response_field(img)?;
        let max = match field.max_value() {
            Some(max) if max > 0.0 => max,
            _ => return Ok(Vec::new()),
        };
        let size = p.block_size as f32;
        let candidates: Vec<Keypoint> = local_maxima(&field, max * p.quality_level)
            .into_iter()
            .map(|(row, col, v)| Keypoint::new(col as f32, row as f32, size, v))
            .collect();

        Ok(min_distance_suppression(
            &candidates,
            p.min_distance(),
            p.max_corners(self.w, self.h),
        ))
    }

    fn detect_fast(&self, img: &[u8], p: &FastParams) -> DetectResult<Vec<Keypoint>> {
        FastCornerDetector::new(*p)?.detect(img, self.w, self.h)
    }

    pub fn kind(&self) -> &DetectorKind {
        &self.kind
    }

    /// Get image dimensions
    pub fn dimensions(&self) -> (usize, usize) {
        (self.w, self.h)
    }
}

impl KeypointDetector for FeatureDetector {
    fn detect(&self, img: &[u8]) -> DetectResult<Vec<Keypoint>> {
        self.detect_keypoints(img)
    }
}

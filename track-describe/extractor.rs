use std::time::Instant;

use log::{debug, trace};
use rayon::prelude::*;
use track_core::{BinaryDescriptor, Keypoint};

use crate::brief::{BriefGenerator, BriefPattern, PATTERN_RADIUS};
use crate::error::{DescribeError, DescribeResult};
use crate::kind::DescriptorKind;
use crate::orientation::intensity_centroid_angle;

/// Seam for descriptor backends.
///
/// Keypoints whose sampling patch leaves the image are dropped, so the
/// returned keypoints and descriptors always have the same length and order.
pub trait DescriptorExtractor {
    fn extract(&self, img: &[u8], keypoints: &[Keypoint]) -> DescribeResult<(Vec<Keypoint>, Vec<BinaryDescriptor>)>;
}

/// Built-in BRIEF and ORB extraction for a fixed image size
#[derive(Debug, Clone)]
pub struct FeatureDescriptor {
    kind: DescriptorKind,
    w: usize,
    h: usize,
    pattern: BriefPattern,
}

impl FeatureDescriptor {
    pub fn new(kind: DescriptorKind, width: usize, height: usize) -> DescribeResult<Self> {
        if width == 0 || height == 0 {
            return Err(DescribeError::InvalidImageSize { width, height });
        }
        match &kind {
            DescriptorKind::Brief(p) if p.bytes != 32 => {
                return Err(DescribeError::InvalidConfig(format!(
                    "BRIEF supports 32-byte descriptors only, got {}",
                    p.bytes
                )));
            }
            DescriptorKind::Orb(p) if p.wta_k != 2 || p.patch_size < 3 => {
                return Err(DescribeError::InvalidConfig(format!(
                    "ORB needs wta_k = 2 and patch_size >= 3, got {} and {}",
                    p.wta_k, p.patch_size
                )));
            }
            DescriptorKind::Brief(_) | DescriptorKind::Orb(_) => {}
            other => return Err(DescribeError::UnsupportedDescriptor(other.name())),
        }
        Ok(Self { kind, w: width, h: height, pattern: BriefPattern::new() })
    }

    pub fn kind(&self) -> &DescriptorKind {
        &self.kind
    }

    fn steered(&self) -> bool {
        match &self.kind {
            DescriptorKind::Brief(p) => p.use_orientation,
            _ => true,
        }
    }

    /// Margin a keypoint needs from every image edge
    pub fn border(&self) -> f32 {
        let pattern = if self.steered() { self.pattern.steered_radius().ceil() } else { PATTERN_RADIUS as f32 };
        let margin = match &self.kind {
            DescriptorKind::Orb(p) => pattern.max((p.patch_size / 2) as f32),
            _ => pattern,
        };
        margin + 1.0
    }

    fn inside(&self, kp: &Keypoint, border: f32) -> bool {
        kp.x >= border
            && kp.y >= border
            && kp.x + border < (self.w - 1) as f32
            && kp.y + border < (self.h - 1) as f32
    }

    pub fn describe(&self, img: &[u8], keypoints: &[Keypoint]) -> DescribeResult<(Vec<Keypoint>, Vec<BinaryDescriptor>)> {
        let expected_len = self.w * self.h;
        if img.len() != expected_len {
            return Err(DescribeError::InvalidImageData { expected_len, actual_len: img.len() });
        }

        let t0 = Instant::now();
        let border = self.border();
        let mut kept: Vec<Keypoint> = keypoints.iter().copied().filter(|kp| self.inside(kp, border)).collect();
        trace!("{} of {} keypoints clear the {} px border", kept.len(), keypoints.len(), border);

        if let DescriptorKind::Orb(p) = &self.kind {
            let half = p.patch_size / 2;
            kept = kept
                .into_par_iter()
                .filter_map(|kp| {
                    intensity_centroid_angle(img, self.w, self.h, kp.x, kp.y, half).map(|a| kp.with_angle(a))
                })
                .collect();
        }

        let descriptors = BriefGenerator::new(&self.pattern, self.w, self.h).generate_descriptors(img, &kept, self.steered());
        debug!(
            "{} descriptor extraction for n={} keypoints ({} dropped) in {:.2?}",
            self.kind.name(),
            kept.len(),
            keypoints.len() - kept.len(),
            t0.elapsed()
        );

        Ok((kept, descriptors))
    }
}

impl DescriptorExtractor for FeatureDescriptor {
    fn extract(&self, img: &[u8], keypoints: &[Keypoint]) -> DescribeResult<(Vec<Keypoint>, Vec<BinaryDescriptor>)> {
        self.describe(img, keypoints)
    }
}

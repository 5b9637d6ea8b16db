use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, trace};
use track_core::{BinaryDescriptor, Keypoint, Match};
use track_describe::{DescriptorExtractor, FeatureDescriptor};
use track_detect::{FeatureDetector, KeypointDetector};
use track_match::DescriptorMatcher;

use crate::pipeline::PipelineConfig;
use crate::TrackResult;

/// Frames kept for matching: the previous one and the current one
pub const FRAME_BUFFER_SIZE: usize = 2;

/// Keypoints of one image with their descriptors, index-aligned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub keypoints: Vec<Keypoint>,
    pub descriptors: Vec<BinaryDescriptor>,
}

/// Keep the `n` strongest keypoints; equal responses keep their order
pub fn retain_best(keypoints: &mut Vec<Keypoint>, n: usize) {
    if keypoints.len() > n {
        keypoints.sort_by(|a, b| b.response.total_cmp(&a.response));
        keypoints.truncate(n);
    }
}

/// Detect, describe and match consecutive frames of a fixed size
pub struct FeatureTracker {
    config: PipelineConfig,
    detector: Box<dyn KeypointDetector + Send + Sync>,
    extractor: Box<dyn DescriptorExtractor + Send + Sync>,
    matcher: DescriptorMatcher,
    frames: VecDeque<Frame>,
}

impl FeatureTracker {
    /// Create a tracker with the built-in backends named by `config`
    pub fn new(config: PipelineConfig, width: usize, height: usize) -> TrackResult<Self> {
        config.validate()?;
        let detector = FeatureDetector::new(config.detector, width, height)?;
        let extractor = FeatureDescriptor::new(config.descriptor, width, height)?;
        Self::with_backends(config, Box::new(detector), Box::new(extractor))
    }

    /// Create a tracker around caller-supplied detector and extractor
    pub fn with_backends(
        config: PipelineConfig,
        detector: Box<dyn KeypointDetector + Send + Sync>,
        extractor: Box<dyn DescriptorExtractor + Send + Sync>,
    ) -> TrackResult<Self> {
        let matcher = DescriptorMatcher::new(config.matching)?;
        Ok(Self {
            config,
            detector,
            extractor,
            matcher,
            frames: VecDeque::with_capacity(FRAME_BUFFER_SIZE),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Keypoints after the focus region and the count limit are applied
    pub fn detect(&self, img: &[u8]) -> TrackResult<Vec<Keypoint>> {
        let mut keypoints = self.detector.detect(img)?;
        let detected = keypoints.len();

        if let Some(focus) = &self.config.focus {
            keypoints.retain(|kp| focus.contains(kp));
        }
        if let Some(n) = self.config.max_keypoints {
            retain_best(&mut keypoints, n);
        }
        trace!("{} of {} detected keypoints kept", keypoints.len(), detected);
        Ok(keypoints)
    }

    /// Detect and describe a single image
    pub fn process(&self, img: &[u8]) -> TrackResult<Frame> {
        let keypoints = self.detect(img)?;
        let (keypoints, descriptors) = self.extractor.extract(img, &keypoints)?;
        Ok(Frame { keypoints, descriptors })
    }

    /// Add the next image; returns the matches from the previous frame
    /// (query) to this one (train) once two frames are buffered.
    pub fn push_frame(&mut self, img: &[u8]) -> TrackResult<Option<Vec<Match>>> {
        let t0 = Instant::now();
        let frame = self.process(img)?;
        if self.frames.len() == FRAME_BUFFER_SIZE {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);

        let matches = match (self.previous(), self.current()) {
            (Some(prev), Some(curr)) => Some(self.matcher.match_descriptors(&prev.descriptors, &curr.descriptors)?),
            _ => None,
        };
        debug!(
            "frame processed with n={} keypoints, {} matches in {:.2?}",
            self.current().map_or(0, |f| f.keypoints.len()),
            matches.as_ref().map_or(0, Vec::len),
            t0.elapsed()
        );
        Ok(matches)
    }

    /// Match two images from scratch, replacing any buffered frames
    pub fn track_pair(&mut self, previous: &[u8], current: &[u8]) -> TrackResult<Vec<Match>> {
        self.frames.clear();
        self.push_frame(previous)?;
        Ok(self.push_frame(current)?.unwrap_or_default())
    }

    pub fn current(&self) -> Option<&Frame> {
        self.frames.back()
    }

    pub fn previous(&self) -> Option<&Frame> {
        if self.frames.len() < 2 {
            return None;
        }
        self.frames.get(self.frames.len() - 2)
    }

    pub fn buffered_frames(&self) -> usize {
        self.frames.len()
    }
}

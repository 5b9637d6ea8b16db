use track_core::Keypoint;
use track_describe::{DescriptorKind, FeatureDescriptor};
use track_detect::{DetectorKind, FeatureDetector};
use track_match::MatchConfig;

use crate::{TrackError, TrackResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned region of interest; keypoints outside it are discarded
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FocusRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FocusRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Half-open on the right and bottom edges
    pub fn contains(&self, kp: &Keypoint) -> bool {
        kp.x >= self.x && kp.x < self.x + self.width && kp.y >= self.y && kp.y < self.y + self.height
    }
}

/// Detector, descriptor and matcher selection for a tracking run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PipelineConfig {
    pub detector: DetectorKind,
    pub descriptor: DescriptorKind,
    pub matching: MatchConfig,
    pub threads: usize,
    /// Keep only the strongest keypoints per frame
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub max_keypoints: Option<usize>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub focus: Option<FocusRect>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detector: DetectorKind::default(),
            descriptor: DescriptorKind::default(),
            matching: MatchConfig::default(),
            threads: track_core::default_threads(),
            max_keypoints: None,
            focus: None,
        }
    }
}

impl PipelineConfig {
    /// Select algorithm families by their names, e.g. `HARRIS`, `ORB`, `SEL_NN`
    pub fn from_names(detector: &str, descriptor: &str, selector: &str) -> TrackResult<Self> {
        Ok(Self {
            detector: detector.parse()?,
            descriptor: descriptor.parse()?,
            matching: MatchConfig { selector: selector.parse()?, ..MatchConfig::default() },
            ..Self::default()
        })
    }

    pub fn with_max_keypoints(mut self, n: usize) -> Self {
        self.max_keypoints = Some(n);
        self
    }

    pub fn with_focus(mut self, focus: FocusRect) -> Self {
        self.focus = Some(focus);
        self
    }

    /// Checks every stage without needing an image
    pub fn validate(&self) -> TrackResult<()> {
        if self.threads == 0 {
            return Err(TrackError::Config("threads must be >= 1".to_string()));
        }
        if self.max_keypoints == Some(0) {
            return Err(TrackError::Config("max_keypoints must be >= 1".to_string()));
        }
        if let Some(f) = &self.focus {
            if !(f.width > 0.0 && f.height > 0.0) {
                return Err(TrackError::Config(format!("empty focus region {}x{}", f.width, f.height)));
            }
        }
        FeatureDetector::new(self.detector, 1, 1)?;
        FeatureDescriptor::new(self.descriptor, 1, 1)?;
        track_match::DescriptorMatcher::new(self.matching)?;
        Ok(())
    }

    pub fn summary(&self) -> String {
        format!(
            "{} + {} + {}, threads={}, max_keypoints={:?}",
            self.detector,
            self.descriptor,
            self.matching.summary(),
            self.threads,
            self.max_keypoints
        )
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> TrackResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TrackError::Config(e.to_string()))
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> TrackResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| TrackError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> TrackResult<String> {
        toml::to_string_pretty(self).map_err(|e| TrackError::Config(e.to_string()))
    }

    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> TrackResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| TrackError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` or `.toml` file, chosen by extension
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> TrackResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Err(TrackError::Config(format!("unknown config format: {}", path.display()))),
        }
    }

    #[cfg(feature = "serde")]
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> TrackResult<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => self.to_json()?,
            Some("toml") => self.to_toml()?,
            _ => return Err(TrackError::Config(format!("unknown config format: {}", path.display()))),
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use track_match::{MatchError, SelectorKind};

    #[test]
    fn test_from_names() {
        let cfg = PipelineConfig::from_names("HARRIS", "ORB", "SEL_NN").unwrap();
        assert_eq!(cfg.detector.name(), "HARRIS");
        assert_eq!(cfg.descriptor.name(), "ORB");
        assert_eq!(cfg.matching.selector, SelectorKind::NearestNeighbor);
        assert!(cfg.validate().is_ok());

        assert!(matches!(PipelineConfig::from_names("HARRIS", "ORB", "SEL_X"), Err(TrackError::Match(_))));
        assert!(matches!(PipelineConfig::from_names("SURF", "ORB", "SEL_NN"), Err(TrackError::Detect(_))));
    }

    #[test]
    fn test_validate_catches_unsupported_stages() {
        let cfg = PipelineConfig::from_names("SIFT", "BRIEF", "SEL_KNN").unwrap();
        assert!(matches!(cfg.validate(), Err(TrackError::Detect(_))));

        let cfg = PipelineConfig::from_names("FAST", "FREAK", "SEL_KNN").unwrap();
        assert!(matches!(cfg.validate(), Err(TrackError::Describe(_))));

        let mut cfg = PipelineConfig::default();
        cfg.matching.matcher = track_match::MatcherKind::Flann;
        assert!(matches!(cfg.validate(), Err(TrackError::Match(MatchError::UnsupportedMatcher(_)))));

        let cfg = PipelineConfig::default().with_max_keypoints(0);
        assert!(matches!(cfg.validate(), Err(TrackError::Config(_))));
    }

    #[test]
    fn test_focus_rect() {
        let rect = FocusRect::new(10.0, 10.0, 5.0, 5.0);
        assert!(rect.contains(&Keypoint::new(10.0, 14.5, 1.0, 1.0)));
        assert!(!rect.contains(&Keypoint::new(15.0, 12.0, 1.0, 1.0)));
        assert!(!rect.contains(&Keypoint::new(9.9, 12.0, 1.0, 1.0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_and_toml_round_trip() {
        let cfg = PipelineConfig::from_names("FAST", "ORB", "SEL_KNN")
            .unwrap()
            .with_max_keypoints(50)
            .with_focus(FocusRect::new(535.0, 180.0, 180.0, 150.0));
        assert_eq!(PipelineConfig::from_json(&cfg.to_json().unwrap()).unwrap(), cfg);
        assert_eq!(PipelineConfig::from_toml(&cfg.to_toml().unwrap()).unwrap(), cfg);

        let mut bad = cfg.clone();
        bad.threads = 0;
        assert!(matches!(PipelineConfig::from_json(&bad.to_json().unwrap()), Err(TrackError::Config(_))));
    }
}

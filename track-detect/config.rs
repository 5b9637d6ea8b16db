use crate::builder::DetectorBuilder;
use crate::error::{DetectError, DetectResult};
use crate::kind::{DetectorKind, FastParams, HarrisParams, ShiTomasiParams};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete detector configuration with all settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Detector family and its tuning
    pub kind: DetectorKind,
    /// Image dimensions
    pub width: usize,
    pub height: usize,
    /// Requested worker count. Detection runs on the current rayon pool;
    /// only the `track` binary sizes the global pool from this value via
    /// `track_core::init_thread_pool`.
    pub threads: usize,
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub description: Option<String>,
}

impl DetectorConfig {
    /// Create new configuration with default settings
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            kind: DetectorKind::default(),
            width,
            height,
            threads: 1,
            name: None,
            description: None,
        }
    }

    /// Classic Harris corners with greedy overlap suppression
    pub fn harris_preset(width: usize, height: usize) -> Self {
        Self {
            kind: DetectorKind::Harris(HarrisParams::default()),
            width,
            height,
            threads: track_core::default_threads(),
            name: Some("Harris".to_string()),
            description: Some("Harris response, normalised, greedy overlap NMS".to_string()),
        }
    }

    /// Shi-Tomasi good features to track
    pub fn shi_tomasi_preset(width: usize, height: usize) -> Self {
        Self {
            kind: DetectorKind::ShiTomasi(ShiTomasiParams::default()),
            width,
            height,
            threads: track_core::default_threads(),
            name: Some("Shi-Tomasi".to_string()),
            description: Some("Minimum eigenvalue corners with minimum distance".to_string()),
        }
    }

    /// FAST-9 with non-maximum suppression
    pub fn fast_preset(width: usize, height: usize) -> Self {
        Self {
            kind: DetectorKind::Fast(FastParams::default()),
            width,
            height,
            threads: track_core::default_threads(),
            name: Some("FAST".to_string()),
            description: Some("Segment test, threshold 30, 3x3 NMS".to_string()),
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self
    }

    /// Convert to DetectorBuilder for further customization
    pub fn to_builder(self) -> DetectorBuilder {
        DetectorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        let tuning = match &self.kind {
            DetectorKind::Harris(p) => format!(
                "min_response={}, max_overlap={}, block={}",
                p.min_response, p.max_overlap, p.block_size
            ),
            DetectorKind::ShiTomasi(p) => format!(
                "quality={}, min_distance={}, block={}",
                p.quality_level,
                p.min_distance(),
                p.block_size
            ),
            DetectorKind::Fast(p) => format!("threshold={}, nms={}", p.threshold, p.nonmax_suppression),
            _ => "external".to_string(),
        };
        format!(
            "DetectorConfig: {}x{}, detector={} [{}], threads={}",
            self.width, self.height, self.kind, tuning, self.threads
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> DetectResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(DetectError::InvalidImageSize { width: self.width, height: self.height });
        }
        if self.threads == 0 {
            return Err(DetectError::InvalidConfig("threads must be >= 1".to_string()));
        }
        if let DetectorKind::Harris(p) = &self.kind {
            p.dedup_config().validate()?;
        }
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

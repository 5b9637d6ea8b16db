use track_core::InputError;
use track_describe::DescribeError;
use track_detect::DetectError;
use track_match::MatchError;

pub mod pipeline;
pub mod tracker;

pub use pipeline::{FocusRect, PipelineConfig};
pub use tracker::{FeatureTracker, Frame};

pub use track_core::{self, BinaryDescriptor, Keypoint, Match};
pub use track_describe::{self, DescriptorKind};
pub use track_detect::{self, DetectorKind};
pub use track_match::{self, MatchConfig, MatcherKind, SelectorKind};

#[derive(Debug)]
pub enum TrackError {
    Detect(DetectError),
    Describe(DescribeError),
    Match(MatchError),
    Input(InputError),
    ThreadPool(rayon::ThreadPoolBuildError),
    Image(image::ImageError),
    Io(std::io::Error),
    Config(String),
    Usage(String),
}

impl std::fmt::Display for TrackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackError::Detect(e) => write!(f, "Detection error: {}", e),
            TrackError::Describe(e) => write!(f, "Descriptor error: {}", e),
            TrackError::Match(e) => write!(f, "Matching error: {}", e),
            TrackError::Input(e) => write!(f, "Invalid input: {}", e),
            TrackError::ThreadPool(e) => write!(f, "Thread pool error: {}", e),
            TrackError::Image(e) => write!(f, "Image error: {}", e),
            TrackError::Io(e) => write!(f, "I/O error: {}", e),
            TrackError::Config(msg) => write!(f, "Configuration error: {}", msg),
            TrackError::Usage(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackError::Detect(e) => Some(e),
            TrackError::Describe(e) => Some(e),
            TrackError::Match(e) => Some(e),
            TrackError::Input(e) => Some(e),
            TrackError::ThreadPool(e) => Some(e),
            TrackError::Image(e) => Some(e),
            TrackError::Io(e) => Some(e),
            TrackError::Config(_) | TrackError::Usage(_) => None,
        }
    }
}

impl From<DetectError> for TrackError {
    fn from(err: DetectError) -> Self {
        TrackError::Detect(err)
    }
}

impl From<DescribeError> for TrackError {
    fn from(err: DescribeError) -> Self {
        TrackError::Describe(err)
    }
}

impl From<MatchError> for TrackError {
    fn from(err: MatchError) -> Self {
        TrackError::Match(err)
    }
}

impl From<InputError> for TrackError {
    fn from(err: InputError) -> Self {
        TrackError::Input(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for TrackError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        TrackError::ThreadPool(err)
    }
}

impl From<image::ImageError> for TrackError {
    fn from(err: image::ImageError) -> Self {
        TrackError::Image(err)
    }
}

impl From<std::io::Error> for TrackError {
    fn from(err: std::io::Error) -> Self {
        TrackError::Io(err)
    }
}

pub type TrackResult<T> = Result<T, TrackError>;

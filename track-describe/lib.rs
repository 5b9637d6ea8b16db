//! Binary descriptors (BRIEF, ORB) for tracked keypoints.

pub mod brief;
pub mod error;
pub mod extractor;
pub mod kind;
pub mod orientation;

pub use brief::{BriefGenerator, BriefPattern, BRIEF_PAIRS, PATTERN_RADIUS};
pub use error::{DescribeError, DescribeResult};
pub use extractor::{DescriptorExtractor, FeatureDescriptor};
pub use kind::{BriefParams, DescriptorKind, FreakParams};
pub use orientation::intensity_centroid_angle;

#[derive(Debug, Clone)]
pub enum DescribeError {
    InvalidImageSize { width: usize, height: usize },
    InvalidImageData { expected_len: usize, actual_len: usize },
    InvalidConfig(String),
    UnsupportedDescriptor(&'static str),
}

impl std::fmt::Display for DescribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DescribeError::InvalidImageSize { width, height } => {
                write!(f, "Invalid image dimensions: {}x{} (must be > 0)", width, height)
            }
            DescribeError::InvalidImageData { expected_len, actual_len } => {
                write!(f, "Image data length mismatch: expected {}, got {}", expected_len, actual_len)
            }
            DescribeError::InvalidConfig(msg) => write!(f, "Invalid descriptor configuration: {}", msg),
            DescribeError::UnsupportedDescriptor(name) => {
                write!(f, "Descriptor type {} has no built-in backend", name)
            }
        }
    }
}

impl std::error::Error for DescribeError {}

pub type DescribeResult<T> = Result<T, DescribeError>;

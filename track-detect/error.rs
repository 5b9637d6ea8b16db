use track_core::InputError;

#[derive(Debug, Clone)]
pub enum DetectError {
    InvalidImageSize { width: usize, height: usize },
    InvalidImageData { expected_len: usize, actual_len: usize },
    InvalidAperture(usize),
    InvalidBlockSize(usize),
    InvalidConfig(String),
    UnsupportedDetector(&'static str),
    Input(InputError),
}

impl std::fmt::Display for DetectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectError::InvalidImageSize { width, height } => {
                write!(f, "Invalid image dimensions: {}x{} (must be > 0)", width, height)
            }
            DetectError::InvalidImageData { expected_len, actual_len } => {
                write!(f, "Image data length mismatch: expected {}, got {}", expected_len, actual_len)
            }
            DetectError::InvalidAperture(a) => {
                write!(f, "Invalid Sobel aperture: {} (only 3 is supported)", a)
            }
            DetectError::InvalidBlockSize(b) => {
                write!(f, "Invalid block size: {} (must be >= 1)", b)
            }
            DetectError::InvalidConfig(msg) => write!(f, "Invalid detector configuration: {}", msg),
            DetectError::UnsupportedDetector(name) => {
                write!(f, "Detector {} has no built-in backend", name)
            }
            DetectError::Input(e) => write!(f, "Invalid input: {}", e),
        }
    }
}

impl std::error::Error for DetectError {}

impl From<InputError> for DetectError {
    fn from(err: InputError) -> Self {
        DetectError::Input(err)
    }
}

pub type DetectResult<T> = Result<T, DetectError>;

/// Checks that `img` is a non-empty `width` x `height` buffer
pub(crate) fn validate_image(img: &[u8], width: usize, height: usize) -> DetectResult<()> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidImageSize { width, height });
    }
    let expected_len = width * height;
    if img.len() != expected_len {
        return Err(DetectError::InvalidImageData {
            expected_len,
            actual_len: img.len(),
        });
    }
    Ok(())
}

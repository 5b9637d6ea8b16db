use track_core::InputError;

#[derive(Debug, Clone)]
pub enum MatchError {
    InvalidRatio(f32),
    UnsupportedMatcher(&'static str),
    InvalidConfig(String),
    Input(InputError),
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchError::InvalidRatio(r) => write!(f, "Invalid ratio threshold: {} (must lie in (0, 1))", r),
            MatchError::UnsupportedMatcher(name) => write!(f, "Matcher {} has no built-in backend", name),
            MatchError::InvalidConfig(msg) => write!(f, "Invalid matcher configuration: {}", msg),
            MatchError::Input(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MatchError::Input(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InputError> for MatchError {
    fn from(e: InputError) -> Self {
        MatchError::Input(e)
    }
}

pub type MatchResult<T> = Result<T, MatchError>;

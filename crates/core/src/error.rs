/// Result alias that carries the custom [`SortifyError`] type.
pub type Result<T> = std::result::Result<T, SortifyError>;

/// Common error type for the core crate.
#[derive(Debug, thiserror::Error)]
pub enum SortifyError {
    /// The requested algorithm selector does not name a known algorithm.
    #[error("unknown sorting algorithm `{0}`")]
    InvalidAlgorithm(String),
    /// A run is already in progress; starts are rejected rather than queued.
    #[error("a sorting run is already in progress")]
    AlreadyRunning,
    /// Speed must be a positive, finite multiplier.
    #[error("invalid speed {0}: expected a positive multiplier")]
    InvalidSpeed(f64),
    /// Sequences must contain at least one value.
    #[error("invalid sequence size {0}: expected at least one value")]
    InvalidSize(usize),
    /// The run was cancelled at a pacing checkpoint.
    #[error("run cancelled")]
    Cancelled,
    /// Free-form failure surfaced with a readable message.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl SortifyError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for SortifyError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SortifyError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

use thiserror::Error;

/// Errors reported by editing operations.
///
/// None of these are fatal to a session. An operation that fails leaves the
/// current image, the floating items and both history stacks untouched.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("No valid selection")]
    InvalidSelection,

    #[error("Missing capability: {0}")]
    MissingCapability(&'static str),

    #[error("No active image")]
    NoActiveImage,

    #[error("No image in clipboard")]
    ClipboardEmpty,

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Clipboard transfer failed: {0}")]
    Clipboard(String),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl EditorError {
    /// True for errors caused by the current editor state rather than by the
    /// outside world (codec, clipboard, file system).
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidSelection
                | Self::MissingCapability(_)
                | Self::NoActiveImage
                | Self::ClipboardEmpty
                | Self::InvalidParameters(_)
        )
    }
}

/// Result type for session level operations
pub type EditorResult<T> = Result<T, EditorError>;

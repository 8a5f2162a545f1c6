/// Result alias used throughout the crate.
pub type PixfadeResult<T> = Result<T, PixfadeError>;

/// Errors produced by configuration, rendering, and encoding.
#[derive(thiserror::Error, Debug)]
pub enum PixfadeError {
    /// A configuration value is out of range or inconsistent.
    #[error("validation error: {0}")]
    Validation(String),

    /// A caller passed a value outside the accepted domain (unknown direction, bad color).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Rasterization or compositing could not proceed.
    #[error("render error: {0}")]
    Render(String),

    /// The frame sink failed to accept or encode frames.
    #[error("encode error: {0}")]
    Encode(String),

    /// Filesystem access failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PixfadeError {
    /// Build a [`PixfadeError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PixfadeError::InvalidArgument`].
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`PixfadeError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PixfadeError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

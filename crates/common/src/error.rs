//! Error types shared across Annocam crates.

/// Top-level error type for Annocam operations.
#[derive(Debug, thiserror::Error)]
pub enum AnnocamError {
    #[error("Asset load error: {message}")]
    AssetLoad { message: String },

    #[error("Camera error: {message}")]
    Camera { message: String },

    #[error("Detection error: {message}")]
    Detection { message: String },

    #[error("Encoder error: {message}")]
    Encoder { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using AnnocamError.
pub type AnnocamResult<T> = Result<T, AnnocamError>;

impl AnnocamError {
    pub fn asset_load(msg: impl Into<String>) -> Self {
        Self::AssetLoad {
            message: msg.into(),
        }
    }

    pub fn camera(msg: impl Into<String>) -> Self {
        Self::Camera {
            message: msg.into(),
        }
    }

    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection {
            message: msg.into(),
        }
    }

    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error is fatal to session startup.
    ///
    /// Asset and camera failures abort `open()`; everything else is either
    /// absorbed per tick or guarded at the recorder API boundary.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, Self::AssetLoad { .. } | Self::Camera { .. })
    }
}

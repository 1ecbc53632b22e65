/// Core error types for the Reel engine.
use std::path::PathBuf;

/// A specialized Result type for Reel operations.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error type encompassing all Reel subsystems.
#[derive(Debug, thiserror::Error)]
pub enum ReelError {
    #[error("empty script: enter some text to narrate")]
    EmptyScript,

    #[error("invalid style: {0}")]
    InvalidStyle(String),

    #[error("config error: {message} ({path:?})")]
    Config { message: String, path: PathBuf },

    #[error("timeline error: {0}")]
    Timeline(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("speech synthesis failed: {message}")]
    Synthesis {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl ReelError {
    /// Create a config error tied to a file.
    pub fn config(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ReelError::Config {
            message: message.into(),
            path: path.into(),
        }
    }

    /// Create a synthesis error without an underlying cause.
    pub fn synthesis(message: impl Into<String>) -> Self {
        ReelError::Synthesis {
            message: message.into(),
            source: None,
        }
    }

    /// Create a synthesis error that keeps the collaborator's failure attached.
    pub fn synthesis_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ReelError::Synthesis {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether the caller can fix this by changing their input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ReelError::EmptyScript | ReelError::InvalidStyle(_) | ReelError::InvalidArgument(_)
        )
    }
}

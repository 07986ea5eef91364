//! Error types for modal windows.

/// Failures reported by a [`Host`](crate::Host) implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Missing global: {0}")]
    MissingGlobal(&'static str),

    #[error("Failed to create <{tag}>: {reason}")]
    ElementCreation { tag: String, reason: String },

    #[error("Focus failed: {0}")]
    Focus(String),

    #[error("Pointer capture failed: {0}")]
    PointerCapture(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),
}

/// Errors that can occur while building a modal window.
#[derive(Debug, thiserror::Error)]
pub enum ModalError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("Invalid modal configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for modal operations.
pub type ModalResult<T> = Result<T, ModalError>;

//! Error types for the rendering service

use thiserror::Error;

/// Result type alias for rendering operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a request into an image
///
/// Payloads are plain strings so a single outcome (a memoized launch failure,
/// a shared in-flight render) can be cloned out to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request is missing required input or is malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The browser process could not be started
    #[error("Browser launch failed: {0}")]
    SessionLaunchFailed(String),

    /// Content-set, element lookup or rasterization failed
    #[error("Rendering failed: {0}")]
    RenderFailed(String),

    /// Rendering did not finish before the deadline
    #[error("Rendering timed out after {0}ms")]
    RenderTimeout(u64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the caller, not the service, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }
}

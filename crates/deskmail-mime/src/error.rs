//! Error types for MIME generation.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// MIME error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid email address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid header name or value.
    #[error("Invalid MIME header: {0}")]
    InvalidHeader(String),

    /// Missing required header.
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    /// Writing the rendered message failed.
    #[error("Render error: {0}")]
    Render(#[from] std::io::Error),
}

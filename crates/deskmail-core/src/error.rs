//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The database could not be reached or opened.
    #[error("Cannot connect to {target}: {reason}")]
    Connection {
        /// Connection target as configured.
        target: String,
        /// Underlying cause.
        reason: String,
    },

    /// The export directory could not be created or used.
    #[error("Output directory {path:?} is unusable: {source}")]
    OutputDirectory {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Message construction or rendering failed.
    #[error("MIME error: {0}")]
    Mime(#[from] deskmail_mime::Error),

    /// A linked attachment exists but could not be read.
    #[error("Cannot read attachment {path:?}: {source}")]
    AttachmentRead {
        /// Resolved attachment path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// No free file name was found for a record.
    #[error("No free file name for {0:?} after {1} attempts")]
    FileNameExhausted(PathBuf, u32),

    /// A stored value could not be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pre-flight authorization refused the run.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Ticket not found.
    #[error("Ticket not found: {0}")]
    TicketNotFound(i64),
}

impl Error {
    /// Returns true for failures that must abort a whole run rather than a
    /// single record.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Database(_)
                | Self::Connection { .. }
                | Self::OutputDirectory { .. }
                | Self::Config(_)
                | Self::Unauthorized(_)
        )
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

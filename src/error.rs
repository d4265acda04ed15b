//! Session Error Types

use thiserror::Error;

/// Errors raised while resolving arguments or running a session.
///
/// Every variant aborts the whole run. Revision problems are always reported
/// before any package install or test run is attempted.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Wrong number of revisions, no revision at all, or a missing
    /// `AFTER_REVISION` variable.
    #[error("{0}")]
    InvalidArgumentCount(String),

    #[error("Unknown session: {0}")]
    UnknownSession(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Command `{command}` failed with {status}")]
    CommandFailed { command: String, status: String },
}

impl SessionError {
    pub fn is_argument_error(&self) -> bool {
        matches!(self, SessionError::InvalidArgumentCount(_))
    }
}

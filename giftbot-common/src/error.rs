// ================================================================
// File: giftbot-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid duration format: {0}")]
    InvalidFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found error: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short text suitable for replying to the user who issued a command.
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidFormat(_) => {
                "Please specify a valid duration (e.g., 1d, 2h, 1h 30m).".to_string()
            }
            Error::InvalidArgument(msg)
            | Error::NotFound(msg)
            | Error::PermissionDenied(msg) => msg.clone(),
            Error::Platform(_) | Error::Config(_) | Error::Io(_) => {
                "Something went wrong while talking to the chat platform. Please try again.".to_string()
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Platform(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Platform(s.to_string())
    }
}

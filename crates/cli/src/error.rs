//! Error handling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid input format: {0}")]
    InvalidFormat(String),

    #[error("Share document has no 'keys' object")]
    MissingKeys,

    #[error("Malformed share entry '{key}': {reason}")]
    MalformedEntry { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

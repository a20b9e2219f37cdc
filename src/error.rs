//! Error types for manuscript-format

use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Missing required part: {0}")]
    MissingPart(String),

    #[error("Missing attribute '{attr}' on element '{element}'")]
    MissingAttribute { element: String, attr: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Quota exceeded: document needs {requested} words, {remaining} remaining")]
    QuotaExceeded { requested: u64, remaining: u64 },

    #[error("Unknown user: {0}")]
    UnknownUser(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

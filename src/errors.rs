// Error types. `UploadError` covers the upload itself, `HostError` the
// front-end capabilities around it.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between picking a file and getting a URL
/// back. The `Display` text is exactly what the user sees in the failure
/// status.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! Status: {status}{}", body_suffix(body))]
    HttpStatus { status: u16, body: String },

    #[error("Empty response from server")]
    EmptyResponse,

    #[error("An upload is already in progress")]
    Busy,

    #[error("{0}")]
    Selection(String),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(" - {}", body)
    }
}

impl UploadError {
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    pub fn selection(message: &str) -> Self {
        Self::Selection(message.to_string())
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

/// Failures of the host capabilities (form, clipboard, browser).
#[derive(Error, Debug)]
pub enum HostError {
    #[error("Failed to copy link to clipboard: {0}")]
    Clipboard(String),

    #[error("Failed to open {url}: {reason}")]
    OpenUrl { url: String, reason: String },

    #[error("Form error: {0}")]
    Form(String),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

pub type UploadOutcome<T> = Result<T, UploadError>;
pub type HostResult<T> = Result<T, HostError>;

// The upload operation itself: read the file, POST it, turn the plain-text
// answer into a URL or a failure message.

use crate::api::Transport;
use crate::config::UploaderConfig;
use crate::errors::{UploadError, UploadOutcome};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// One file chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_path: PathBuf,
}

impl UploadRequest {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Build a request from whatever the picker returned. Exactly one file
    /// is accepted.
    pub fn from_selection(mut paths: Vec<PathBuf>) -> UploadOutcome<Self> {
        match paths.len() {
            0 => Err(UploadError::selection("A file is required")),
            1 => Ok(Self::new(paths.remove(0))),
            n => Err(UploadError::Selection(format!(
                "Only one file can be uploaded at a time ({} selected)",
                n
            ))),
        }
    }
}

/// Outcome of a single upload, ready to be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadResult {
    Success { url: String },
    Failure { message: String },
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadResult::Success { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            UploadResult::Success { url } => Some(url),
            UploadResult::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            UploadResult::Success { .. } => None,
            UploadResult::Failure { message } => Some(message),
        }
    }
}

impl From<UploadOutcome<String>> for UploadResult {
    fn from(outcome: UploadOutcome<String>) -> Self {
        match outcome {
            Ok(url) => UploadResult::Success { url },
            Err(e) => UploadResult::Failure {
                message: e.to_string(),
            },
        }
    }
}

/// Busy flag that admits one caller at a time.
#[derive(Debug, Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

/// Held while an upload runs; clears the busy flag when dropped.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
}

impl SingleFlight {
    pub fn try_acquire(&self) -> Option<FlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard { flight: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flight.busy.store(false, Ordering::Release);
    }
}

/// Uploads local files to the configured endpoint through `T`.
pub struct Uploader<T: Transport> {
    config: UploaderConfig,
    transport: T,
    flight: SingleFlight,
}

impl<T: Transport> Uploader<T> {
    pub fn new(config: UploaderConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            flight: SingleFlight::default(),
        }
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.flight.is_busy()
    }

    /// Upload `file_path` and report the result. Never fails past this
    /// point: every error becomes `UploadResult::Failure`.
    pub fn upload(&self, file_path: &Path) -> UploadResult {
        let result = UploadResult::from(self.try_upload(file_path));
        if let UploadResult::Failure { message } = &result {
            log::warn!("Upload of {} failed: {}", file_path.display(), message);
        }
        result
    }

    /// Typed form of [`Uploader::upload`].
    pub fn try_upload(&self, file_path: &Path) -> UploadOutcome<String> {
        let _guard = self.flight.try_acquire().ok_or(UploadError::Busy)?;

        let contents =
            std::fs::read(file_path).map_err(|e| UploadError::file_read(file_path, e))?;
        let file_name = base_name(file_path);
        log::info!(
            "Uploading {} ({} bytes) to {}",
            file_name,
            contents.len(),
            self.config.endpoint
        );

        let response = self.transport.post_file(
            &self.config.endpoint,
            &self.config.user_agent,
            &file_name,
            contents,
        )?;

        if !response.is_success() {
            return Err(UploadError::http_status(response.status, response.body));
        }

        let url = response.body.trim();
        if url.is_empty() {
            return Err(UploadError::EmptyResponse);
        }

        log::info!("Uploaded {} -> {}", file_name, url);
        Ok(url.to_string())
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string())
}

// The command flow, written against an abstract host. Anything that draws
// UI, touches the clipboard or launches a browser lives behind `Host` so the
// flow runs the same in a terminal, a launcher plugin or a test.

use crate::api::Transport;
use crate::errors::HostResult;
use crate::uploader::{UploadRequest, UploadResult, Uploader};

/// What the host is asked to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    InProgress { title: String, message: String },
    Success { title: String, message: String, url: String },
    Failure { title: String, message: String },
}

impl Status {
    fn uploading() -> Self {
        Status::InProgress {
            title: "Uploading".to_string(),
            message: "Please wait...".to_string(),
        }
    }

    fn uploaded(url: &str) -> Self {
        Status::Success {
            title: "Upload successful".to_string(),
            message: "Link copied to clipboard".to_string(),
            url: url.to_string(),
        }
    }

    fn failed(message: &str) -> Self {
        Status::Failure {
            title: "Upload failed".to_string(),
            message: message.to_string(),
        }
    }
}

/// Capabilities the command needs from its environment.
pub trait Host {
    /// Ask the user for a file. `Ok(None)` means the form was dismissed.
    fn present_form(&mut self) -> HostResult<Option<UploadRequest>>;

    fn show_status(&mut self, status: &Status);

    fn write_clipboard(&mut self, text: &str) -> HostResult<()>;

    /// Offer the "Open in Browser" follow-up; true if the user took it.
    fn offer_open_url(&mut self, url: &str) -> bool;

    fn open_url(&mut self, url: &str) -> HostResult<()>;
}

/// Lifecycle of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Submitting,
    Succeeded { url: String },
    Failed { message: String },
}

impl UploadState {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            UploadState::Succeeded { .. } | UploadState::Failed { .. }
        )
    }
}

impl From<UploadResult> for UploadState {
    /// Where a submission ends up.
    fn from(result: UploadResult) -> Self {
        match result {
            UploadResult::Success { url } => UploadState::Succeeded { url },
            UploadResult::Failure { message } => UploadState::Failed { message },
        }
    }
}

/// Run one upload command: form, upload, feedback, clipboard, follow-up.
/// Returns the state the command ended in; `Idle` if the user backed out.
pub fn run_command<H, T>(host: &mut H, uploader: &Uploader<T>) -> UploadState
where
    H: Host,
    T: Transport,
{
    let request = match host.present_form() {
        Ok(Some(request)) => request,
        Ok(None) => {
            log::debug!("Form dismissed");
            return UploadState::Idle;
        }
        Err(e) => {
            host.show_status(&Status::failed(&e.to_string()));
            return UploadState::Failed {
                message: e.to_string(),
            };
        }
    };

    log::debug!("{:?} -> {:?}", UploadState::Idle, UploadState::Submitting);
    host.show_status(&Status::uploading());

    let result = match uploader.upload(&request.file_path) {
        UploadResult::Success { url } => match host.write_clipboard(&url) {
            Ok(()) => UploadResult::Success { url },
            Err(e) => UploadResult::Failure {
                message: e.to_string(),
            },
        },
        failure => failure,
    };

    let state = UploadState::from(result);
    log::debug!("{:?} -> {:?}", UploadState::Submitting, state);
    match &state {
        UploadState::Succeeded { url } => {
            host.show_status(&Status::uploaded(url));
            if host.offer_open_url(url) {
                if let Err(e) = host.open_url(url) {
                    log::warn!("{}", e);
                }
            }
        }
        UploadState::Failed { message } => host.show_status(&Status::failed(message)),
        UploadState::Idle | UploadState::Submitting => {}
    }
    state
}

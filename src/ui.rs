// Terminal implementation of `Host`: `dialoguer` prompts, an `indicatif`
// spinner while the upload runs, the native file picker from `rfd`, and the
// system clipboard/browser.

use crate::errors::{HostError, HostResult};
use crate::host::{Host, Status};
use crate::uploader::UploadRequest;
use dialoguer::{Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

/// On X11/Wayland the copied text is served by the `arboard::Clipboard`
/// that set it, so the host keeps it for as long as the host lives.
#[derive(Default)]
pub struct TerminalHost {
    spinner: Option<ProgressBar>,
    clipboard: Option<arboard::Clipboard>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn clipboard(&mut self) -> HostResult<&mut arboard::Clipboard> {
        if self.clipboard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| HostError::Clipboard(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| HostError::Clipboard("clipboard unavailable".to_string()))
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Host for TerminalHost {
    /// Prompt for a path; an empty answer opens the native picker, which
    /// only allows a single file.
    fn present_form(&mut self) -> HostResult<Option<UploadRequest>> {
        let typed: String = Input::new()
            .with_prompt("File to upload (leave empty to browse)")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| HostError::Form(e.to_string()))?;

        let typed = typed.trim().trim_matches(|c| c == '"' || c == '\'');
        let selection: Vec<PathBuf> = if typed.is_empty() {
            match rfd::FileDialog::new().set_title("Upload to 0x0.st").pick_file() {
                Some(path) => vec![path],
                None => return Ok(None),
            }
        } else {
            vec![PathBuf::from(typed)]
        };

        Ok(Some(UploadRequest::from_selection(selection)?))
    }

    fn show_status(&mut self, status: &Status) {
        match status {
            Status::InProgress { title, message } => {
                self.stop_spinner();
                let spinner = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                    spinner.set_style(style);
                }
                spinner.set_message(format!("{}: {}", title, message));
                spinner.enable_steady_tick(Duration::from_millis(100));
                self.spinner = Some(spinner);
            }
            Status::Success { title, message, url } => {
                self.stop_spinner();
                println!("{} ({})", title, message);
                println!("{}", url);
            }
            Status::Failure { title, message } => {
                self.stop_spinner();
                eprintln!("{}: {}", title, message);
            }
        }
    }

    fn write_clipboard(&mut self, text: &str) -> HostResult<()> {
        self.clipboard()?
            .set_text(text)
            .map_err(|e| HostError::Clipboard(e.to_string()))
    }

    fn offer_open_url(&mut self, _url: &str) -> bool {
        Confirm::new()
            .with_prompt("Open in Browser?")
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn open_url(&mut self, url: &str) -> HostResult<()> {
        open::that(url).map_err(|e| HostError::OpenUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

// HTTP side of the uploader: one blocking multipart POST per call. The
// `Transport` trait is the seam that lets the uploader be exercised without
// a network.

use crate::errors::{UploadError, UploadOutcome};
use reqwest::blocking::{multipart, Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

/// Status and body text of a finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a single file as a `multipart/form-data` POST.
pub trait Transport {
    fn post_file(
        &self,
        endpoint: &str,
        user_agent: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> UploadOutcome<RawResponse>;
}

/// Blocking reqwest client. No timeout and no retries: a server that
/// never answers keeps the call waiting.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> UploadOutcome<Self> {
        let client = Self::client_builder()
            .build()
            .map_err(|e| UploadError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client))
    }

    /// reqwest's blocking client gives up after 30s by default, which cuts
    /// off large uploads on slow links. Start from this builder instead.
    pub fn client_builder() -> ClientBuilder {
        Client::builder().timeout(None::<Duration>)
    }

    /// Use a preconfigured client (proxy settings, TLS roots, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn headers(user_agent: &str) -> UploadOutcome<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(user_agent)
            .map_err(|_| UploadError::Network(format!("Invalid User-Agent: {:?}", user_agent)))?;
        headers.insert(USER_AGENT, value);
        Ok(headers)
    }
}

impl Transport for HttpTransport {
    fn post_file(
        &self,
        endpoint: &str,
        user_agent: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> UploadOutcome<RawResponse> {
        let part = multipart::Part::bytes(contents).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        log::debug!("POST {} as {:?}", endpoint, user_agent);
        let res = self
            .client
            .post(endpoint)
            .headers(Self::headers(user_agent)?)
            .multipart(form)
            .send()?;

        let status = res.status();
        let body = if status.is_success() {
            res.text()?
        } else {
            // An unreadable error body is reported as no body at all.
            res.text().unwrap_or_default()
        };

        log::debug!("{} answered {}", endpoint, status.as_u16());
        Ok(RawResponse::new(status.as_u16(), body))
    }
}

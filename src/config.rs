// Uploader configuration. The command always talks to the public instance;
// other endpoints (a local stub, a self-hosted instance) are only reachable
// by building a config in code. Nothing is read from the environment.

pub const DEFAULT_ENDPOINT: &str = "https://0x0.st";

/// Where to POST and how to identify ourselves. 0x0.st asks clients to
/// send a descriptive User-Agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderConfig {
    pub endpoint: String,
    pub user_agent: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

impl UploaderConfig {
    /// Blank values fall back to the defaults.
    pub fn new(endpoint: &str, user_agent: &str) -> Self {
        let pick = |value: &str, fallback: String| {
            let value = value.trim();
            if value.is_empty() {
                fallback
            } else {
                value.to_string()
            }
        };

        Self {
            endpoint: pick(endpoint, DEFAULT_ENDPOINT.to_string()),
            user_agent: pick(user_agent, default_user_agent()),
        }
    }

    pub fn with_endpoint(endpoint: &str) -> Self {
        Self::new(endpoint, "")
    }
}

fn default_user_agent() -> String {
    format!("0x0-upload/{}", env!("CARGO_PKG_VERSION"))
}

//! Market API client configuration.

use std::time::Duration;

use serde::Deserialize;

/// Environment variable holding the bearer token for authenticated reads.
pub const ACCESS_TOKEN_ENV: &str = "TRADELANE_ACCESS_TOKEN";

/// Connection and concurrency settings for the market API.
#[derive(Debug, Clone, Deserialize)]
pub struct EsiConfig {
    /// Base URL every endpoint path is joined onto. Must end with `/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Server the API should read from.
    #[serde(default = "default_datasource")]
    pub datasource: String,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Hard per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Process-wide ceiling on simultaneous outbound requests.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Worker count for batch item fetches (capped at the item count).
    #[serde(default = "default_batch_workers")]
    pub batch_workers: usize,
    /// Batch progress is reported every this many completions.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: usize,
    /// Bearer token; loaded from [`ACCESS_TOKEN_ENV`], never from the file.
    #[serde(skip)]
    pub access_token: Option<String>,
}

fn default_base_url() -> String {
    "https://esi.evetech.net/latest/".into()
}

fn default_datasource() -> String {
    "tranquility".into()
}

fn default_user_agent() -> String {
    format!("tradelane/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

const fn default_max_concurrency() -> usize {
    50
}

const fn default_batch_workers() -> usize {
    50
}

const fn default_progress_interval() -> usize {
    50
}

impl EsiConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for EsiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            datasource: default_datasource(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_concurrency: default_max_concurrency(),
            batch_workers: default_batch_workers(),
            progress_interval: default_progress_interval(),
            access_token: None,
        }
    }
}

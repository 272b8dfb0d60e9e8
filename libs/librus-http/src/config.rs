use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Browser-identifying User-Agent sent with every request.
///
/// The portal serves different markup to unknown agents, so the default
/// impersonates a desktop Chrome build.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36";

/// Default cap on a decoded response body (10 MiB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default number of redirect hops followed when a request opts into redirects.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Transport configuration for [`HttpClient`](crate::HttpClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// User-Agent applied to requests that do not set one explicitly.
    pub user_agent: String,

    /// Per-request timeout in seconds. `None` keeps the transport default
    /// (no timeout).
    pub timeout_secs: Option<u64>,

    /// Maximum redirect hops for requests with `follow_redirects = true`.
    pub max_redirects: usize,

    /// Maximum accepted response body size in bytes.
    pub max_body_size: usize,

    /// Allow plain `http://` URLs. Only meant for local mock servers.
    pub allow_insecure_http: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            timeout_secs: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            allow_insecure_http: false,
        }
    }
}

impl HttpClientConfig {
    /// Create configuration for testing with mock servers (allows insecure HTTP)
    ///
    /// **WARNING**: This configuration allows plain HTTP connections.
    /// Use only for local testing with mock servers, never in production.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: Some(10),
            allow_insecure_http: true,
            ..Self::default()
        }
    }

    /// Request timeout as a [`Duration`], if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

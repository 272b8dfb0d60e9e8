use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use librus_http::HttpClientConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ClientError;

/// Landing page host of the account portal.
pub const DEFAULT_PORTAL_URL: &str = "https://portal.librus.pl";

/// Base of the versioned data API.
pub const DEFAULT_API_URL: &str = "https://api.librus.pl/3.0";

/// IDs per batched request. The API rejects request paths carrying more than
/// about thirty IDs.
pub const DEFAULT_BATCH_LIMIT: usize = 29;

/// Prefix of environment variables read by [`ClientConfig::load`].
pub const ENV_PREFIX: &str = "LIBRUS_";

/// Client configuration.
///
/// Every field has a default, so partial YAML or environment overrides are
/// enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Account portal (login handshake, linked accounts, token refresh).
    pub portal_url: String,

    /// Data API base (entities, `Me`).
    pub api_url: String,

    /// Maximum IDs per batched request.
    pub batch_limit: usize,

    /// Transport settings.
    pub http: HttpClientConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            portal_url: DEFAULT_PORTAL_URL.to_owned(),
            api_url: DEFAULT_API_URL.to_owned(),
            batch_limit: DEFAULT_BATCH_LIMIT,
            http: HttpClientConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Layer defaults, an optional YAML file, then `LIBRUS_*` environment
    /// variables (nested keys separated by `__`, e.g. `LIBRUS_HTTP__TIMEOUT_SECS`).
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] if a layer fails to parse or the merged
    /// configuration does not validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment
            .extract()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration pointing both the portal and the API at a local mock
    /// server, with plain HTTP allowed.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            portal_url: base.to_owned(),
            api_url: format!("{base}/3.0"),
            batch_limit: DEFAULT_BATCH_LIMIT,
            http: HttpClientConfig::for_testing(),
        }
    }

    /// Check that URLs parse and the batch limit is usable.
    ///
    /// # Errors
    /// Returns [`ClientError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ClientError> {
        for (name, value) in [("portal_url", &self.portal_url), ("api_url", &self.api_url)] {
            Url::parse(value)
                .map_err(|e| ClientError::Config(format!("{name} '{value}' is invalid: {e}")))?;
        }
        if self.batch_limit == 0 {
            return Err(ClientError::Config(
                "batch_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Absolute portal URL for `path`.
    #[must_use]
    pub fn portal_endpoint(&self, path: &str) -> String {
        join(&self.portal_url, path)
    }

    /// Absolute API URL for `path`.
    #[must_use]
    pub fn api_endpoint(&self, path: &str) -> String {
        join(&self.api_url, path)
    }
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

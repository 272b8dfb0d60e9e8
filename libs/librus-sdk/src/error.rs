use librus_http::{HttpError, StatusCode};
use thiserror::Error;

/// Errors surfaced by the Librus client.
///
/// Messages never include the password or a bearer token.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The login handshake failed (bad input, missing anti-forgery token,
    /// rejected credentials, no linked account, failed account check).
    #[error("login failed: {0}")]
    Auth(String),

    /// The bearer token could not be renewed.
    #[error("token refresh failed: {0}")]
    Refresh(String),

    /// An authenticated request failed even after one reauthentication and
    /// one retry.
    #[error("request to {url} failed: {reason}")]
    RequestFailed {
        url: String,
        status: Option<StatusCode>,
        reason: String,
    },

    /// A request was issued before login, or after the session gave up.
    #[error("session is not authenticated")]
    NotAuthenticated,

    /// A payload did not match the expected shape.
    #[error("{entity} payload did not match the expected shape: {reason}")]
    SchemaMismatch {
        entity: &'static str,
        reason: String,
    },

    /// The API did not return the requested entity.
    #[error("{entity} {id} not found{}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    NotFound {
        entity: &'static str,
        id: String,
        status: Option<StatusCode>,
    },

    /// A cache-only read missed.
    #[error("{entity} {id} is not in the cache")]
    NotFoundInCache { entity: &'static str, id: String },

    /// Invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ClientError {
    pub(crate) fn schema(entity: &'static str, reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            entity,
            reason: reason.into(),
        }
    }
}

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::HttpError;

/// Maximum number of body characters carried in [`HttpError::HttpStatus`].
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 256;

/// Fully buffered response returned by an [`HttpTransport`](crate::HttpTransport).
#[derive(Debug, Clone)]
pub struct HttpResponse {
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(url: Url, status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            url,
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Final URL of the exchange (after redirects, when they were followed).
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.body
    }

    /// `true` for 2xx statuses. Redirects are not success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body as JSON.
    ///
    /// # Errors
    /// Returns [`HttpError::Json`] if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Turn a non-2xx response into [`HttpError::HttpStatus`].
    ///
    /// # Errors
    /// Returns [`HttpError::HttpStatus`] with a truncated body preview.
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(HttpError::HttpStatus {
            status: self.status,
            body_preview: body_preview(&self.body),
        })
    }
}

fn body_preview(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_owned(),
    }
}

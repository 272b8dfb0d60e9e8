use http::header::{CONTENT_TYPE, HeaderName};
use http::{HeaderMap, HeaderValue, Method};
use serde::Serialize;
use url::Url;

use crate::error::HttpError;

/// A single outbound request handed to an [`HttpTransport`](crate::HttpTransport).
///
/// Redirects are observed by default: the transport returns the 3xx response
/// as-is unless [`follow_redirects`](Self::follow_redirects) is enabled.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub follow_redirects: bool,
}

impl HttpRequest {
    /// Create a request for an already parsed URL.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            follow_redirects: false,
        }
    }

    /// Create a request, parsing `url` first.
    ///
    /// # Errors
    /// Returns [`HttpError::InvalidUri`] if `url` is not an absolute URL.
    pub fn parse(method: Method, url: &str) -> Result<Self, HttpError> {
        let parsed = Url::parse(url).map_err(|e| HttpError::InvalidUri {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(method, parsed))
    }

    /// Shorthand for a `GET` request.
    ///
    /// # Errors
    /// Returns [`HttpError::InvalidUri`] if `url` does not parse.
    pub fn get(url: &str) -> Result<Self, HttpError> {
        Self::parse(Method::GET, url)
    }

    /// Shorthand for a `POST` request.
    ///
    /// # Errors
    /// Returns [`HttpError::InvalidUri`] if `url` does not parse.
    pub fn post(url: &str) -> Result<Self, HttpError> {
        Self::parse(Method::POST, url)
    }

    /// Insert a header, replacing any previous value.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Insert a header from string parts.
    ///
    /// # Errors
    /// Returns an error if either part is not a valid header token.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, HttpError> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        Ok(self.header(name, value))
    }

    /// Serialize `body` as JSON and set `Content-Type: application/json`.
    ///
    /// # Errors
    /// Returns [`HttpError::Json`] if serialization fails.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        self.body = Some(serde_json::to_string(body)?);
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// Choose whether the transport should follow redirects for this request.
    #[must_use]
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }
}

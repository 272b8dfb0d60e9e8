use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use http::HeaderValue;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::redirect::Policy;
use url::Url;

use crate::config::HttpClientConfig;
use crate::error::HttpError;
use crate::request::HttpRequest;
use crate::response::HttpResponse;
use crate::transport::HttpTransport;

/// `reqwest`-backed [`HttpTransport`] with a single cookie jar.
///
/// Two inner clients share the jar: one follows redirects, the other returns
/// 3xx responses untouched. [`HttpRequest::follow_redirects`] picks one per
/// request, so cookies set during a followed redirect chain are visible to
/// later observed-redirect requests and vice versa.
///
/// `HttpClient` is `Clone + Send + Sync`; clones share the jar.
#[derive(Clone)]
pub struct HttpClient {
    following: reqwest::Client,
    observing: reqwest::Client,
    cookies: Arc<Jar>,
    config: Arc<HttpClientConfig>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a client with default configuration.
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a client with the given configuration.
    ///
    /// # Errors
    /// Returns an error if the User-Agent is not a valid header value or TLS
    /// initialization fails.
    pub fn with_config(config: HttpClientConfig) -> Result<Self, HttpError> {
        let cookies = Arc::new(Jar::default());
        let following = build_inner(&config, &cookies, Policy::limited(config.max_redirects))?;
        let observing = build_inner(&config, &cookies, Policy::none())?;

        Ok(Self {
            following,
            observing,
            cookies,
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// `Cookie` header value the jar would send to `url`, if any.
    #[must_use]
    pub fn cookie_header(&self, url: &Url) -> Option<String> {
        self.cookies
            .cookies(url)
            .and_then(|value| value.to_str().ok().map(str::to_owned))
    }

    fn check_scheme(&self, url: &Url) -> Result<(), HttpError> {
        match url.scheme() {
            "https" => Ok(()),
            "http" if self.config.allow_insecure_http => Ok(()),
            "http" => Err(HttpError::InvalidScheme {
                scheme: "http".to_owned(),
                reason: "plain HTTP is disabled; enable allow_insecure_http for local testing"
                    .to_owned(),
            }),
            other => Err(HttpError::InvalidScheme {
                scheme: other.to_owned(),
                reason: "only http and https are supported".to_owned(),
            }),
        }
    }

    fn map_send_error(&self, err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(self.config.timeout().unwrap_or_default())
        } else {
            HttpError::from(err)
        }
    }

    /// Read the decoded body, failing as soon as it grows past `limit`.
    ///
    /// The check runs on decompressed chunks, so neither a missing
    /// `Content-Length` nor a gzip payload can get past the cap.
    async fn read_body_limited(
        &self,
        mut response: reqwest::Response,
        limit: usize,
    ) -> Result<String, HttpError> {
        let mut collected = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_send_error(e))?
        {
            if collected.len() + chunk.len() > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: collected.len() + chunk.len(),
                });
            }
            collected.extend_from_slice(&chunk);
        }
        Ok(String::from_utf8_lossy(&collected).into_owned())
    }
}

fn build_inner(
    config: &HttpClientConfig,
    cookies: &Arc<Jar>,
    redirect: Policy,
) -> Result<reqwest::Client, HttpError> {
    let user_agent = HeaderValue::from_str(&config.user_agent)?;
    let mut builder = reqwest::Client::builder()
        .cookie_provider(Arc::clone(cookies))
        .redirect(redirect)
        .user_agent(user_agent)
        .gzip(true);
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(HttpError::from)
}

#[async_trait]
impl HttpTransport for HttpClient {
    async fn perform(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.check_scheme(&request.url)?;

        let inner = if request.follow_redirects {
            &self.following
        } else {
            &self.observing
        };

        let method = request.method.clone();
        let mut builder = inner
            .request(request.method, request.url.clone())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let limit = self.config.max_body_size;
        if let Some(declared) = response.content_length() {
            let declared = usize::try_from(declared).unwrap_or(usize::MAX);
            if declared > limit {
                return Err(HttpError::BodyTooLarge {
                    limit,
                    actual: declared,
                });
            }
        }

        let url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = self.read_body_limited(response, limit).await?;

        tracing::trace!(
            method = %method,
            url = %request.url,
            status = status.as_u16(),
            "HTTP exchange completed"
        );

        Ok(HttpResponse::new(url, status, body).with_headers(headers))
    }
}

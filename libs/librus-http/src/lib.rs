#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport for the Librus client
//!
//! This crate provides the request function the session layer is built on:
//! - One cookie jar per client instance, replayed on every request
//! - Per-request choice between following and observing redirects
//! - A browser-identifying User-Agent applied by default
//! - TLS-only by default, plain HTTP opt-in for mock servers
//! - Response body size limit
//!
//! # Example
//!
//! ```ignore
//! use librus_http::{HttpClient, HttpRequest, HttpTransport};
//!
//! let client = HttpClient::new()?;
//! let landing = client
//!     .perform(HttpRequest::get("https://portal.librus.pl/")?.follow_redirects(true))
//!     .await?;
//! println!("{}", landing.status());
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod transport;

pub use client::HttpClient;
pub use config::{
    DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT, HttpClientConfig,
};
pub use error::HttpError;
pub use request::HttpRequest;
pub use response::{ERROR_BODY_PREVIEW_LIMIT, HttpResponse};
pub use transport::HttpTransport;

pub use http::{HeaderMap, HeaderValue, Method, StatusCode, header};
pub use url::Url;

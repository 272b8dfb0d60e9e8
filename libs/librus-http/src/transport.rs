use async_trait::async_trait;

use crate::error::HttpError;
use crate::request::HttpRequest;
use crate::response::HttpResponse;

/// Black-box request function used by the session layer.
///
/// Implementations must replay cookies received on earlier responses for the
/// lifetime of the instance and must honour
/// [`HttpRequest::follow_redirects`]: when it is `false` a 3xx response is
/// returned to the caller untouched.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one request and buffer the whole response body.
    ///
    /// # Errors
    /// Returns [`HttpError`] for network, TLS, timeout or size-limit failures.
    /// Non-2xx statuses are NOT errors at this level.
    async fn perform(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

//! Bearer-token session with transparent renewal.
//!
//! [`Session::request`] is the only path entity fetches take to the network.
//! On HTTP 401 it renews credentials once (token refresh, falling back to a
//! full login with the remembered credentials) and retries the original
//! request once. Nothing is retried beyond that.

mod login;
mod state;

use std::fmt;
use std::sync::Arc;

use librus_http::header::{AUTHORIZATION, HeaderName, USER_AGENT};
use librus_http::{
    HeaderMap, HeaderValue, HttpError, HttpRequest, HttpResponse, HttpTransport, Method,
    StatusCode,
};
use parking_lot::Mutex;
use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::AccountInfo;

use login::{
    ACCOUNTS_PATH, FRESH_TOKEN_PATH, FreshToken, LOGIN_ACTION_PATH, LoginForm, ME_PATH,
    MeEnvelope, SynergiaAccount, SynergiaAccounts, scan_csrf_token,
};
pub use state::{SessionEvent, SessionState};

const CSRF_HEADER: &str = "x-csrf-token";

/// Per-request overrides for [`Session::request`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Defaults to `GET`.
    pub method: Method,
    pub body: Option<String>,
    /// Extra headers. `Authorization` and `User-Agent` are always set by the
    /// session.
    pub headers: HeaderMap,
}

/// Login credentials, kept in memory for silent re-login only.
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.to_owned(),
            password: SecretString::from(password.to_owned()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Default)]
struct SessionInner {
    state: SessionState,
    bearer: Option<Arc<SecretString>>,
    secondary_login: Option<String>,
    credentials: Option<Arc<Credentials>>,
    account: Option<AccountInfo>,
}

/// One authenticated identity against the portal and the API.
///
/// The lock guarding session state is never held across an await point.
pub struct Session {
    transport: Arc<dyn HttpTransport>,
    config: Arc<ClientConfig>,
    inner: Mutex<SessionInner>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Session")
            .field("state", &inner.state)
            .field("secondary_login", &inner.secondary_login)
            .field("has_token", &inner.bearer.is_some())
            .finish_non_exhaustive()
    }
}

impl Session {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, config: Arc<ClientConfig>) -> Self {
        Self {
            transport,
            config,
            inner: Mutex::new(SessionInner::default()),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }

    /// Account record captured by the last successful login.
    #[must_use]
    pub fn account(&self) -> Option<AccountInfo> {
        self.inner.lock().account.clone()
    }

    /// Run the portal handshake and obtain a bearer token for the first
    /// linked account.
    ///
    /// Empty input, or an email without `@`, is rejected before any request
    /// is sent.
    ///
    /// # Errors
    /// [`ClientError::Auth`] if the handshake fails at any step, or
    /// [`ClientError::Http`] on transport failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        validate_credentials(email, password)?;
        self.login_with(Arc::new(Credentials::new(email, password)))
            .await
    }

    /// Replace the bearer token without re-sending credentials.
    ///
    /// # Errors
    /// [`ClientError::Refresh`] if the session holds no token to refresh or
    /// the portal does not return a new one.
    pub async fn refresh_token(&self) -> Result<(), ClientError> {
        let login = {
            let inner = self.inner.lock();
            if !matches!(
                inner.state,
                SessionState::Authenticated | SessionState::TokenExpired
            ) {
                return Err(ClientError::Refresh(format!(
                    "session is {}",
                    inner.state
                )));
            }
            inner
                .secondary_login
                .clone()
                .ok_or_else(|| ClientError::Refresh("no account login to refresh".into()))?
        };

        self.transition(SessionEvent::RefreshStarted);
        match self.request_fresh_token(&login).await {
            Ok(token) => {
                self.inner.lock().bearer = Some(Arc::new(token));
                self.transition(SessionEvent::RefreshSucceeded);
                Ok(())
            }
            Err(err) => {
                self.transition(SessionEvent::RefreshFailed);
                Err(err)
            }
        }
    }

    /// `GET` `url` with the bearer token.
    ///
    /// # Errors
    /// As for [`request`](Self::request).
    pub async fn get(&self, url: &str) -> Result<HttpResponse, ClientError> {
        self.request(url, RequestOptions::default()).await
    }

    /// Send an authenticated request, renewing credentials once on HTTP 401.
    ///
    /// Redirects are returned, not followed. Non-401 responses are handed
    /// back as they are, whatever their status.
    ///
    /// # Errors
    /// - [`ClientError::NotAuthenticated`] before login or after a failed one
    /// - [`ClientError::RequestFailed`] if renewal fails or the single retry
    ///   does not succeed
    /// - [`ClientError::Http`] if the first attempt fails in transport
    pub async fn request(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, ClientError> {
        let response = self.send_authenticated(url, &options).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            log_fetched(&response);
            return Ok(response);
        }

        tracing::debug!(url, "authorization rejected, renewing credentials");
        self.transition(SessionEvent::Unauthorized);

        if let Err(err) = self.reauthenticate().await {
            return Err(ClientError::RequestFailed {
                url: url.to_owned(),
                status: Some(StatusCode::UNAUTHORIZED),
                reason: format!("reauthentication failed: {err}"),
            });
        }

        let retried = self
            .send_authenticated(url, &options)
            .await
            .map_err(|err| ClientError::RequestFailed {
                url: url.to_owned(),
                status: None,
                reason: format!("retry failed: {err}"),
            })?;
        if !retried.is_success() {
            return Err(ClientError::RequestFailed {
                url: url.to_owned(),
                status: Some(retried.status()),
                reason: format!("retry returned HTTP {}", retried.status()),
            });
        }

        log_fetched(&retried);
        Ok(retried)
    }

    async fn reauthenticate(&self) -> Result<(), ClientError> {
        let Err(refresh_err) = self.refresh_token().await else {
            return Ok(());
        };
        tracing::warn!(error = %refresh_err, "token refresh failed, logging in again");

        let credentials = self
            .inner
            .lock()
            .credentials
            .clone()
            .ok_or_else(|| ClientError::Auth("no stored credentials".into()))?;
        self.login_with(credentials).await
    }

    async fn login_with(&self, credentials: Arc<Credentials>) -> Result<(), ClientError> {
        self.transition(SessionEvent::LoginStarted);
        {
            let mut inner = self.inner.lock();
            inner.bearer = None;
            inner.secondary_login = None;
            inner.account = None;
        }

        match self.handshake(&credentials).await {
            Ok(account) => {
                {
                    let mut inner = self.inner.lock();
                    inner.credentials = Some(credentials);
                    inner.account = Some(account);
                }
                self.transition(SessionEvent::LoginSucceeded);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(error = %err, "login failed");
                self.transition(SessionEvent::LoginFailed);
                Err(err)
            }
        }
    }

    async fn handshake(&self, credentials: &Credentials) -> Result<AccountInfo, ClientError> {
        let csrf_token = self.fetch_csrf_token().await?;
        self.submit_credentials(credentials, &csrf_token).await?;

        let account = self.first_linked_account().await?;
        {
            let mut inner = self.inner.lock();
            inner.bearer = Some(Arc::new(SecretString::from(account.access_token)));
            inner.secondary_login = Some(account.login);
        }

        self.fetch_account_info().await
    }

    async fn fetch_csrf_token(&self) -> Result<String, ClientError> {
        let request = HttpRequest::get(&self.config.portal_url)?.follow_redirects(true);
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(ClientError::Auth(format!(
                "portal landing page returned HTTP {}",
                response.status()
            )));
        }
        scan_csrf_token(response.text())
            .ok_or_else(|| ClientError::Auth("anti-forgery token not found on the portal".into()))
    }

    async fn submit_credentials(
        &self,
        credentials: &Credentials,
        csrf_token: &str,
    ) -> Result<(), ClientError> {
        let form = LoginForm {
            email: &credentials.email,
            password: credentials.password.expose_secret(),
        };
        let request = HttpRequest::post(&self.config.portal_endpoint(LOGIN_ACTION_PATH))?
            .header(
                HeaderName::from_static(CSRF_HEADER),
                HeaderValue::from_str(csrf_token).map_err(HttpError::from)?,
            )
            .json(&form)?
            .follow_redirects(true);

        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(ClientError::Auth(format!(
                "credentials rejected with HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn first_linked_account(&self) -> Result<SynergiaAccount, ClientError> {
        let request =
            HttpRequest::get(&self.config.portal_endpoint(ACCOUNTS_PATH))?.follow_redirects(true);
        let response = self.send(request).await?;
        if !response.is_success() {
            return Err(ClientError::Auth(format!(
                "linked accounts request returned HTTP {}",
                response.status()
            )));
        }

        let accounts: SynergiaAccounts = response
            .json()
            .map_err(|e| ClientError::Auth(format!("unexpected linked accounts payload: {e}")))?;
        let count = accounts.accounts.len();
        let account = accounts
            .accounts
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::Auth("no linked account".into()))?;
        tracing::debug!(
            linked_accounts = count,
            login = %account.login,
            "selected first linked account"
        );
        Ok(account)
    }

    async fn fetch_account_info(&self) -> Result<AccountInfo, ClientError> {
        let url = self.config.api_endpoint(ME_PATH);
        let response = self
            .send_authenticated(&url, &RequestOptions::default())
            .await?;
        if !response.is_success() {
            return Err(ClientError::Auth(format!(
                "account check returned HTTP {}",
                response.status()
            )));
        }
        let me: MeEnvelope = response
            .json()
            .map_err(|e| ClientError::Auth(format!("unexpected account payload: {e}")))?;
        Ok(me.me.account)
    }

    async fn request_fresh_token(&self, login: &str) -> Result<SecretString, ClientError> {
        let path = format!("{FRESH_TOKEN_PATH}/{}", urlencoding::encode(login));
        let request = HttpRequest::get(&self.config.portal_endpoint(&path))?;
        let response = self
            .send(request)
            .await
            .map_err(|e| ClientError::Refresh(format!("fresh token request failed: {e}")))?;
        if !response.is_success() {
            return Err(ClientError::Refresh(format!(
                "fresh token endpoint returned HTTP {}",
                response.status()
            )));
        }

        let fresh: FreshToken = response
            .json()
            .map_err(|_| ClientError::Refresh("response lacks an access token".into()))?;
        if fresh.access_token.is_empty() {
            return Err(ClientError::Refresh("response carried an empty token".into()));
        }
        Ok(SecretString::from(fresh.access_token))
    }

    /// Attach the bearer token and send without following redirects.
    async fn send_authenticated(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> Result<HttpResponse, ClientError> {
        let bearer = {
            let inner = self.inner.lock();
            if !inner.state.can_send() {
                return Err(ClientError::NotAuthenticated);
            }
            inner.bearer.clone().ok_or(ClientError::NotAuthenticated)?
        };

        let value = Zeroizing::new(format!("Bearer {}", bearer.expose_secret()));
        let mut authorization = HeaderValue::from_str(&value).map_err(HttpError::from)?;
        authorization.set_sensitive(true);

        let mut request = HttpRequest::parse(options.method.clone(), url)?;
        request.headers = options.headers.clone();
        request.body.clone_from(&options.body);
        let request = request
            .header(AUTHORIZATION, authorization)
            .follow_redirects(false);

        self.send(request).await
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let user_agent =
            HeaderValue::from_str(&self.config.http.user_agent).map_err(HttpError::from)?;
        let request = request.header(USER_AGENT, user_agent);
        Ok(self.transport.perform(request).await?)
    }

    fn transition(&self, event: SessionEvent) {
        let mut inner = self.inner.lock();
        let from = inner.state;
        if let Some(next) = from.on(event) {
            tracing::debug!(%from, to = %next, ?event, "session transition");
            inner.state = next;
        } else {
            tracing::warn!(state = %from, ?event, "ignoring event not valid in this state");
        }
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ClientError> {
    if email.trim().is_empty() {
        return Err(ClientError::Auth("email must not be empty".into()));
    }
    if !email.contains('@') {
        return Err(ClientError::Auth("email is not an address".into()));
    }
    if password.is_empty() {
        return Err(ClientError::Auth("password must not be empty".into()));
    }
    Ok(())
}

fn log_fetched(response: &HttpResponse) {
    if response.is_success() {
        tracing::debug!(url = %response.url(), status = response.status().as_u16(), "fetched");
    }
}

use std::fmt;

/// Lifecycle of the session's bearer token.
///
/// ```text
/// Unauthenticated --login--> Authenticating --ok--> Authenticated --401--> TokenExpired
///                                 |                    ^                      |
///                                 | fail               | refreshed            | refresh
///                                 v                    |                      v
///                               Failed              Refreshing <-------------+
///                                                       | refresh failed
///                                                       v
///                                                  TokenExpired --login--> Authenticating
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
    TokenExpired,
    Refreshing,
    Failed,
}

/// Inputs that drive [`SessionState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoginStarted,
    LoginSucceeded,
    LoginFailed,
    Unauthorized,
    RefreshStarted,
    RefreshSucceeded,
    RefreshFailed,
}

impl SessionState {
    /// Next state for `event`, or `None` if the event is not valid here.
    #[must_use]
    pub fn on(self, event: SessionEvent) -> Option<Self> {
        use SessionEvent as E;
        use SessionState as S;

        match (self, event) {
            (_, E::LoginStarted) => Some(S::Authenticating),
            (S::Authenticating, E::LoginSucceeded) | (S::Refreshing, E::RefreshSucceeded) => {
                Some(S::Authenticated)
            }
            (S::Authenticating, E::LoginFailed) => Some(S::Failed),
            (S::Authenticated, E::Unauthorized) | (S::Refreshing, E::RefreshFailed) => {
                Some(S::TokenExpired)
            }
            (S::Authenticated | S::TokenExpired, E::RefreshStarted) => Some(S::Refreshing),
            _ => None,
        }
    }

    /// Whether a bearer token may be attached in this state.
    #[must_use]
    pub fn can_send(self) -> bool {
        !matches!(self, Self::Unauthenticated | Self::Failed)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Authenticating => "authenticating",
            Self::Authenticated => "authenticated",
            Self::TokenExpired => "token_expired",
            Self::Refreshing => "refreshing",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

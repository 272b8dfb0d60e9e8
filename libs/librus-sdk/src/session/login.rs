//! Portal handshake payloads.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::AccountInfo;

pub const LOGIN_ACTION_PATH: &str = "konto-librus/login/action";
pub const ACCOUNTS_PATH: &str = "api/v3/SynergiaAccounts";
pub const FRESH_TOKEN_PATH: &str = "api/v3/SynergiaAccounts/fresh";
pub const ME_PATH: &str = "Me";

/// Anti-forgery token embedded in the portal landing page.
pub fn scan_csrf_token(html: &str) -> Option<String> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r#"<meta\s+name="csrf-token"\s+content="([^"]*)""#).ok())
        .as_ref()?;
    pattern
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_owned())
        .filter(|token| !token.is_empty())
}

#[derive(Serialize)]
pub struct LoginForm<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SynergiaAccounts {
    #[serde(default)]
    pub accounts: Vec<SynergiaAccount>,
}

/// One register account linked to the portal identity. Only the fields the
/// session needs are decoded.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergiaAccount {
    pub access_token: String,
    pub login: String,
    #[serde(default)]
    pub student_name: Option<String>,
}

impl std::fmt::Debug for SynergiaAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SynergiaAccount")
            .field("access_token", &"[REDACTED]")
            .field("login", &self.login)
            .field("student_name", &self.student_name)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreshToken {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MeEnvelope {
    pub me: Me,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Me {
    pub account: AccountInfo,
}

use serde::Deserialize;

/// Public account record returned by `GET /Me` after login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountInfo {
    pub id: u64,
    pub user_id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub group_id: Option<u64>,
    pub is_active: bool,
    pub login: String,
    pub is_premium: bool,
    pub is_premium_demo: bool,
    /// Unix timestamp; absent for accounts that never had premium.
    #[serde(default)]
    pub expired_premium_date: Option<i64>,
}

use serde::Deserialize;

use super::Entity;

/// A student, parent or school employee.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: u64,
    #[serde(rename = "AccountID", default)]
    pub account_id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
    pub is_employee: bool,
    #[serde(default)]
    pub group_id: Option<u64>,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for User {
    type Id = u64;

    const NAME: &'static str = "User";
    const SINGULAR: &'static str = "User";
    const PLURAL: &'static str = "Users";
    const PATH: &'static str = "Users";

    fn id(&self) -> &u64 {
        &self.id
    }
}

use std::sync::Arc;

use serde::Deserialize;

use super::{Entity, Reference, User};
use crate::client::LibrusClient;
use crate::error::ClientError;

/// A school-wide announcement.
///
/// Fetching a notice does not resolve its author; call
/// [`fetch_added_by`](Self::fetch_added_by) when it is needed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Notice {
    pub id: String,
    pub start_date: String,
    pub end_date: String,
    pub subject: String,
    pub content: String,
    pub added_by: Reference<User>,
    pub creation_date: String,
    pub was_read: bool,
}

impl Notice {
    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_added_by(&self, client: &LibrusClient) -> Result<Arc<User>, ClientError> {
        client.resolve(&self.added_by).await
    }
}

impl Entity for Notice {
    type Id = String;

    const NAME: &'static str = "SchoolNotice";
    const SINGULAR: &'static str = "SchoolNotice";
    const PLURAL: &'static str = "SchoolNotices";
    const PATH: &'static str = "SchoolNotices";

    fn id(&self) -> &String {
        &self.id
    }
}

use std::sync::Arc;

use serde::Deserialize;

use super::{Entity, GradeCategory, Lesson, Reference, ResourceLink, Subject, User};
use crate::client::LibrusClient;
use crate::error::ClientError;

/// A single grade. Fetching one resolves its category, subject, author and
/// student into their caches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Grade {
    pub id: u64,
    pub lesson: Reference<Lesson>,
    pub subject: Reference<Subject>,
    pub student: Reference<User>,
    pub category: Reference<GradeCategory>,
    pub added_by: Reference<User>,
    /// Grade symbol as shown in the register ("5", "4+", "np").
    #[serde(rename = "Grade")]
    pub value: String,
    pub date: String,
    pub add_date: String,
    pub semester: u32,
    pub is_constituent: bool,
    pub is_semester: bool,
    pub is_semester_proposition: bool,
    pub is_final: bool,
    pub is_final_proposition: bool,
    #[serde(default)]
    pub comments: Option<Vec<ResourceLink>>,
    #[serde(default)]
    pub improvement: Option<ResourceLink>,
    #[serde(default)]
    pub resit: Option<ResourceLink>,
}

impl Grade {
    /// # Errors
    /// [`ClientError::NotFoundInCache`] if the category was never resolved.
    pub fn category(&self, client: &LibrusClient) -> Result<Arc<GradeCategory>, ClientError> {
        client.cached(&self.category)
    }

    /// # Errors
    /// [`ClientError::NotFoundInCache`] if the subject was never resolved.
    pub fn subject(&self, client: &LibrusClient) -> Result<Arc<Subject>, ClientError> {
        client.cached(&self.subject)
    }

    /// # Errors
    /// [`ClientError::NotFoundInCache`] if the author was never resolved.
    pub fn added_by(&self, client: &LibrusClient) -> Result<Arc<User>, ClientError> {
        client.cached(&self.added_by)
    }

    /// # Errors
    /// [`ClientError::NotFoundInCache`] if the student was never resolved.
    pub fn student(&self, client: &LibrusClient) -> Result<Arc<User>, ClientError> {
        client.cached(&self.student)
    }

    /// Lessons are not resolved with the grade; this fetches on demand.
    ///
    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_lesson(&self, client: &LibrusClient) -> Result<Arc<Lesson>, ClientError> {
        client.resolve(&self.lesson).await
    }

    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_category(
        &self,
        client: &LibrusClient,
    ) -> Result<Arc<GradeCategory>, ClientError> {
        client.resolve(&self.category).await
    }

    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_subject(&self, client: &LibrusClient) -> Result<Arc<Subject>, ClientError> {
        client.resolve(&self.subject).await
    }

    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_added_by(&self, client: &LibrusClient) -> Result<Arc<User>, ClientError> {
        client.resolve(&self.added_by).await
    }

    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_student(&self, client: &LibrusClient) -> Result<Arc<User>, ClientError> {
        client.resolve(&self.student).await
    }
}

impl Entity for Grade {
    type Id = u64;

    const NAME: &'static str = "Grade";
    const SINGULAR: &'static str = "Grade";
    const PLURAL: &'static str = "Grades";
    const PATH: &'static str = "Grades";

    fn id(&self) -> &u64 {
        &self.id
    }
}

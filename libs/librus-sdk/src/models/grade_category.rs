use std::sync::Arc;

use serde::Deserialize;

use super::{Color, Entity, Reference, User};
use crate::client::LibrusClient;
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct GradeCategory {
    pub id: u64,
    pub color: Reference<Color>,
    pub name: String,
    pub adults_extramural: bool,
    pub adults_daily: bool,
    pub standard: bool,
    /// Sent by the API as a string flag.
    pub is_read_only: String,
    pub count_to_the_average: bool,
    #[serde(default)]
    pub weight: Option<f64>,
    pub block_any_grades: bool,
    pub obligation_to_perform: bool,
    #[serde(default)]
    pub is_semestral: Option<bool>,
    #[serde(default)]
    pub is_semestral_proposition: Option<bool>,
    #[serde(default)]
    pub short: Option<String>,
    #[serde(default)]
    pub teacher: Option<Reference<User>>,
}

impl GradeCategory {
    /// Cached color. Resolved together with the category.
    ///
    /// # Errors
    /// [`ClientError::NotFoundInCache`] if the color was never resolved.
    pub fn color(&self, client: &LibrusClient) -> Result<Arc<Color>, ClientError> {
        client.cached(&self.color)
    }

    /// Cached teacher, `None` for categories without one.
    ///
    /// # Errors
    /// [`ClientError::NotFoundInCache`] if the teacher was never resolved.
    pub fn teacher(&self, client: &LibrusClient) -> Result<Option<Arc<User>>, ClientError> {
        self.teacher
            .as_ref()
            .map(|teacher| client.cached(teacher))
            .transpose()
    }

    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_color(&self, client: &LibrusClient) -> Result<Arc<Color>, ClientError> {
        client.resolve(&self.color).await
    }

    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_teacher(
        &self,
        client: &LibrusClient,
    ) -> Result<Option<Arc<User>>, ClientError> {
        match &self.teacher {
            Some(teacher) => client.resolve(teacher).await.map(Some),
            None => Ok(None),
        }
    }
}

impl Entity for GradeCategory {
    type Id = u64;

    const NAME: &'static str = "GradeCategory";
    const SINGULAR: &'static str = "Category";
    const PLURAL: &'static str = "Categories";
    const PATH: &'static str = "Grades/Categories";

    fn id(&self) -> &u64 {
        &self.id
    }
}

use std::sync::Arc;

use serde::Deserialize;

use super::{Entity, Reference, Subject, User};
use crate::client::LibrusClient;
use crate::error::ClientError;

/// A class's recurring lesson of one subject with one teacher.
///
/// Grades and timetable entries point at lessons. Like notices, a lesson
/// does not resolve its references on fetch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Lesson {
    pub id: u64,
    pub teacher: Reference<User>,
    pub subject: Reference<Subject>,
}

impl Lesson {
    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_teacher(&self, client: &LibrusClient) -> Result<Arc<User>, ClientError> {
        client.resolve(&self.teacher).await
    }

    /// # Errors
    /// Propagates fetch errors.
    pub async fn fetch_subject(&self, client: &LibrusClient) -> Result<Arc<Subject>, ClientError> {
        client.resolve(&self.subject).await
    }
}

impl Entity for Lesson {
    type Id = u64;

    const NAME: &'static str = "Lesson";
    const SINGULAR: &'static str = "Lesson";
    const PLURAL: &'static str = "Lessons";
    const PATH: &'static str = "Lessons";

    fn id(&self) -> &u64 {
        &self.id
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn extra_reference_fields_are_ignored() {
        let lesson: Lesson = serde_json::from_str(
            r#"{
                "Id": 300,
                "Teacher": {"Id": 12, "Url": "https://api.librus.pl/3.0/Users/12"},
                "Subject": {"Id": 20, "Url": "https://api.librus.pl/3.0/Subjects/20"},
                "Class": {"Id": 4, "Url": "https://api.librus.pl/3.0/Classes/4"}
            }"#,
        )
        .unwrap();

        assert_eq!(*lesson.teacher.id(), 12);
        assert_eq!(*lesson.subject.id(), 20);
    }
}

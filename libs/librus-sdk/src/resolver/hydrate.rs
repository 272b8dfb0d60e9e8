//! Per-type reference resolution.
//!
//! | type          | after decode                                   |
//! |---------------|------------------------------------------------|
//! | User, Subject, Color | nothing (leaf)                          |
//! | `GradeCategory` | teacher (if any), then color                   |
//! | Grade         | category, then author and student, then subject |
//! | Lesson, Notice | nothing; references are resolved on demand    |
//!
//! Everything is awaited in order; nothing runs concurrently.

use async_trait::async_trait;

use super::cache::{EntityCache, EntityGraph};
use crate::client::LibrusClient;
use crate::error::ClientError;
use crate::models::{
    Color, Entity, Grade, GradeCategory, Lesson, Notice, Reference, Subject, User,
};

/// An [`Entity`] with a cache slot in the [`EntityGraph`] and rules for
/// resolving its outgoing references.
#[async_trait]
pub trait Resolvable: Entity {
    fn cache(graph: &EntityGraph) -> &EntityCache<Self>;

    /// Resolve the references of one freshly decoded record.
    async fn hydrate(&self, _client: &LibrusClient) -> Result<(), ClientError> {
        Ok(())
    }

    /// Resolve the references of a batch, one batched request per target type.
    async fn hydrate_batch(_items: &[Self], _client: &LibrusClient) -> Result<(), ClientError> {
        Ok(())
    }
}

impl Resolvable for User {
    fn cache(graph: &EntityGraph) -> &EntityCache<Self> {
        &graph.users
    }
}

impl Resolvable for Subject {
    fn cache(graph: &EntityGraph) -> &EntityCache<Self> {
        &graph.subjects
    }
}

impl Resolvable for Color {
    fn cache(graph: &EntityGraph) -> &EntityCache<Self> {
        &graph.colors
    }
}

impl Resolvable for Lesson {
    fn cache(graph: &EntityGraph) -> &EntityCache<Self> {
        &graph.lessons
    }
}

impl Resolvable for Notice {
    fn cache(graph: &EntityGraph) -> &EntityCache<Self> {
        &graph.notices
    }
}

#[async_trait]
impl Resolvable for GradeCategory {
    fn cache(graph: &EntityGraph) -> &EntityCache<Self> {
        &graph.grade_categories
    }

    async fn hydrate(&self, client: &LibrusClient) -> Result<(), ClientError> {
        if let Some(teacher) = &self.teacher {
            client.resolve(teacher).await?;
        }
        client.resolve(&self.color).await?;
        Ok(())
    }

    async fn hydrate_batch(items: &[Self], client: &LibrusClient) -> Result<(), ClientError> {
        let teachers: Vec<Reference<User>> =
            items.iter().filter_map(|c| c.teacher.clone()).collect();
        client.users().fetch_many(&teachers).await?;

        let colors: Vec<Reference<Color>> = items.iter().map(|c| c.color.clone()).collect();
        client.colors().fetch_many(&colors).await?;
        Ok(())
    }
}

#[async_trait]
impl Resolvable for Grade {
    fn cache(graph: &EntityGraph) -> &EntityCache<Self> {
        &graph.grades
    }

    async fn hydrate(&self, client: &LibrusClient) -> Result<(), ClientError> {
        client.resolve(&self.category).await?;
        client
            .users()
            .fetch_many(&[self.added_by.clone(), self.student.clone()])
            .await?;
        client.resolve(&self.subject).await?;
        Ok(())
    }

    async fn hydrate_batch(items: &[Self], client: &LibrusClient) -> Result<(), ClientError> {
        let categories: Vec<Reference<GradeCategory>> =
            items.iter().map(|g| g.category.clone()).collect();
        client.grade_categories().fetch_many(&categories).await?;

        let users: Vec<Reference<User>> = items
            .iter()
            .map(|g| g.added_by.clone())
            .chain(items.iter().map(|g| g.student.clone()))
            .collect();
        client.users().fetch_many(&users).await?;

        let subjects: Vec<Reference<Subject>> = items.iter().map(|g| g.subject.clone()).collect();
        client.subjects().fetch_many(&subjects).await?;
        Ok(())
    }
}

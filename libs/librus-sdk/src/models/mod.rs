//! Canonical records for the API's entity types.
//!
//! Each record is decoded straight from the API payload by serde, with the
//! wire's `PascalCase` names mapped onto snake-case fields. Cross-entity
//! pointers stay as [`Reference`] handles until resolved.

use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;

mod account;
mod color;
mod grade;
mod grade_category;
mod lesson;
mod notice;
mod reference;
mod subject;
mod user;

pub use account::AccountInfo;
pub use color::Color;
pub use grade::Grade;
pub use grade_category::GradeCategory;
pub use lesson::Lesson;
pub use notice::Notice;
pub use reference::{Reference, ResourceLink};
pub use subject::Subject;
pub use user::User;

/// Key of an entity within its own type's namespace.
pub trait EntityId:
    Clone + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + DeserializeOwned + 'static
{
}

impl EntityId for u64 {}
impl EntityId for String {}

/// An API resource with its own endpoint and cache.
pub trait Entity: DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static {
    type Id: EntityId;

    /// Name used in errors and logs.
    const NAME: &'static str;
    /// Envelope key of a single-entity response.
    const SINGULAR: &'static str;
    /// Envelope key of a batch or list response.
    const PLURAL: &'static str;
    /// Path below the API base.
    const PATH: &'static str;

    fn id(&self) -> &Self::Id;
}

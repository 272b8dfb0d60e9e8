use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer};

use super::Entity;

/// Typed ID handle pointing into another entity type's cache.
///
/// Deserializes from the API's `{"Id": .., "Url": ..}` reference objects. A
/// reference never owns its target; resolve it through
/// [`LibrusClient::resolve`](crate::LibrusClient::resolve) or read it from the
/// cache with [`LibrusClient::cached`](crate::LibrusClient::cached).
pub struct Reference<E: Entity> {
    id: E::Id,
    url: Option<String>,
    _target: PhantomData<fn() -> E>,
}

impl<E: Entity> Reference<E> {
    #[must_use]
    pub fn new(id: E::Id) -> Self {
        Self {
            id,
            url: None,
            _target: PhantomData,
        }
    }

    #[must_use]
    pub fn id(&self) -> &E::Id {
        &self.id
    }

    /// Canonical API URL of the target, as sent by the server.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl<E: Entity> Clone for Reference<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            url: self.url.clone(),
            _target: PhantomData,
        }
    }
}

impl<E: Entity> PartialEq for Reference<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: Entity> Eq for Reference<E> {}

impl<E: Entity> fmt::Debug for Reference<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reference<{}>({})", E::NAME, self.id)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawReference<I> {
    id: I,
    #[serde(default)]
    url: Option<String>,
}

impl<'de, E: Entity> Deserialize<'de> for Reference<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawReference::<E::Id>::deserialize(deserializer)?;
        Ok(Self {
            id: raw.id,
            url: raw.url,
            _target: PhantomData,
        })
    }
}

/// Link to a resource this client has no resolver for (grade comments,
/// improvements, resits).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceLink {
    pub id: u64,
    #[serde(default)]
    pub url: Option<String>,
}

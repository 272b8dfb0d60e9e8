use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use super::Resolvable;
use crate::models::{Color, Entity, Grade, GradeCategory, Lesson, Notice, Subject, User};

/// Process-lifetime map from ID to decoded record for one entity type.
///
/// Entries are replaced whole on re-fetch and never evicted. Concurrent
/// writers for the same ID race; the last insert wins.
pub struct EntityCache<E: Entity> {
    entries: DashMap<E::Id, Arc<E>>,
}

impl<E: Entity> Default for EntityCache<E> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<E: Entity> fmt::Debug for EntityCache<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCache")
            .field("entity", &E::NAME)
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<E: Entity> EntityCache<E> {
    #[must_use]
    pub fn get(&self, id: &E::Id) -> Option<Arc<E>> {
        self.entries.get(id).map(|entry| Arc::clone(entry.value()))
    }

    #[must_use]
    pub fn contains(&self, id: &E::Id) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn insert(&self, entity: Arc<E>) {
        self.entries.insert(entity.id().clone(), entity);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One cache per entity type. Records point at each other by ID only.
#[derive(Debug, Default)]
pub struct EntityGraph {
    pub(super) users: EntityCache<User>,
    pub(super) subjects: EntityCache<Subject>,
    pub(super) colors: EntityCache<Color>,
    pub(super) grade_categories: EntityCache<GradeCategory>,
    pub(super) grades: EntityCache<Grade>,
    pub(super) lessons: EntityCache<Lesson>,
    pub(super) notices: EntityCache<Notice>,
}

impl EntityGraph {
    #[must_use]
    pub fn cache<E: Resolvable>(&self) -> &EntityCache<E> {
        E::cache(self)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn color(id: u64, rgb: &str) -> Arc<Color> {
        Arc::new(Color {
            id,
            rgb: rgb.to_owned(),
            name: "c".to_owned(),
        })
    }

    #[test]
    fn insert_replaces_whole_record() {
        let cache = EntityCache::<Color>::default();
        cache.insert(color(1, "ff0000"));
        cache.insert(color(1, "00ff00"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1).unwrap().rgb, "00ff00");
    }

    #[test]
    fn graph_routes_to_per_type_caches() {
        let graph = EntityGraph::default();
        graph.cache::<Color>().insert(color(7, "000000"));

        assert!(graph.cache::<Color>().contains(&7));
        assert!(graph.cache::<User>().is_empty());
    }
}

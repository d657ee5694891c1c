//! Generic id-keyed storage for entities.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::entity::Entity;
use crate::id::SequentialId;

/// Id-keyed CRUD store for one entity type.
///
/// Lookups are linear scans; ordering is insertion order and nothing more.
pub trait Repository<T: Entity>: Send + Sync {
    /// Assign the next sequential id, append, and return the id.
    fn create(&self, entity: T) -> T::Id;

    /// True iff an entity with that id existed and was removed.
    fn remove(&self, id: T::Id) -> bool;

    /// Replace the stored entity with the same id. False if there is none.
    fn update(&self, entity: T) -> bool;

    fn find_by_id(&self, id: T::Id) -> Option<T>;

    /// Snapshot of every entity, in insertion order.
    fn list_all(&self) -> Vec<T>;

    fn count(&self) -> usize;

    fn exists(&self, id: T::Id) -> bool {
        self.find_by_id(id).is_some()
    }

    /// Linear-scan filter; the building block for every query.
    fn find_where(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<T> {
        self.list_all().into_iter().filter(|e| predicate(e)).collect()
    }
}

impl<T, S> Repository<T> for Arc<S>
where
    T: Entity,
    S: Repository<T> + ?Sized,
{
    fn create(&self, entity: T) -> T::Id {
        (**self).create(entity)
    }

    fn remove(&self, id: T::Id) -> bool {
        (**self).remove(id)
    }

    fn update(&self, entity: T) -> bool {
        (**self).update(entity)
    }

    fn find_by_id(&self, id: T::Id) -> Option<T> {
        (**self).find_by_id(id)
    }

    fn list_all(&self) -> Vec<T> {
        (**self).list_all()
    }

    fn count(&self) -> usize {
        (**self).count()
    }

    fn exists(&self, id: T::Id) -> bool {
        (**self).exists(id)
    }

    fn find_where(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<T> {
        (**self).find_where(predicate)
    }
}

#[derive(Debug)]
struct Inner<T> {
    entities: Vec<T>,
    next_id: u64,
}

/// In-memory repository backed by a `Vec`.
///
/// Ids start at 1 and are never reused, even after removal.
#[derive(Debug)]
pub struct InMemoryRepository<T> {
    inner: RwLock<Inner<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entities: Vec::new(),
                next_id: 1,
            }),
        }
    }

    // Every write is a single push/replace/remove, so a poisoned lock still
    // guards a consistent Vec.
    fn read(&self) -> RwLockReadGuard<'_, Inner<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Entity + Send + Sync,
{
    fn create(&self, mut entity: T) -> T::Id {
        let mut inner = self.write();
        let id = T::Id::from_raw(inner.next_id);
        inner.next_id += 1;
        entity.assign_id(id);
        inner.entities.push(entity);
        tracing::trace!(id = %id, "entity stored");
        id
    }

    fn remove(&self, id: T::Id) -> bool {
        let mut inner = self.write();
        match inner.entities.iter().position(|e| e.id() == id) {
            Some(idx) => {
                inner.entities.remove(idx);
                true
            }
            None => false,
        }
    }

    fn update(&self, entity: T) -> bool {
        let mut inner = self.write();
        match inner.entities.iter_mut().find(|e| e.id() == entity.id()) {
            Some(slot) => {
                *slot = entity;
                true
            }
            None => false,
        }
    }

    fn find_by_id(&self, id: T::Id) -> Option<T> {
        self.read().entities.iter().find(|e| e.id() == id).cloned()
    }

    fn list_all(&self) -> Vec<T> {
        self.read().entities.clone()
    }

    fn count(&self) -> usize {
        self.read().entities.len()
    }

    fn exists(&self, id: T::Id) -> bool {
        self.read().entities.iter().any(|e| e.id() == id)
    }

    fn find_where(&self, predicate: &dyn Fn(&T) -> bool) -> Vec<T> {
        self.read()
            .entities
            .iter()
            .filter(|e| predicate(e))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::FlowerId;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        id: FlowerId,
        label: &'static str,
    }

    impl Entity for Tag {
        type Id = FlowerId;

        fn id(&self) -> FlowerId {
            self.id
        }

        fn assign_id(&mut self, id: FlowerId) {
            self.id = id;
        }
    }

    fn tag(label: &'static str) -> Tag {
        Tag {
            id: FlowerId::default(),
            label,
        }
    }

    #[test]
    fn create_assigns_sequential_ids_from_one() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.create(tag("a")), FlowerId::from_raw(1));
        assert_eq!(repo.create(tag("b")), FlowerId::from_raw(2));
        assert_eq!(repo.count(), 2);
    }

    #[test]
    fn ids_are_never_reused_after_removal() {
        let repo = InMemoryRepository::new();
        let first = repo.create(tag("a"));
        assert!(repo.remove(first));
        assert!(!repo.remove(first));
        assert_eq!(repo.create(tag("b")), FlowerId::from_raw(2));
        assert!(!repo.exists(first));
    }

    #[test]
    fn update_replaces_only_matching_entity() {
        let repo = InMemoryRepository::new();
        let id = repo.create(tag("a"));
        assert!(repo.update(Tag { id, label: "z" }));
        assert_eq!(repo.find_by_id(id).map(|t| t.label), Some("z"));

        let missing = Tag {
            id: FlowerId::from_raw(99),
            label: "x",
        };
        assert!(!repo.update(missing));
    }

    #[test]
    fn list_all_is_a_copy_in_insertion_order() {
        let repo = InMemoryRepository::new();
        repo.create(tag("a"));
        repo.create(tag("b"));
        let mut listed = repo.list_all();
        listed.clear();
        let labels: Vec<_> = repo.list_all().into_iter().map(|t| t.label).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn shared_handle_sees_same_data() {
        let repo = Arc::new(InMemoryRepository::new());
        let handle = repo.clone();
        let id = handle.create(tag("a"));
        assert!(Repository::<Tag>::exists(&repo, id));
        assert_eq!(repo.find_where(&|t: &Tag| t.label == "a").len(), 1);
    }
}

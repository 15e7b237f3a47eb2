//! The entity store: owns every class and relationship and exposes the only
//! legal ways to change them.
//!
//! Each public mutation runs validate → mutate → cascade → notify to
//! completion before returning. A rejected call returns the error and leaves
//! the store untouched; observers hear only about calls that succeeded.
//!
//! The store is an ordinary owned value. Independent stores can coexist, and
//! an embedding that shares one between callers must hold a single lock
//! around each call.

mod classes;
mod members;
mod parameters;
mod relationships;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{EntityKind, ModelError, Result};
use crate::models::{ClassEntity, RelationshipEntity};
use crate::observer::{ModelChange, Observer, ObserverHub, ObserverId};

#[derive(Debug, Default)]
pub struct Store {
    /// Class name → class, in insertion order.
    classes: IndexMap<String, ClassEntity>,
    relationships: Vec<RelationshipEntity>,
    observers: ObserverHub,
    /// Set while a snapshot import is replaying operations.
    replaying: bool,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================================
    // Queries
    // ============================================================

    pub fn class(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.get(name)
    }

    /// Classes in store order.
    pub fn classes(&self) -> impl ExactSizeIterator<Item = &ClassEntity> {
        self.classes.values()
    }

    pub fn class_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Class names in alphabetical order, for listings.
    pub fn class_names_sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.class_names().collect();
        names.sort_unstable();
        names
    }

    pub fn relationships(&self) -> &[RelationshipEntity] {
        &self.relationships
    }

    pub fn relationship(&self, source: &str, destination: &str) -> Option<&RelationshipEntity> {
        self.relationships
            .iter()
            .find(|rel| rel.connects(source, destination))
    }

    /// Relationships with `class` as source or destination.
    pub fn relationships_of<'a>(
        &'a self,
        class: &'a str,
    ) -> impl Iterator<Item = &'a RelationshipEntity> + 'a {
        self.relationships.iter().filter(move |rel| rel.touches(class))
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.relationships.is_empty()
    }

    // ============================================================
    // Observers
    // ============================================================

    pub fn attach(&mut self, observer: Arc<dyn Observer>) -> ObserverId {
        self.observers.attach(observer)
    }

    pub fn detach(&mut self, id: ObserverId) -> bool {
        self.observers.detach(id)
    }

    pub fn observers(&self) -> &ObserverHub {
        &self.observers
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Discard every class and relationship. Observers stay attached.
    pub fn clear(&mut self) {
        self.classes.clear();
        self.relationships.clear();
        tracing::debug!("model cleared");
        self.notify(ModelChange::Clear);
    }

    fn class_mut(&mut self, name: &str) -> Result<&mut ClassEntity> {
        self.classes
            .get_mut(name)
            .ok_or_else(|| ModelError::not_found(EntityKind::Class, name))
    }

    fn notify(&self, change: ModelChange) {
        self.observers.notify(change, self.replaying);
    }

    /// Run `f` with the replay flag raised, restoring it afterwards.
    pub(crate) fn replay<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = std::mem::replace(&mut self.replaying, true);
        let result = f(self);
        self.replaying = previous;
        result
    }
}

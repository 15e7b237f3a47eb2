//! Observer hub notified after every successful store mutation.
//!
//! Observers share one capability, [`Observer::on_event`]. The store calls
//! [`ObserverHub::notify`] exactly once per successful operation and never
//! for a rejected one. Events issued while a snapshot is being replayed carry
//! `replay = true` so presentation layers can skip redundant redraws.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::models::RelationshipType;

/// What changed, with the names involved before and after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ModelChange {
    AddClass {
        name: String,
    },
    DeleteClass {
        name: String,
        /// Relationships removed by the cascade.
        relationships_removed: usize,
    },
    RenameClass {
        from: String,
        to: String,
    },
    AddField {
        class: String,
        name: String,
    },
    DeleteField {
        class: String,
        name: String,
    },
    RenameField {
        class: String,
        from: String,
        to: String,
    },
    AddMethod {
        class: String,
        name: String,
    },
    DeleteMethod {
        class: String,
        name: String,
    },
    RenameMethod {
        class: String,
        from: String,
        to: String,
    },
    AddParameter {
        class: String,
        method: String,
        name: String,
    },
    DeleteParameter {
        class: String,
        method: String,
        name: String,
    },
    RenameParameter {
        class: String,
        method: String,
        from: String,
        to: String,
    },
    ReplaceParameters {
        class: String,
        method: String,
        names: Vec<String>,
    },
    AddRelationship {
        source: String,
        destination: String,
        #[serde(rename = "type")]
        kind: RelationshipType,
    },
    DeleteRelationship {
        source: String,
        destination: String,
    },
    ChangeRelationshipType {
        source: String,
        destination: String,
        from: RelationshipType,
        to: RelationshipType,
    },
    /// The whole model was discarded, ahead of a snapshot import.
    Clear,
}

impl ModelChange {
    /// Kebab-case tag naming the operation.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddClass { .. } => "add-class",
            Self::DeleteClass { .. } => "delete-class",
            Self::RenameClass { .. } => "rename-class",
            Self::AddField { .. } => "add-field",
            Self::DeleteField { .. } => "delete-field",
            Self::RenameField { .. } => "rename-field",
            Self::AddMethod { .. } => "add-method",
            Self::DeleteMethod { .. } => "delete-method",
            Self::RenameMethod { .. } => "rename-method",
            Self::AddParameter { .. } => "add-parameter",
            Self::DeleteParameter { .. } => "delete-parameter",
            Self::RenameParameter { .. } => "rename-parameter",
            Self::ReplaceParameters { .. } => "replace-parameters",
            Self::AddRelationship { .. } => "add-relationship",
            Self::DeleteRelationship { .. } => "delete-relationship",
            Self::ChangeRelationshipType { .. } => "change-relationship-type",
            Self::Clear => "clear",
        }
    }
}

/// A change plus whether it was issued by snapshot replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelEvent {
    #[serde(flatten)]
    pub change: ModelChange,
    pub replay: bool,
}

/// Receives model events.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &ModelEvent);
}

/// Handle returned by [`ObserverHub::attach`], used to detach later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Ordered list of attached observers.
#[derive(Default)]
pub struct ObserverHub {
    next_id: u64,
    observers: Vec<(ObserverId, Arc<dyn Observer>)>,
}

impl ObserverHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, observer: Arc<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns `false` if the id was not attached.
    pub fn detach(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(attached, _)| *attached != id);
        self.observers.len() != before
    }

    /// Deliver one event to every observer, in attach order.
    pub fn notify(&self, change: ModelChange, replay: bool) {
        let event = ModelEvent { change, replay };
        for (_, observer) in &self.observers {
            observer.on_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl fmt::Debug for ObserverHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverHub")
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_event(&self, event: &ModelEvent) {
        if event.replay {
            tracing::trace!("model {} (replay): {:?}", event.change.kind(), event.change);
        } else {
            tracing::debug!("model {}: {:?}", event.change.kind(), event.change);
        }
    }
}

/// Bounded in-memory log of the most recent events.
#[derive(Debug)]
pub struct EventLog {
    capacity: usize,
    events: Mutex<VecDeque<ModelEvent>>,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Events oldest first.
    pub fn recent(&self) -> Vec<ModelEvent> {
        let events = self.events.lock().expect("event log lock poisoned");
        events.iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.events.lock().expect("event log lock poisoned").clear();
    }
}

impl Observer for EventLog {
    fn on_event(&self, event: &ModelEvent) {
        let mut events = self.events.lock().expect("event log lock poisoned");
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
    }
}

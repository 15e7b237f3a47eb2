//! Canonical, lossless export of a store and its replay back into one.
//!
//! The serialized form is:
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "Dog",
//!       "fields": [ { "name": "age" } ],
//!       "methods": [ { "name": "bark", "params": [ { "name": "volume" } ] } ] }
//!   ],
//!   "relationships": [
//!     { "source": "Dog", "destination": "Animal", "type": "inheritance" }
//!   ]
//! }
//! ```
//!
//! # Replay order
//!
//! Import re-issues ordinary store operations, and every add requires its
//! owner to exist already. Passes therefore run in a fixed order: for each
//! class, the class itself, then its fields, then each method followed by
//! that method's parameters; relationships only after every class is in.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::models::{ClassEntity, Named, RelationshipType};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub classes: Vec<ClassSnapshot>,
    pub relationships: Vec<RelationshipSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSnapshot {
    pub name: String,
    pub fields: Vec<NamedSnapshot>,
    pub methods: Vec<MethodSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSnapshot {
    pub name: String,
    pub params: Vec<NamedSnapshot>,
}

/// A field or parameter: just a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSnapshot {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    pub source: String,
    pub destination: String,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
}

impl NamedSnapshot {
    fn of(item: &impl Named) -> Self {
        Self {
            name: item.name().to_string(),
        }
    }
}

impl From<&ClassEntity> for ClassSnapshot {
    fn from(class: &ClassEntity) -> Self {
        Self {
            name: class.name().to_string(),
            fields: class.fields().iter().map(NamedSnapshot::of).collect(),
            methods: class
                .methods()
                .iter()
                .map(|method| MethodSnapshot {
                    name: method.name().to_string(),
                    params: method.parameters().iter().map(NamedSnapshot::of).collect(),
                })
                .collect(),
        }
    }
}

impl Snapshot {
    /// Parse a snapshot, reporting structural problems as
    /// [`ModelError::MalformedSnapshot`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ModelError::malformed)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(ModelError::malformed)
    }

    pub fn to_json_pretty(&self) -> String {
        // Plain strings and unit enums only; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.relationships.is_empty()
    }
}

impl Store {
    /// Export classes and relationships in store order.
    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            classes: self.classes().map(ClassSnapshot::from).collect(),
            relationships: self
                .relationships()
                .iter()
                .map(|rel| RelationshipSnapshot {
                    source: rel.source().to_string(),
                    destination: rel.destination().to_string(),
                    kind: rel.kind(),
                })
                .collect(),
        }
    }

    /// Replace the store's contents with `snapshot`.
    ///
    /// The store is cleared, then every entity is re-added through the
    /// normal operations with the replay flag raised. The first failing add
    /// aborts the import as [`ModelError::MalformedSnapshot`]; whatever was
    /// replayed before it stays in the store.
    pub fn import_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.replay(|store| {
            store.clear();
            store.replay_snapshot(snapshot)
        })
        .map_err(ModelError::malformed)?;

        tracing::debug!(
            "imported snapshot: {} classes, {} relationships",
            snapshot.classes.len(),
            snapshot.relationships.len()
        );
        Ok(())
    }

    /// Build a fresh store from a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self> {
        let mut store = Self::new();
        store.import_snapshot(snapshot)?;
        Ok(store)
    }

    fn replay_snapshot(&mut self, snapshot: &Snapshot) -> Result<()> {
        for class in &snapshot.classes {
            self.add_class(&class.name)?;
            for field in &class.fields {
                self.add_field(&class.name, &field.name)?;
            }
            for method in &class.methods {
                self.add_method(&class.name, &method.name)?;
                for param in &method.params {
                    self.add_parameter(&class.name, &method.name, &param.name)?;
                }
            }
        }
        for rel in &snapshot.relationships {
            self.add_relationship(&rel.source, &rel.destination, rel.kind)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_persisted_schema() {
        let json = r#"{
            "classes": [
                { "name": "Dog",
                  "fields": [ { "name": "age" } ],
                  "methods": [ { "name": "bark", "params": [ { "name": "volume" } ] } ] },
                { "name": "Animal", "fields": [], "methods": [] }
            ],
            "relationships": [
                { "source": "Dog", "destination": "Animal", "type": "inheritance" }
            ]
        }"#;

        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.classes.len(), 2);
        assert_eq!(snapshot.classes[0].methods[0].params[0].name, "volume");
        assert_eq!(snapshot.relationships[0].kind, RelationshipType::Inheritance);
    }

    #[test]
    fn missing_keys_are_malformed() {
        let err = Snapshot::from_json(r#"{ "classes": [ { "name": "Dog" } ] }"#).unwrap_err();
        assert!(matches!(err, ModelError::MalformedSnapshot(_)));
    }

    #[test]
    fn unknown_relationship_type_is_malformed() {
        let json = r#"{ "classes": [], "relationships": [
            { "source": "A", "destination": "B", "type": "friendship" } ] }"#;
        assert!(matches!(
            Snapshot::from_json(json),
            Err(ModelError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn serialized_keys_match_schema() {
        let snapshot = Snapshot {
            classes: vec![],
            relationships: vec![RelationshipSnapshot {
                source: "A".into(),
                destination: "B".into(),
                kind: RelationshipType::Realization,
            }],
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["relationships"][0]["type"], "realization");
    }
}

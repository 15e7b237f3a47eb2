//! Error taxonomy for model operations.
//!
//! Every store operation is both the point of detection and the point of
//! reporting: a rejected call returns one of these and leaves the store as it
//! was. Nothing here is raised by panicking.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result alias for model operations.
pub type Result<T, E = ModelError> = std::result::Result<T, E>;

/// What kind of entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Class,
    Field,
    Method,
    Parameter,
    Relationship,
    Snapshot,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Field => "field",
            Self::Method => "method",
            Self::Parameter => "parameter",
            Self::Relationship => "relationship",
            Self::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected model operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The referenced entity does not exist when it is required to.
    #[error("{kind} '{name}' does not exist")]
    NotFound { kind: EntityKind, name: String },

    /// The target name collides with an existing sibling.
    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: EntityKind, name: String },

    /// Relationship type outside the closed set.
    #[error(
        "'{0}' is not a relationship type (expected aggregation, composition, inheritance or realization)"
    )]
    InvalidType(String),

    /// Rename or type change to the value already held.
    #[error("{kind} '{name}' already has that value")]
    NoOpRejected { kind: EntityKind, name: String },

    /// A replacement parameter list repeats names.
    #[error("duplicate parameter names: {}", .0.join(", "))]
    DuplicateInput(Vec<String>),

    /// A relationship type change on a class related to itself.
    #[error("cannot change the type of a relationship from '{0}' to itself")]
    SelfRelationship(String),

    /// The name is reserved by the saved-model registry.
    #[error("'{0}' is a reserved name")]
    ReservedName(String),

    /// The snapshot could not be parsed or could not be replayed.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
}

/// Stable tag for each error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    InvalidType,
    NoOpRejected,
    DuplicateInput,
    SelfRelationship,
    ReservedName,
    MalformedSnapshot,
}

impl ModelError {
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn already_exists(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    pub fn no_op(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NoOpRejected {
            kind,
            name: name.into(),
        }
    }

    /// Wrap any failure met while parsing or replaying a snapshot.
    pub fn malformed(cause: impl fmt::Display) -> Self {
        Self::MalformedSnapshot(cause.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::InvalidType(_) => ErrorKind::InvalidType,
            Self::NoOpRejected { .. } => ErrorKind::NoOpRejected,
            Self::DuplicateInput(_) => ErrorKind::DuplicateInput,
            Self::SelfRelationship(_) => ErrorKind::SelfRelationship,
            Self::ReservedName(_) => ErrorKind::ReservedName,
            Self::MalformedSnapshot(_) => ErrorKind::MalformedSnapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_entity() {
        let err = ModelError::not_found(EntityKind::Field, "age");
        assert_eq!(err.to_string(), "field 'age' does not exist");

        let err = ModelError::already_exists(EntityKind::Class, "Dog");
        assert_eq!(err.to_string(), "class 'Dog' already exists");
    }

    #[test]
    fn duplicate_input_lists_every_repeat() {
        let err = ModelError::DuplicateInput(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "duplicate parameter names: a, b");
        assert_eq!(err.kind(), ErrorKind::DuplicateInput);
    }
}

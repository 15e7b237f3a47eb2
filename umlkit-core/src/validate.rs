//! Existence checks that gate every mutating store operation.
//!
//! One predicate, [`exists`], covers both directions: with
//! `should_exist = true` it demands the target is present (delete, rename
//! from), with `should_exist = false` it demands the target is absent (add,
//! rename to).

use crate::error::{EntityKind, ModelError, Result};
use crate::store::Store;

/// An entity addressed by its current name(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    Class(&'a str),
    Field {
        class: &'a str,
        field: &'a str,
    },
    Method {
        class: &'a str,
        method: &'a str,
    },
    Parameter {
        class: &'a str,
        method: &'a str,
        parameter: &'a str,
    },
    Relationship {
        source: &'a str,
        destination: &'a str,
    },
}

impl Target<'_> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Class(_) => EntityKind::Class,
            Self::Field { .. } => EntityKind::Field,
            Self::Method { .. } => EntityKind::Method,
            Self::Parameter { .. } => EntityKind::Parameter,
            Self::Relationship { .. } => EntityKind::Relationship,
        }
    }

    /// Name used in error messages.
    pub fn label(&self) -> String {
        match self {
            Self::Class(name) => (*name).to_string(),
            Self::Field { class, field } => format!("{class}.{field}"),
            Self::Method { class, method } => format!("{class}.{method}"),
            Self::Parameter {
                class,
                method,
                parameter,
            } => format!("{class}.{method}({parameter})"),
            Self::Relationship {
                source,
                destination,
            } => format!("{source} -> {destination}"),
        }
    }

    /// Whether the store currently holds this target. A member whose owner
    /// is missing is absent.
    pub fn is_present(&self, store: &Store) -> bool {
        match *self {
            Self::Class(name) => store.class(name).is_some(),
            Self::Field { class, field } => store.class(class).is_some_and(|c| c.has_field(field)),
            Self::Method { class, method } => {
                store.class(class).is_some_and(|c| c.has_method(method))
            }
            Self::Parameter {
                class,
                method,
                parameter,
            } => store
                .class(class)
                .and_then(|c| c.method(method))
                .is_some_and(|m| m.has_parameter(parameter)),
            Self::Relationship {
                source,
                destination,
            } => store.relationship(source, destination).is_some(),
        }
    }
}

/// Succeeds when the presence of `target` matches `should_exist`.
pub fn exists(store: &Store, target: Target<'_>, should_exist: bool) -> Result<()> {
    match (target.is_present(store), should_exist) {
        (false, true) => Err(ModelError::not_found(target.kind(), target.label())),
        (true, false) => Err(ModelError::already_exists(target.kind(), target.label())),
        _ => Ok(()),
    }
}

/// `current` must exist and `new` must not.
pub fn can_rename(store: &Store, current: Target<'_>, new: Target<'_>) -> Result<()> {
    exists(store, current, true)?;
    exists(store, new, false)
}

/// Repeated names in `names`, each reported once, in order of first repeat.
pub fn duplicates<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut seen: Vec<&str> = Vec::with_capacity(names.len());
    let mut repeated: Vec<String> = Vec::new();
    for name in names {
        let name = name.as_ref();
        if seen.contains(&name) {
            if !repeated.iter().any(|r| r == name) {
                repeated.push(name.to_string());
            }
        } else {
            seen.push(name);
        }
    }
    repeated
}

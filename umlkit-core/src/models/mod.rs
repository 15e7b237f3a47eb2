//! Entity types for the class model.
//!
//! # Core Concepts
//!
//! - [`ClassEntity`]: A named class owning ordered fields and methods.
//! - [`FieldEntity`]: A named attribute of a class.
//! - [`MethodEntity`]: A named operation of a class. Each method owns its
//!   ordered parameter list, so renaming or deleting a method carries its
//!   parameters along.
//! - [`ParameterEntity`]: A named parameter of a method.
//! - [`RelationshipEntity`]: A typed, directed edge between two classes.
//!
//! ## Persistence
//!
//! - [`SavedModel`]: An entry of the saved-model registry kept by
//!   [`Database`](crate::db::Database).
//!
//! Entities are only created, renamed and destroyed through
//! [`Store`](crate::store::Store) operations. Identity is the current name;
//! there is no separate stable id.

mod class;
mod member;
mod relationship;
mod saved;

pub use class::*;
pub use member::*;
pub use relationship::*;
pub use saved::*;

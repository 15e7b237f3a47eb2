//! Core of umlkit: an in-memory UML class model with consistency-checked
//! mutations, lossless snapshots and a saved-model registry.
//!
//! - [`models`]: entity types
//! - [`validate`]: existence checks gating every mutation
//! - [`store`]: the entity store and its cascades
//! - [`snapshot`]: export to and replay from the persisted schema
//! - [`observer`]: change notification
//! - [`db`]: saved-model registry backed by SQLite

pub mod db;
pub mod error;
pub mod models;
pub mod observer;
pub mod snapshot;
pub mod store;
pub mod validate;

pub use error::{EntityKind, ErrorKind, ModelError, Result};
pub use snapshot::Snapshot;
pub use store::Store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name the saved-model registry reserves for itself.
pub const RESERVED_SAVE_NAME: &str = "NAME_LIST";

/// An entry of the saved-model registry.
///
/// At most one entry is active at a time: the model most recently saved or
/// loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedModel {
    pub name: String,
    pub active: bool,
    pub saved_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The closed set of relationship types.
///
/// - `Aggregation`: the source holds the destination, which can outlive it
/// - `Composition`: the source owns the destination's lifetime
/// - `Inheritance`: the source extends the destination
/// - `Realization`: the source implements the destination
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    Aggregation,
    Composition,
    Inheritance,
    Realization,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        Self::Aggregation,
        Self::Composition,
        Self::Inheritance,
        Self::Realization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aggregation => "aggregation",
            Self::Composition => "composition",
            Self::Inheritance => "inheritance",
            Self::Realization => "realization",
        }
    }
}

impl FromStr for RelationshipType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aggregation" => Ok(Self::Aggregation),
            "composition" => Ok(Self::Composition),
            "inheritance" => Ok(Self::Inheritance),
            "realization" => Ok(Self::Realization),
            other => Err(ModelError::InvalidType(other.to_string())),
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed, typed edge between two classes, keyed by its ordered
/// `(source, destination)` pair. At most one exists per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipEntity {
    source: String,
    destination: String,
    #[serde(rename = "type")]
    kind: RelationshipType,
}

impl RelationshipEntity {
    pub(crate) fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        kind: RelationshipType,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            kind,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn kind(&self) -> RelationshipType {
        self.kind
    }

    pub fn connects(&self, source: &str, destination: &str) -> bool {
        self.source == source && self.destination == destination
    }

    pub fn touches(&self, class: &str) -> bool {
        self.source == class || self.destination == class
    }

    pub(crate) fn set_source(&mut self, source: String) {
        self.source = source;
    }

    pub(crate) fn set_destination(&mut self, destination: String) {
        self.destination = destination;
    }

    pub(crate) fn set_kind(&mut self, kind: RelationshipType) {
        self.kind = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_known_type() {
        for kind in RelationshipType::ALL {
            assert_eq!(kind.as_str().parse::<RelationshipType>(), Ok(kind));
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let err = "friendship".parse::<RelationshipType>().unwrap_err();
        assert_eq!(err, ModelError::InvalidType("friendship".to_string()));
    }

    #[test]
    fn type_is_case_sensitive() {
        assert!("Inheritance".parse::<RelationshipType>().is_err());
    }
}

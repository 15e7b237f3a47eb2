use crate::error::{EntityKind, ModelError, Result};
use crate::models::{RelationshipEntity, RelationshipType};
use crate::observer::ModelChange;
use crate::validate::{exists, Target};

use super::Store;

impl Store {
    /// Relate two existing classes. Only one relationship may exist per
    /// ordered `(source, destination)` pair, whatever its type. A class may be
    /// related to itself.
    pub fn add_relationship(
        &mut self,
        source: &str,
        destination: &str,
        kind: RelationshipType,
    ) -> Result<()> {
        self.check_endpoints(source, destination)?;
        exists(
            self,
            Target::Relationship {
                source,
                destination,
            },
            false,
        )?;

        self.relationships
            .push(RelationshipEntity::new(source, destination, kind));

        tracing::debug!("added {} relationship {} -> {}", kind, source, destination);
        self.notify(ModelChange::AddRelationship {
            source: source.to_string(),
            destination: destination.to_string(),
            kind,
        });
        Ok(())
    }

    pub fn delete_relationship(&mut self, source: &str, destination: &str) -> Result<()> {
        self.check_endpoints(source, destination)?;
        exists(
            self,
            Target::Relationship {
                source,
                destination,
            },
            true,
        )?;

        self.relationships
            .retain(|rel| !rel.connects(source, destination));

        tracing::debug!("deleted relationship {} -> {}", source, destination);
        self.notify(ModelChange::DeleteRelationship {
            source: source.to_string(),
            destination: destination.to_string(),
        });
        Ok(())
    }

    /// Change the type of an existing relationship.
    ///
    /// Rejects a class related to itself, and a type equal to the current one.
    pub fn change_relationship_type(
        &mut self,
        source: &str,
        destination: &str,
        kind: RelationshipType,
    ) -> Result<()> {
        self.check_endpoints(source, destination)?;
        if source == destination {
            return Err(ModelError::SelfRelationship(source.to_string()));
        }
        let label = format!("{source} -> {destination}");
        let rel = self
            .relationships
            .iter_mut()
            .find(|rel| rel.connects(source, destination))
            .ok_or_else(|| ModelError::not_found(EntityKind::Relationship, label.as_str()))?;
        let previous = rel.kind();
        if previous == kind {
            return Err(ModelError::no_op(EntityKind::Relationship, label));
        }
        rel.set_kind(kind);

        tracing::debug!("changed {} from {} to {}", label, previous, kind);
        self.notify(ModelChange::ChangeRelationshipType {
            source: source.to_string(),
            destination: destination.to_string(),
            from: previous,
            to: kind,
        });
        Ok(())
    }

    fn check_endpoints(&self, source: &str, destination: &str) -> Result<()> {
        exists(self, Target::Class(source), true)?;
        exists(self, Target::Class(destination), true)
    }
}

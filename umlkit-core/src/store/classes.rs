use crate::error::{EntityKind, ModelError, Result};
use crate::models::ClassEntity;
use crate::observer::ModelChange;
use crate::validate::{can_rename, exists, Target};

use super::Store;

impl Store {
    /// Append a new, empty class.
    pub fn add_class(&mut self, name: &str) -> Result<()> {
        exists(self, Target::Class(name), false)?;

        self.classes
            .insert(name.to_string(), ClassEntity::new(name));

        tracing::debug!("added class {}", name);
        self.notify(ModelChange::AddClass {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Remove a class with its members and every relationship touching it.
    pub fn delete_class(&mut self, name: &str) -> Result<()> {
        exists(self, Target::Class(name), true)?;

        self.classes.shift_remove(name);
        let before = self.relationships.len();
        self.relationships.retain(|rel| !rel.touches(name));
        let relationships_removed = before - self.relationships.len();

        tracing::debug!(
            "deleted class {} ({} relationships removed)",
            name,
            relationships_removed
        );
        self.notify(ModelChange::DeleteClass {
            name: name.to_string(),
            relationships_removed,
        });
        Ok(())
    }

    /// Rename a class in place and repoint every relationship that named it.
    pub fn rename_class(&mut self, old: &str, new: &str) -> Result<()> {
        if old == new {
            exists(self, Target::Class(old), true)?;
            return Err(ModelError::no_op(EntityKind::Class, old));
        }
        can_rename(self, Target::Class(old), Target::Class(new))?;

        if let Some((index, _, mut class)) = self.classes.shift_remove_full(old) {
            class.set_name(new.to_string());
            let (last, _) = self.classes.insert_full(new.to_string(), class);
            self.classes.move_index(last, index);
        }

        // A class related to itself has both ends repointed.
        for rel in &mut self.relationships {
            if rel.source() == old {
                rel.set_source(new.to_string());
            }
            if rel.destination() == old {
                rel.set_destination(new.to_string());
            }
        }

        tracing::debug!("renamed class {} to {}", old, new);
        self.notify(ModelChange::RenameClass {
            from: old.to_string(),
            to: new.to_string(),
        });
        Ok(())
    }
}

//! Fields and methods share one shape, parameterized by [`MemberKind`].

use crate::error::{EntityKind, ModelError, Result};
use crate::models::{find_mut, remove, FieldEntity, MemberKind, MethodEntity, Rename};
use crate::observer::ModelChange;
use crate::validate::{can_rename, exists, Target};

use super::Store;

fn target<'a>(kind: MemberKind, class: &'a str, name: &'a str) -> Target<'a> {
    match kind {
        MemberKind::Field => Target::Field { class, field: name },
        MemberKind::Method => Target::Method {
            class,
            method: name,
        },
    }
}

fn rename_in<T: Rename>(items: &mut [T], old: &str, new: &str) {
    if let Some(item) = find_mut(items, old) {
        item.set_name(new.to_string());
    }
}

impl Store {
    pub fn add_field(&mut self, class: &str, name: &str) -> Result<()> {
        self.add_member(MemberKind::Field, class, name)
    }

    pub fn delete_field(&mut self, class: &str, name: &str) -> Result<()> {
        self.delete_member(MemberKind::Field, class, name)
    }

    pub fn rename_field(&mut self, class: &str, old: &str, new: &str) -> Result<()> {
        self.rename_member(MemberKind::Field, class, old, new)
    }

    pub fn add_method(&mut self, class: &str, name: &str) -> Result<()> {
        self.add_member(MemberKind::Method, class, name)
    }

    /// Removes the method together with its parameter list.
    pub fn delete_method(&mut self, class: &str, name: &str) -> Result<()> {
        self.delete_member(MemberKind::Method, class, name)
    }

    /// The parameter list moves with the method.
    pub fn rename_method(&mut self, class: &str, old: &str, new: &str) -> Result<()> {
        self.rename_member(MemberKind::Method, class, old, new)
    }

    /// Append a member to the end of the class's field or method list.
    pub fn add_member(&mut self, kind: MemberKind, class: &str, name: &str) -> Result<()> {
        exists(self, Target::Class(class), true)?;
        exists(self, target(kind, class, name), false)?;

        let entity = self.class_mut(class)?;
        match kind {
            MemberKind::Field => entity.fields_mut().push(FieldEntity::new(name)),
            MemberKind::Method => entity.methods_mut().push(MethodEntity::new(name)),
        }

        tracing::debug!("added {:?} {}.{}", kind, class, name);
        let (class, name) = (class.to_string(), name.to_string());
        self.notify(match kind {
            MemberKind::Field => ModelChange::AddField { class, name },
            MemberKind::Method => ModelChange::AddMethod { class, name },
        });
        Ok(())
    }

    pub fn delete_member(&mut self, kind: MemberKind, class: &str, name: &str) -> Result<()> {
        exists(self, Target::Class(class), true)?;
        exists(self, target(kind, class, name), true)?;

        let entity = self.class_mut(class)?;
        match kind {
            MemberKind::Field => {
                remove(entity.fields_mut(), name);
            }
            MemberKind::Method => {
                remove(entity.methods_mut(), name);
            }
        }

        tracing::debug!("deleted {:?} {}.{}", kind, class, name);
        let (class, name) = (class.to_string(), name.to_string());
        self.notify(match kind {
            MemberKind::Field => ModelChange::DeleteField { class, name },
            MemberKind::Method => ModelChange::DeleteMethod { class, name },
        });
        Ok(())
    }

    pub fn rename_member(
        &mut self,
        kind: MemberKind,
        class: &str,
        old: &str,
        new: &str,
    ) -> Result<()> {
        exists(self, Target::Class(class), true)?;
        if old == new {
            exists(self, target(kind, class, old), true)?;
            let entity = match kind {
                MemberKind::Field => EntityKind::Field,
                MemberKind::Method => EntityKind::Method,
            };
            return Err(ModelError::no_op(entity, format!("{class}.{old}")));
        }
        can_rename(self, target(kind, class, old), target(kind, class, new))?;

        let entity = self.class_mut(class)?;
        match kind {
            MemberKind::Field => rename_in(entity.fields_mut(), old, new),
            MemberKind::Method => rename_in(entity.methods_mut(), old, new),
        }

        tracing::debug!("renamed {:?} {}.{} to {}", kind, class, old, new);
        let (class, from, to) = (class.to_string(), old.to_string(), new.to_string());
        self.notify(match kind {
            MemberKind::Field => ModelChange::RenameField { class, from, to },
            MemberKind::Method => ModelChange::RenameMethod { class, from, to },
        });
        Ok(())
    }
}

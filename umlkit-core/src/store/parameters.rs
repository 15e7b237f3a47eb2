use crate::error::{EntityKind, ModelError, Result};
use crate::models::{find_mut, remove, MethodEntity, ParameterEntity, Rename};
use crate::observer::ModelChange;
use crate::validate::{can_rename, duplicates, exists, Target};

use super::Store;

fn parameter<'a>(class: &'a str, method: &'a str, parameter: &'a str) -> Target<'a> {
    Target::Parameter {
        class,
        method,
        parameter,
    }
}

impl Store {
    /// Append a parameter to a method's list.
    pub fn add_parameter(&mut self, class: &str, method: &str, name: &str) -> Result<()> {
        self.check_method(class, method)?;
        exists(self, parameter(class, method, name), false)?;

        self.method_mut(class, method)?
            .parameters_mut()
            .push(ParameterEntity::new(name));

        tracing::debug!("added parameter {} to {}.{}", name, class, method);
        self.notify(ModelChange::AddParameter {
            class: class.to_string(),
            method: method.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn delete_parameter(&mut self, class: &str, method: &str, name: &str) -> Result<()> {
        self.check_method(class, method)?;
        exists(self, parameter(class, method, name), true)?;

        remove(self.method_mut(class, method)?.parameters_mut(), name);

        tracing::debug!("deleted parameter {} from {}.{}", name, class, method);
        self.notify(ModelChange::DeleteParameter {
            class: class.to_string(),
            method: method.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    pub fn rename_parameter(
        &mut self,
        class: &str,
        method: &str,
        old: &str,
        new: &str,
    ) -> Result<()> {
        self.check_method(class, method)?;
        if old == new {
            exists(self, parameter(class, method, old), true)?;
            return Err(ModelError::no_op(
                EntityKind::Parameter,
                format!("{class}.{method}({old})"),
            ));
        }
        can_rename(
            self,
            parameter(class, method, old),
            parameter(class, method, new),
        )?;

        if let Some(param) = find_mut(self.method_mut(class, method)?.parameters_mut(), old) {
            param.set_name(new.to_string());
        }

        tracing::debug!("renamed parameter {}.{}({}) to {}", class, method, old, new);
        self.notify(ModelChange::RenameParameter {
            class: class.to_string(),
            method: method.to_string(),
            from: old.to_string(),
            to: new.to_string(),
        });
        Ok(())
    }

    /// Discard a method's parameters and rebuild them from `names` in order.
    ///
    /// Rejected with [`ModelError::DuplicateInput`] listing every repeated
    /// name if `names` is not unique.
    pub fn replace_parameter_list<S: AsRef<str>>(
        &mut self,
        class: &str,
        method: &str,
        names: &[S],
    ) -> Result<()> {
        self.check_method(class, method)?;
        let repeated = duplicates(names);
        if !repeated.is_empty() {
            return Err(ModelError::DuplicateInput(repeated));
        }

        let names: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
        let params = self.method_mut(class, method)?.parameters_mut();
        params.clear();
        params.extend(names.iter().map(ParameterEntity::new));

        tracing::debug!("replaced parameters of {}.{}: {:?}", class, method, names);
        self.notify(ModelChange::ReplaceParameters {
            class: class.to_string(),
            method: method.to_string(),
            names,
        });
        Ok(())
    }

    fn check_method(&self, class: &str, method: &str) -> Result<()> {
        exists(self, Target::Class(class), true)?;
        exists(self, Target::Method { class, method }, true)
    }

    fn method_mut(&mut self, class: &str, method: &str) -> Result<&mut MethodEntity> {
        self.class_mut(class)?
            .method_mut(method)
            .ok_or_else(|| ModelError::not_found(EntityKind::Method, format!("{class}.{method}")))
    }
}

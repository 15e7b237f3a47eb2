use serde::Serialize;

use super::member::{find, find_mut};
use super::{FieldEntity, MethodEntity, ParameterEntity};

/// A UML class: a unique name plus ordered fields and methods.
///
/// Field names are unique within the class, as are method names. Parameter
/// names are unique within their method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassEntity {
    name: String,
    fields: Vec<FieldEntity>,
    methods: Vec<MethodEntity>,
}

impl ClassEntity {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldEntity] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodEntity] {
        &self.methods
    }

    pub fn field(&self, name: &str) -> Option<&FieldEntity> {
        find(&self.fields, name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodEntity> {
        find(&self.methods, name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Parameter list of a method, `None` if the method does not exist.
    pub fn parameters(&self, method: &str) -> Option<&[ParameterEntity]> {
        self.method(method).map(MethodEntity::parameters)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Vec<FieldEntity> {
        &mut self.fields
    }

    pub(crate) fn methods_mut(&mut self) -> &mut Vec<MethodEntity> {
        &mut self.methods
    }

    pub(crate) fn method_mut(&mut self, name: &str) -> Option<&mut MethodEntity> {
        find_mut(&mut self.methods, name)
    }
}

use serde::Serialize;

/// Anything identified by its current name.
pub trait Named {
    fn name(&self) -> &str;
}

/// Renaming is reserved to store operations.
pub(crate) trait Rename: Named {
    fn set_name(&mut self, name: String);
}

/// Which member list of a class an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
}

/// A field of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldEntity {
    name: String,
}

impl FieldEntity {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Named for FieldEntity {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Rename for FieldEntity {
    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// A parameter of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterEntity {
    name: String,
}

impl ParameterEntity {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Named for ParameterEntity {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Rename for ParameterEntity {
    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

/// A method of a class together with its ordered parameter list.
///
/// The parameter list lives inside the method rather than in a side table
/// keyed by method name, so a rename can never leave it behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodEntity {
    name: String,
    params: Vec<ParameterEntity>,
}

impl MethodEntity {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    pub fn parameters(&self) -> &[ParameterEntity] {
        &self.params
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterEntity> {
        find(&self.params, name)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    pub(crate) fn parameters_mut(&mut self) -> &mut Vec<ParameterEntity> {
        &mut self.params
    }
}

impl Named for MethodEntity {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Rename for MethodEntity {
    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

pub(crate) fn find<'a, T: Named>(items: &'a [T], name: &str) -> Option<&'a T> {
    items.iter().find(|item| item.name() == name)
}

pub(crate) fn find_mut<'a, T: Named>(items: &'a mut [T], name: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.name() == name)
}

/// Remove the named item, keeping the order of the rest.
pub(crate) fn remove<T: Named>(items: &mut Vec<T>, name: &str) -> Option<T> {
    let index = items.iter().position(|item| item.name() == name)?;
    Some(items.remove(index))
}

use crate::value::ScalarType;
use convert_case::{Case, Casing};
use std::borrow::Cow;

///
/// EntityFieldModel
/// Field metadata used by rendering and field resolution.
///

#[derive(Debug)]
pub struct EntityFieldModel {
    /// Caller-facing field name, as used in predicates and ordering.
    pub name: &'static str,
    /// Explicit wire name; defaults to the lowerCamelCase form of `name`.
    pub wire_name: Option<&'static str>,
    /// Declared wire type.
    pub kind: ScalarType,
}

impl EntityFieldModel {
    #[must_use]
    pub const fn new(name: &'static str, kind: ScalarType) -> Self {
        Self {
            name,
            wire_name: None,
            kind,
        }
    }

    /// Override the derived wire name.
    #[must_use]
    pub const fn renamed(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// Name the service knows this field by.
    #[must_use]
    pub fn wire_name(&self) -> Cow<'static, str> {
        match self.wire_name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.name.to_case(Case::Camel)),
        }
    }
}

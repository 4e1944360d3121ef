use crate::model::field::EntityFieldModel;

///
/// EntityModel
/// Static schema for one entity table, supplied by the caller.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Stable entity name, used in diagnostics and metrics.
    pub entity_name: &'static str,
    /// Field list; names must be unique.
    pub fields: &'static [EntityFieldModel],
}

impl EntityModel {
    #[must_use]
    pub const fn new(entity_name: &'static str, fields: &'static [EntityFieldModel]) -> Self {
        Self {
            entity_name,
            fields,
        }
    }

    /// Look up a field by its caller-facing name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&EntityFieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }
}

///
/// EntityKind
///
/// Binds a Rust entity type to its static model so queries can be
/// parameterized by the entity they target.
///

pub trait EntityKind {
    const MODEL: &'static EntityModel;
}

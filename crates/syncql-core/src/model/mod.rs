//! Schema collaborator contract: per-entity field names, wire names and
//! declared types consulted when resolving field accessors.

pub mod entity;
pub mod field;


// re-exports
pub use entity::{EntityKind, EntityModel};
pub use field::EntityFieldModel;

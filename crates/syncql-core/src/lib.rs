//! Core of syncql: typed predicates, the operator/function catalog, the
//! literal grammar, and composition of the wire query string.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod model;
pub mod obs;
pub mod query;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

// re-exports
pub use error::Error;

///
/// Prelude
///
/// Prelude contains only the vocabulary needed to describe a query.
/// Errors, config, and metrics stay behind their modules.
///

pub mod prelude {
    pub use crate::{
        model::{EntityFieldModel, EntityKind, EntityModel},
        query::{Expr, FieldRef, OrderDirection, QueryBuilder},
        value::{ScalarType, Value},
    };
}

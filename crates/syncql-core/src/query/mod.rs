//! Module: query
//! Responsibility: typed query descriptions and their compilation into the
//! wire query string.
//! Does not own: transport, response decoding, or entity reflection.

pub mod builder;
pub mod compose;
pub mod expr;

mod error;

// re-exports
pub use builder::{OrderDirection, OrderKey, QueryBuilder, QuerySpec};
pub use compose::compose;
pub use error::QueryError;
pub use expr::{Expr, ExprError, FieldRef, RenderError};

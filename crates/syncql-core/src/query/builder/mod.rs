//! Module: query::builder
//! Responsibility: fluent, value-typed query descriptions.
//! Does not own: rendering or parameter assembly.
//! Boundary: user-facing builder layer; only accumulates state.

mod order;
mod query;


// re-exports
pub use order::{OrderDirection, OrderKey};
pub use query::{QueryBuilder, QuerySpec};

//! Module: query::expr
//! Responsibility: typed predicate AST, operator/function catalog, and
//! rendering of predicates into wire sub-expressions.
//! Does not own: query parameters, ordering, or paging.
//! Boundary: everything that ends up after `$filter=`.

mod ast;
pub mod catalog;
mod field;
mod render;

#[cfg(test)]
mod tests;

// re-exports
pub use ast::{BinaryOp, Expr, ExprError, ExprKind, FieldAccess, UnaryOp};
pub use catalog::{Function, FunctionSpec, ParamKind, ReturnKind, UnaryForm};
pub use field::FieldRef;
pub use render::{RenderError, Renderer};

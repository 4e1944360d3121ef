use crate::{
    query::expr::{ExprError, RenderError},
    value::ScalarType,
};
use thiserror::Error as ThisError;

///
/// QueryError
///
/// Failures raised by builder calls and by composition. Composition never
/// produces partial output; any of these aborts the whole query string.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum QueryError {
    #[error("{0}")]
    Expr(#[from] ExprError),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("filter predicate must be bool, found {found}")]
    NonBooleanFilter { found: ScalarType },

    #[error("{param} must be non-negative, found {value}")]
    InvalidPageBound { param: &'static str, value: i64 },

    #[error("query parameter '{key}' is reserved or empty")]
    ReservedParameter { key: String },

    #[error("ordering has {count} keys; the configured maximum is {max}")]
    TooManyOrderKeys { count: usize, max: usize },

    #[error("$top={top} exceeds the configured maximum of {max}")]
    TopLimitExceeded { top: u64, max: u64 },
}

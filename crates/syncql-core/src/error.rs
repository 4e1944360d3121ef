use crate::{
    config::ConfigError,
    query::{QueryError, expr::ExprError, expr::RenderError},
};
use serde::Serialize;
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Flattened failure with a stable classification.
/// Every layer-specific error converts into this one at the crate edge.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<ExprError> for Error {
    fn from(err: ExprError) -> Self {
        Self::new(err.class(), ErrorOrigin::Expr, err.to_string())
    }
}

impl From<RenderError> for Error {
    fn from(err: RenderError) -> Self {
        Self::new(err.class(), ErrorOrigin::Render, err.to_string())
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Self::new(err.class(), err.origin(), err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Config, ErrorOrigin::Config, err.to_string())
    }
}

// ----------------------------------------------------------------------
// Classification
// ----------------------------------------------------------------------

impl ExprError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedFunction { .. } | Self::Literal(_) | Self::Arity { .. } => {
                ErrorClass::Unsupported
            }
            Self::TypeMismatch { .. }
            | Self::InvalidOperand { .. }
            | Self::ArgumentType { .. } => ErrorClass::TypeMismatch,
        }
    }
}

impl RenderError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownField { .. } | Self::FieldTypeMismatch { .. } => ErrorClass::Resolution,
            Self::Literal(_) => ErrorClass::Unsupported,
            Self::TooDeep { .. } => ErrorClass::Limit,
        }
    }
}

impl QueryError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Expr(inner) => inner.class(),
            Self::Render(inner) => inner.class(),
            Self::NonBooleanFilter { .. } => ErrorClass::TypeMismatch,
            Self::InvalidPageBound { .. } | Self::ReservedParameter { .. } => {
                ErrorClass::InvalidArgument
            }
            Self::TooManyOrderKeys { .. } | Self::TopLimitExceeded { .. } => ErrorClass::Limit,
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Expr(_) => ErrorOrigin::Expr,
            Self::Render(_) => ErrorOrigin::Render,
            _ => ErrorOrigin::Query,
        }
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Unsupported,
    TypeMismatch,
    InvalidArgument,
    Resolution,
    Limit,
    Config,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unsupported => "unsupported",
            Self::TypeMismatch => "type_mismatch",
            Self::InvalidArgument => "invalid_argument",
            Self::Resolution => "resolution",
            Self::Limit => "limit",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorOrigin {
    Expr,
    Render,
    Query,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Expr => "expr",
            Self::Render => "render",
            Self::Query => "query",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

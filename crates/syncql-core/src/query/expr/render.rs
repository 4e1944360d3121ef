use crate::{
    config::DEFAULT_MAX_FILTER_DEPTH,
    model::EntityModel,
    query::expr::{
        ast::{Expr, ExprKind, FieldAccess},
        catalog::{UnaryForm, unary_form},
    },
    value::{LiteralError, ScalarType, write_literal},
};
use std::borrow::Cow;
use thiserror::Error as ThisError;

///
/// RenderError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RenderError {
    #[error("entity '{entity}' has no field '{field}'")]
    UnknownField { entity: &'static str, field: String },

    #[error(
        "field '{field}' on entity '{entity}' is declared as {declared}, but the expression uses it as {used}"
    )]
    FieldTypeMismatch {
        entity: &'static str,
        field: String,
        declared: ScalarType,
        used: ScalarType,
    },

    #[error("unsupported literal: {0}")]
    Literal(#[from] LiteralError),

    #[error("filter expression exceeds the maximum depth of {max}")]
    TooDeep { max: usize },
}

///
/// Renderer
///
/// Renders a predicate AST into its wire sub-expression.
///
/// Parenthesization is fixed, not minimal:
/// - every binary node renders as `(<left> <op> <right>)`
/// - `not` always wraps its operand: `not(<operand>)`
/// - call arguments are comma-joined with no extra parentheses
///

#[derive(Clone, Copy, Debug)]
pub struct Renderer<'a> {
    model: &'a EntityModel,
    max_depth: usize,
}

impl<'a> Renderer<'a> {
    #[must_use]
    pub const fn new(model: &'a EntityModel) -> Self {
        Self {
            model,
            max_depth: DEFAULT_MAX_FILTER_DEPTH,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn render(&self, expr: &Expr) -> Result<String, RenderError> {
        let mut out = String::new();
        self.write(&mut out, expr, 1)?;

        Ok(out)
    }

    /// Resolve a caller-facing field name to its wire name.
    pub fn resolve_field(&self, name: &str) -> Result<Cow<'static, str>, RenderError> {
        self.model
            .field(name)
            .map(|field| field.wire_name())
            .ok_or_else(|| RenderError::UnknownField {
                entity: self.model.entity_name,
                field: name.to_string(),
            })
    }

    fn write(&self, out: &mut String, expr: &Expr, depth: usize) -> Result<(), RenderError> {
        if depth > self.max_depth {
            return Err(RenderError::TooDeep {
                max: self.max_depth,
            });
        }

        match expr.kind() {
            ExprKind::Constant(value) => write_literal(out, value)?,
            ExprKind::Field(access) => out.push_str(&self.resolve_access(access)?),
            ExprKind::Unary { op, operand } => match unary_form(*op) {
                UnaryForm::Call(name) => {
                    out.push_str(name);
                    out.push('(');
                    self.write(out, operand, depth + 1)?;
                    out.push(')');
                }
                UnaryForm::Prefix(token) => {
                    out.push_str(token);
                    self.write(out, operand, depth + 1)?;
                }
            },
            ExprKind::Binary { op, left, right } => {
                out.push('(');
                self.write(out, left, depth + 1)?;
                out.push(' ');
                out.push_str(op.token());
                out.push(' ');
                self.write(out, right, depth + 1)?;
                out.push(')');
            }
            ExprKind::Call { function, args } => {
                out.push_str(function.name());
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write(out, arg, depth + 1)?;
                }
                out.push(')');
            }
        }

        Ok(())
    }

    fn resolve_access(&self, access: &FieldAccess) -> Result<Cow<'static, str>, RenderError> {
        let field = self
            .model
            .field(&access.name)
            .ok_or_else(|| RenderError::UnknownField {
                entity: self.model.entity_name,
                field: access.name.clone(),
            })?;

        if field.kind != access.ty {
            return Err(RenderError::FieldTypeMismatch {
                entity: self.model.entity_name,
                field: access.name.clone(),
                declared: field.kind,
                used: access.ty,
            });
        }

        Ok(field.wire_name())
    }
}

use crate::{
    model::EntityFieldModel,
    query::expr::ast::{Expr, ExprError},
    value::ScalarType,
};

///
/// FieldRef
///
/// Zero-cost handle on a typed entity field, meant to be declared as a
/// `const` next to the entity. Converts into a field accessor and offers
/// the comparison shortcuts most predicates start from.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct FieldRef {
    name: &'static str,
    kind: ScalarType,
}

#[allow(clippy::should_implement_trait)]
impl FieldRef {
    #[must_use]
    pub const fn new(name: &'static str, kind: ScalarType) -> Self {
        Self { name, kind }
    }

    /// Handle for a field declared in an entity model.
    #[must_use]
    pub const fn from_model(field: &EntityFieldModel) -> Self {
        Self::new(field.name, field.kind)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn kind(self) -> ScalarType {
        self.kind
    }

    /// Field accessor node.
    #[must_use]
    pub fn expr(self) -> Expr {
        Expr::field(self.name, self.kind)
    }

    // ------------------------------------------------------------------
    // Comparison shortcuts
    // ------------------------------------------------------------------

    pub fn eq(self, value: impl Into<Expr>) -> Result<Expr, ExprError> {
        self.expr().eq(value)
    }

    pub fn ne(self, value: impl Into<Expr>) -> Result<Expr, ExprError> {
        self.expr().ne(value)
    }

    pub fn lt(self, value: impl Into<Expr>) -> Result<Expr, ExprError> {
        self.expr().lt(value)
    }

    pub fn lte(self, value: impl Into<Expr>) -> Result<Expr, ExprError> {
        self.expr().lte(value)
    }

    pub fn gt(self, value: impl Into<Expr>) -> Result<Expr, ExprError> {
        self.expr().gt(value)
    }

    pub fn gte(self, value: impl Into<Expr>) -> Result<Expr, ExprError> {
        self.expr().gte(value)
    }

    pub fn is_null(self) -> Result<Expr, ExprError> {
        self.expr().is_null()
    }

    pub fn is_not_null(self) -> Result<Expr, ExprError> {
        self.expr().is_not_null()
    }

    /// Negation of a boolean field: `not(<field>)`.
    pub fn not(self) -> Result<Expr, ExprError> {
        self.expr().not()
    }
}

// ----------------------------------------------------------------------
// Boundary traits
// ----------------------------------------------------------------------

impl From<FieldRef> for Expr {
    fn from(field: FieldRef) -> Self {
        field.expr()
    }
}

impl AsRef<str> for FieldRef {
    fn as_ref(&self) -> &str {
        self.name
    }
}

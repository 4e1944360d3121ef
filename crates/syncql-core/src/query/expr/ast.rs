use crate::{
    query::expr::catalog::{self, Function, ParamKind},
    value::{LiteralError, ScalarType, Value, check_literal},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use thiserror::Error as ThisError;

///
/// Predicate AST
///
/// Typed, immutable expression tree. Nodes are only built through the
/// validating constructors below, so every `Expr` in circulation is
/// well-typed and every constant has a wire encoding.
///
/// No structural simplification happens here: double negation, boolean
/// literal comparisons and redundant structure are preserved verbatim.
///

///
/// UnaryOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum UnaryOp {
    Not = 0,
    Negate,
}

///
/// BinaryOp
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum BinaryOp {
    And = 0,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Wire infix token.
    #[must_use]
    pub const fn token(self) -> &'static str {
        catalog::binary_token(self)
    }

    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }

    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge
        )
    }

    #[must_use]
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod
        )
    }
}

///
/// FieldAccess
///
/// Caller-facing field name plus the type the caller declared for it.
/// The wire name is resolved against the entity model at render time.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldAccess {
    pub name: String,
    pub ty: ScalarType,
}

///
/// ExprKind
///

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Constant(Value),
    Field(FieldAccess),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

///
/// ExprError
///
/// Construction-time failures. Nothing that fails here ever reaches
/// the renderer.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ExprError {
    #[error("unsupported function '{name}'")]
    UnsupportedFunction { name: String },

    #[error("unsupported literal: {0}")]
    Literal(#[from] LiteralError),

    #[error("operator '{op}' cannot combine {left} with {right}")]
    TypeMismatch {
        op: &'static str,
        left: ScalarType,
        right: ScalarType,
    },

    #[error("operator '{op}' does not accept a {ty} operand")]
    InvalidOperand { op: &'static str, ty: ScalarType },

    #[error("function '{function}' takes {min}..={max} arguments, found {found}")]
    Arity {
        function: &'static str,
        min: usize,
        max: usize,
        found: usize,
    },

    #[error("argument {index} of '{function}' must be {expected}, found {found}")]
    ArgumentType {
        function: &'static str,
        index: usize,
        expected: ParamKind,
        found: ScalarType,
    },
}

///
/// Expr
///

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    kind: ExprKind,
    ty: ScalarType,
}

impl Expr {
    // ------------------------------------------------------------------
    // Leaves
    // ------------------------------------------------------------------

    /// Constant leaf. Literal validity is checked when the constant is
    /// combined into a larger node or handed to a query.
    #[must_use]
    pub fn constant(value: impl Into<Value>) -> Self {
        let value = value.into();
        let ty = value.scalar_type();

        Self {
            kind: ExprKind::Constant(value),
            ty,
        }
    }

    #[must_use]
    pub const fn null() -> Self {
        Self {
            kind: ExprKind::Constant(Value::Null),
            ty: ScalarType::Null,
        }
    }

    /// Field accessor with the caller's declared type.
    #[must_use]
    pub fn field(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            kind: ExprKind::Field(FieldAccess {
                name: name.into(),
                ty,
            }),
            ty,
        }
    }

    // ------------------------------------------------------------------
    // Validating constructors
    // ------------------------------------------------------------------

    pub fn unary(op: UnaryOp, operand: impl Into<Self>) -> Result<Self, ExprError> {
        let operand = operand.into();
        operand.check_constant()?;

        let ty = match op {
            UnaryOp::Not if operand.ty == ScalarType::Bool => ScalarType::Bool,
            UnaryOp::Negate if operand.ty.is_numeric() => operand.ty,
            UnaryOp::Not => {
                return Err(ExprError::InvalidOperand {
                    op: "not",
                    ty: operand.ty,
                });
            }
            UnaryOp::Negate => {
                return Err(ExprError::InvalidOperand {
                    op: "-",
                    ty: operand.ty,
                });
            }
        };

        Ok(Self {
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
        })
    }

    pub fn binary(
        op: BinaryOp,
        left: impl Into<Self>,
        right: impl Into<Self>,
    ) -> Result<Self, ExprError> {
        let (left, right) = (left.into(), right.into());
        left.check_constant()?;
        right.check_constant()?;

        let (lt, rt) = (left.ty, right.ty);
        let mismatch = || ExprError::TypeMismatch {
            op: op.token(),
            left: lt,
            right: rt,
        };

        if op.is_logical() {
            if lt != ScalarType::Bool || rt != ScalarType::Bool {
                return Err(mismatch());
            }

            return Ok(Self::binary_node(op, left, right, ScalarType::Bool));
        }

        // Text addition is string concatenation on the wire.
        if op == BinaryOp::Add && lt == ScalarType::Text && rt == ScalarType::Text {
            return Self::call(Function::Concat, vec![left, right]);
        }

        if op.is_arithmetic() {
            let target = lt.widest_numeric(rt).ok_or_else(mismatch)?;

            return Ok(Self::binary_node(
                op,
                left.widen(target),
                right.widen(target),
                target,
            ));
        }

        let comparable = match (lt, rt) {
            (ScalarType::Null, ScalarType::Null) => false,
            (ScalarType::Null, _) | (_, ScalarType::Null) => op.is_equality(),
            _ if lt.is_numeric() && rt.is_numeric() => true,
            _ => lt == rt && (op.is_equality() || lt.is_orderable()),
        };
        if !comparable {
            return Err(mismatch());
        }

        let (left, right) = match lt.widest_numeric(rt) {
            Some(target) => (left.widen(target), right.widen(target)),
            None => (left, right),
        };

        Ok(Self::binary_node(op, left, right, ScalarType::Bool))
    }

    pub fn call(function: Function, args: Vec<Self>) -> Result<Self, ExprError> {
        let spec = function.spec();

        if args.len() < spec.required || args.len() > spec.params.len() {
            return Err(ExprError::Arity {
                function: spec.name,
                min: spec.required,
                max: spec.params.len(),
                found: args.len(),
            });
        }

        for (index, (arg, param)) in args.iter().zip(spec.params).enumerate() {
            arg.check_constant()?;
            if !param.accepts(arg.ty) {
                return Err(ExprError::ArgumentType {
                    function: spec.name,
                    index,
                    expected: *param,
                    found: arg.ty,
                });
            }
        }

        let first = args.first().map_or(ScalarType::Null, Self::ty);
        let ty = spec.returns.resolve(first);

        Ok(Self {
            kind: ExprKind::Call { function, args },
            ty,
        })
    }

    /// Call a catalog function by its wire name.
    pub fn call_named(name: &str, args: Vec<Self>) -> Result<Self, ExprError> {
        let function = Function::from_name(name).ok_or_else(|| ExprError::UnsupportedFunction {
            name: name.to_string(),
        })?;

        Self::call(function, args)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub const fn kind(&self) -> &ExprKind {
        &self.kind
    }

    /// Static result type.
    #[must_use]
    pub const fn ty(&self) -> ScalarType {
        self.ty
    }

    #[must_use]
    pub const fn is_boolean(&self) -> bool {
        matches!(self.ty, ScalarType::Bool)
    }

    /// Total number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + match &self.kind {
            ExprKind::Constant(_) | ExprKind::Field(_) => 0,
            ExprKind::Unary { operand, .. } => operand.node_count(),
            ExprKind::Binary { left, right, .. } => left.node_count() + right.node_count(),
            ExprKind::Call { args, .. } => args.iter().map(Self::node_count).sum(),
        }
    }

    /// Longest root-to-leaf path, counting nodes.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + match &self.kind {
            ExprKind::Constant(_) | ExprKind::Field(_) => 0,
            ExprKind::Unary { operand, .. } => operand.depth(),
            ExprKind::Binary { left, right, .. } => left.depth().max(right.depth()),
            ExprKind::Call { args, .. } => args.iter().map(Self::depth).max().unwrap_or(0),
        }
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    /// Constants must have a wire encoding before they join a tree.
    pub(crate) fn check_constant(&self) -> Result<(), ExprError> {
        if let ExprKind::Constant(value) = &self.kind {
            check_literal(value)?;
        }

        Ok(())
    }

    // Narrow constants convert; other nodes widen implicitly on the wire.
    fn widen(self, target: ScalarType) -> Self {
        match self.kind {
            ExprKind::Constant(value) if value.scalar_type() != target => {
                Self::constant(value.widen(target))
            }
            kind => Self { kind, ty: self.ty },
        }
    }

    fn binary_node(op: BinaryOp, left: Self, right: Self, ty: ScalarType) -> Self {
        Self {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        }
    }
}

// ----------------------------------------------------------------------
// Fluent DSL
// ----------------------------------------------------------------------

#[allow(clippy::should_implement_trait)]
impl Expr {
    pub fn eq(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Eq, self, rhs)
    }

    pub fn ne(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Ne, self, rhs)
    }

    pub fn lt(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Lt, self, rhs)
    }

    pub fn lte(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Le, self, rhs)
    }

    pub fn gt(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Gt, self, rhs)
    }

    pub fn gte(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Ge, self, rhs)
    }

    /// `(<self> eq null)`.
    pub fn is_null(self) -> Result<Self, ExprError> {
        self.eq(Self::null())
    }

    /// `(<self> ne null)`.
    pub fn is_not_null(self) -> Result<Self, ExprError> {
        self.ne(Self::null())
    }

    pub fn and(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::And, self, rhs)
    }

    pub fn or(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Or, self, rhs)
    }

    pub fn not(self) -> Result<Self, ExprError> {
        Self::unary(UnaryOp::Not, self)
    }

    pub fn neg(self) -> Result<Self, ExprError> {
        Self::unary(UnaryOp::Negate, self)
    }

    pub fn add(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Add, self, rhs)
    }

    pub fn sub(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Sub, self, rhs)
    }

    pub fn mul(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Mul, self, rhs)
    }

    pub fn div(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Div, self, rhs)
    }

    /// Remainder; renders as `mod`.
    pub fn rem(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::binary(BinaryOp::Mod, self, rhs)
    }

    // text

    pub fn ends_with(self, suffix: impl Into<Self>) -> Result<Self, ExprError> {
        Self::call(Function::EndsWith, vec![self, suffix.into()])
    }

    pub fn starts_with(self, prefix: impl Into<Self>) -> Result<Self, ExprError> {
        Self::call(Function::StartsWith, vec![self, prefix.into()])
    }

    pub fn contains(self, needle: impl Into<Self>) -> Result<Self, ExprError> {
        Self::call(Function::Contains, vec![self, needle.into()])
    }

    pub fn index_of(self, needle: impl Into<Self>) -> Result<Self, ExprError> {
        Self::call(Function::IndexOf, vec![self, needle.into()])
    }

    pub fn substring(self, start: impl Into<Self>) -> Result<Self, ExprError> {
        Self::call(Function::Substring, vec![self, start.into()])
    }

    pub fn substring_len(
        self,
        start: impl Into<Self>,
        len: impl Into<Self>,
    ) -> Result<Self, ExprError> {
        Self::call(Function::Substring, vec![self, start.into(), len.into()])
    }

    pub fn concat(self, rhs: impl Into<Self>) -> Result<Self, ExprError> {
        Self::call(Function::Concat, vec![self, rhs.into()])
    }

    pub fn to_lower(self) -> Result<Self, ExprError> {
        Self::call(Function::ToLower, vec![self])
    }

    pub fn to_upper(self) -> Result<Self, ExprError> {
        Self::call(Function::ToUpper, vec![self])
    }

    pub fn trim(self) -> Result<Self, ExprError> {
        Self::call(Function::Trim, vec![self])
    }

    pub fn length(self) -> Result<Self, ExprError> {
        Self::call(Function::Length, vec![self])
    }

    // timestamp parts

    pub fn day(self) -> Result<Self, ExprError> {
        Self::call(Function::Day, vec![self])
    }

    pub fn month(self) -> Result<Self, ExprError> {
        Self::call(Function::Month, vec![self])
    }

    pub fn year(self) -> Result<Self, ExprError> {
        Self::call(Function::Year, vec![self])
    }

    // rounding

    pub fn round(self) -> Result<Self, ExprError> {
        Self::call(Function::Round, vec![self])
    }

    pub fn ceiling(self) -> Result<Self, ExprError> {
        Self::call(Function::Ceiling, vec![self])
    }

    pub fn floor(self) -> Result<Self, ExprError> {
        Self::call(Function::Floor, vec![self])
    }
}

// ----------------------------------------------------------------------
// Boundary conversions
// ----------------------------------------------------------------------

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::constant(value)
    }
}

macro_rules! impl_expr_from_literal {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl From<$ty> for Expr {
                fn from(value: $ty) -> Self {
                    Self::constant(value)
                }
            }
        )*
    };
}

impl_expr_from_literal!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    &str,
    String,
    &String,
    char,
    NaiveDateTime,
    NaiveDate,
);

impl<Tz: TimeZone> From<DateTime<Tz>> for Expr {
    fn from(value: DateTime<Tz>) -> Self {
        Self::constant(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Expr {
    fn from(value: Option<T>) -> Self {
        Self::constant(value)
    }
}

//! Operator and function catalog.
//!
//! Fixed tables mapping every AST operation to its wire token. Each table is
//! indexed by the enum discriminant, so a lookup can never miss; the tests
//! pin table order against the enums.

use crate::{
    query::expr::ast::{BinaryOp, UnaryOp},
    value::ScalarType,
};
use derive_more::Display;

///
/// BINARY_OPERATORS
/// Infix tokens, rendered as `(<left> <token> <right>)`.
///

pub const BINARY_OPERATORS: [(BinaryOp, &str); 13] = [
    (BinaryOp::And, "and"),
    (BinaryOp::Or, "or"),
    (BinaryOp::Eq, "eq"),
    (BinaryOp::Ne, "ne"),
    (BinaryOp::Lt, "lt"),
    (BinaryOp::Le, "le"),
    (BinaryOp::Gt, "gt"),
    (BinaryOp::Ge, "ge"),
    (BinaryOp::Add, "add"),
    (BinaryOp::Sub, "sub"),
    (BinaryOp::Mul, "mul"),
    (BinaryOp::Div, "div"),
    (BinaryOp::Mod, "mod"),
];

///
/// UnaryForm
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnaryForm {
    /// Prefix function: `name(<operand>)`.
    Call(&'static str),
    /// Prefix sign: `<token><operand>`.
    Prefix(&'static str),
}

pub const UNARY_OPERATORS: [(UnaryOp, UnaryForm); 2] = [
    (UnaryOp::Not, UnaryForm::Call("not")),
    (UnaryOp::Negate, UnaryForm::Prefix("-")),
];

///
/// Function
///
/// Every prefix function the service understands.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Function {
    EndsWith = 0,
    StartsWith,
    Contains,
    IndexOf,
    Substring,
    Concat,
    ToLower,
    ToUpper,
    Trim,
    Length,
    Day,
    Month,
    Year,
    Round,
    Ceiling,
    Floor,
}

impl Function {
    #[must_use]
    pub fn spec(self) -> &'static FunctionSpec {
        &FUNCTIONS[self as usize]
    }

    /// Wire name of the function.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Resolve a wire function name; `None` for anything outside the catalog.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        FUNCTIONS
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.function)
    }
}

///
/// ParamKind
/// Accepted argument type for one function parameter.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ParamKind {
    #[display("text")]
    Text,
    #[display("int")]
    Int,
    #[display("numeric")]
    Numeric,
    #[display("timestamp")]
    Timestamp,
}

impl ParamKind {
    #[must_use]
    pub const fn accepts(self, ty: ScalarType) -> bool {
        match self {
            Self::Text => matches!(ty, ScalarType::Text),
            Self::Int => matches!(ty, ScalarType::Int),
            Self::Numeric => ty.is_numeric(),
            Self::Timestamp => matches!(ty, ScalarType::Timestamp),
        }
    }
}

///
/// ReturnKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReturnKind {
    Fixed(ScalarType),
    /// Rounding family: single precision stays single, everything else is double.
    Rounded,
}

impl ReturnKind {
    #[must_use]
    pub const fn resolve(self, first_arg: ScalarType) -> ScalarType {
        match self {
            Self::Fixed(ty) => ty,
            Self::Rounded => match first_arg {
                ScalarType::Float32 => ScalarType::Float32,
                _ => ScalarType::Float64,
            },
        }
    }
}

///
/// FunctionSpec
///

#[derive(Debug)]
pub struct FunctionSpec {
    pub function: Function,
    pub name: &'static str,
    pub params: &'static [ParamKind],
    /// Leading parameters that must be supplied; the rest are optional.
    pub required: usize,
    pub returns: ReturnKind,
}

const TEXT: &[ParamKind] = &[ParamKind::Text];
const TEXT_TEXT: &[ParamKind] = &[ParamKind::Text, ParamKind::Text];
const TIMESTAMP: &[ParamKind] = &[ParamKind::Timestamp];
const NUMERIC: &[ParamKind] = &[ParamKind::Numeric];

const fn fixed_arity(
    function: Function,
    name: &'static str,
    params: &'static [ParamKind],
    returns: ReturnKind,
) -> FunctionSpec {
    FunctionSpec {
        function,
        name,
        params,
        required: params.len(),
        returns,
    }
}

pub static FUNCTIONS: [FunctionSpec; 16] = [
    fixed_arity(
        Function::EndsWith,
        "endswith",
        TEXT_TEXT,
        ReturnKind::Fixed(ScalarType::Bool),
    ),
    fixed_arity(
        Function::StartsWith,
        "startswith",
        TEXT_TEXT,
        ReturnKind::Fixed(ScalarType::Bool),
    ),
    fixed_arity(
        Function::Contains,
        "contains",
        TEXT_TEXT,
        ReturnKind::Fixed(ScalarType::Bool),
    ),
    fixed_arity(
        Function::IndexOf,
        "indexof",
        TEXT_TEXT,
        ReturnKind::Fixed(ScalarType::Int),
    ),
    FunctionSpec {
        function: Function::Substring,
        name: "substring",
        params: &[ParamKind::Text, ParamKind::Int, ParamKind::Int],
        required: 2,
        returns: ReturnKind::Fixed(ScalarType::Text),
    },
    fixed_arity(
        Function::Concat,
        "concat",
        TEXT_TEXT,
        ReturnKind::Fixed(ScalarType::Text),
    ),
    fixed_arity(
        Function::ToLower,
        "tolower",
        TEXT,
        ReturnKind::Fixed(ScalarType::Text),
    ),
    fixed_arity(
        Function::ToUpper,
        "toupper",
        TEXT,
        ReturnKind::Fixed(ScalarType::Text),
    ),
    fixed_arity(Function::Trim, "trim", TEXT, ReturnKind::Fixed(ScalarType::Text)),
    fixed_arity(
        Function::Length,
        "length",
        TEXT,
        ReturnKind::Fixed(ScalarType::Int),
    ),
    fixed_arity(
        Function::Day,
        "day",
        TIMESTAMP,
        ReturnKind::Fixed(ScalarType::Int),
    ),
    fixed_arity(
        Function::Month,
        "month",
        TIMESTAMP,
        ReturnKind::Fixed(ScalarType::Int),
    ),
    fixed_arity(
        Function::Year,
        "year",
        TIMESTAMP,
        ReturnKind::Fixed(ScalarType::Int),
    ),
    fixed_arity(Function::Round, "round", NUMERIC, ReturnKind::Rounded),
    fixed_arity(Function::Ceiling, "ceiling", NUMERIC, ReturnKind::Rounded),
    fixed_arity(Function::Floor, "floor", NUMERIC, ReturnKind::Rounded),
];

/// Infix token for a binary operator.
#[must_use]
pub const fn binary_token(op: BinaryOp) -> &'static str {
    BINARY_OPERATORS[op as usize].1
}

/// Rendering form for a unary operator.
#[must_use]
pub const fn unary_form(op: UnaryOp) -> UnaryForm {
    UNARY_OPERATORS[op as usize].1
}

mod literal;


use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use derive_more::Display;

// re-exports
pub use literal::{LiteralError, check_literal, format_literal, write_literal};

///
/// ScalarType
///
/// Static result type of a predicate node, and the declared type of an
/// entity field. `Null` only ever types a bare `null` constant.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ScalarType {
    #[display("null")]
    Null,
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("float32")]
    Float32,
    #[display("float64")]
    Float64,
    #[display("text")]
    Text,
    #[display("timestamp")]
    Timestamp,
}

impl ScalarType {
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float32 | Self::Float64)
    }

    /// Types that support `lt`/`le`/`gt`/`ge`.
    #[must_use]
    pub const fn is_orderable(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Float32 | Self::Float64 | Self::Text | Self::Timestamp
        )
    }

    /// Widest numeric type of the pair, or `None` unless both are numeric.
    ///
    /// Width order is `Int < Float32 < Float64`.
    #[must_use]
    pub const fn widest_numeric(self, other: Self) -> Option<Self> {
        match (self.numeric_rank(), other.numeric_rank()) {
            (Some(a), Some(b)) => {
                if a >= b {
                    Some(self)
                } else {
                    Some(other)
                }
            }
            _ => None,
        }
    }

    const fn numeric_rank(self) -> Option<u8> {
        match self {
            Self::Int => Some(0),
            Self::Float32 => Some(1),
            Self::Float64 => Some(2),
            _ => None,
        }
    }
}

///
/// Value
///
/// A typed constant that can appear in a predicate.
///
/// Timestamps are always held as UTC instants; every zone-aware or naive
/// source converts on the way in so equal instants compare and render equal.
///

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    #[must_use]
    pub const fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Null => ScalarType::Null,
            Self::Bool(_) => ScalarType::Bool,
            Self::Int(_) => ScalarType::Int,
            Self::Float32(_) => ScalarType::Float32,
            Self::Float64(_) => ScalarType::Float64,
            Self::Text(_) => ScalarType::Text,
            Self::Timestamp(_) => ScalarType::Timestamp,
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert a numeric constant to a wider numeric type.
    ///
    /// Values that are not narrower numerics are returned unchanged.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn widen(self, target: ScalarType) -> Self {
        match (self, target) {
            (Self::Int(n), ScalarType::Float32) => Self::Float32(n as f32),
            (Self::Int(n), ScalarType::Float64) => Self::Float64(n as f64),
            (Self::Float32(v), ScalarType::Float64) => Self::Float64(f64::from(v)),
            (value, _) => value,
        }
    }
}

// ----------------------------------------------------------------------
// Conversions from native Rust types
// ----------------------------------------------------------------------

macro_rules! impl_from_int {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Self::Text(value.to_string())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Timestamp(value.with_timezone(&Utc))
    }
}

/// Naive calendar timestamps are read as UTC wall-clock time.
impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Timestamp(value.and_utc())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::Timestamp(value.and_time(NaiveTime::MIN).and_utc())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

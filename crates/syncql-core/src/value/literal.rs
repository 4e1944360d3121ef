//! Wire literal grammar for predicate constants.
//!
//! Every function here is byte-exact against the service grammar; the
//! service accepts no alternate spellings.

use crate::value::Value;
use chrono::{Datelike, SecondsFormat};
use std::fmt::Write as _;
use thiserror::Error as ThisError;

/// Type name used inside timestamp casts.
pub(crate) const TIMESTAMP_EDM_TYPE: &str = "Edm.DateTimeOffset";

///
/// LiteralError
///
/// Constants that have no encoding in the wire grammar.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum LiteralError {
    #[error("non-finite floating point literal '{value}' has no wire encoding")]
    NonFiniteFloat { value: String },

    #[error("timestamp '{value}' is outside the four-digit year range")]
    TimestampOutOfRange { value: String },
}

/// Reject constants the formatter cannot encode.
pub fn check_literal(value: &Value) -> Result<(), LiteralError> {
    match value {
        Value::Float32(v) if !v.is_finite() => Err(LiteralError::NonFiniteFloat {
            value: v.to_string(),
        }),
        Value::Float64(v) if !v.is_finite() => Err(LiteralError::NonFiniteFloat {
            value: v.to_string(),
        }),
        Value::Timestamp(ts) if !(0..=9999).contains(&ts.year()) => {
            Err(LiteralError::TimestampOutOfRange {
                value: ts.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Format one constant as a standalone wire token.
pub fn format_literal(value: &Value) -> Result<String, LiteralError> {
    let mut out = String::new();
    write_literal(&mut out, value)?;

    Ok(out)
}

/// Append the wire token for `value` to `out`.
///
/// Constants without a wire encoding fail before anything is written.
pub fn write_literal(out: &mut String, value: &Value) -> Result<(), LiteralError> {
    check_literal(value)?;

    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Float32(v) => {
            write_float_digits(out, &v.to_string());
            out.push('f');
        }
        Value::Float64(v) => write_float_digits(out, &v.to_string()),
        Value::Text(text) => write_quoted(out, text),
        Value::Timestamp(ts) => {
            let _ = write!(
                out,
                "cast({},{TIMESTAMP_EDM_TYPE})",
                ts.to_rfc3339_opts(SecondsFormat::Millis, true)
            );
        }
    }

    Ok(())
}

// Shortest round-trip digits, always with a fractional part.
fn write_float_digits(out: &mut String, digits: &str) {
    out.push_str(digits);
    if !digits.contains('.') {
        out.push_str(".0");
    }
}

fn write_quoted(out: &mut String, text: &str) {
    out.reserve(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
}

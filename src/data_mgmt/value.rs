use std::fmt;

use serde::{Deserialize, Serialize};

/// Typed scalar carried in a source tuple
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RtValue {
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for RtValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RtValue::Int(i) => write!(f, "{i}"),
            RtValue::Float(x) => write!(f, "{x}"),
            RtValue::String(s) => f.write_str(s),
        }
    }
}

/// Which rule of the inference matched
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Float,
    Boolean,
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Boolean => "bool",
            ValueKind::String => "string",
        };
        f.write_str(name)
    }
}

/// Infer a typed value from the textual value of a reading
///
/// Rules are tried in order and the first match wins: integer, 32-bit float,
/// boolean literal, string. Booleans are recognized but handed back as their
/// original text, since downstream SQL comparison of bools is unreliable.
pub fn infer_value(raw: &str) -> (ValueKind, RtValue) {
    if let Ok(i) = raw.parse::<i64>() {
        return (ValueKind::Integer, RtValue::Int(i));
    }

    if let Some(x) = parse_f32(raw) {
        return (ValueKind::Float, RtValue::Float(f64::from(x)));
    }

    if is_bool_literal(raw) {
        return (ValueKind::Boolean, RtValue::String(raw.to_string()));
    }

    (ValueKind::String, RtValue::String(raw.to_string()))
}

/// Parse with single precision; out-of-range text is not a float
///
/// Hexadecimal float text such as `0x1p-2` is not recognized and ends up a string.
fn parse_f32(raw: &str) -> Option<f32> {
    let x = raw.parse::<f32>().ok()?;
    if x.is_infinite() && !is_infinity_literal(raw) {
        return None;
    }
    Some(x)
}

fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn is_bool_literal(raw: &str) -> bool {
    matches!(
        raw,
        "1" | "t" | "T" | "TRUE" | "true" | "True" | "0" | "f" | "F" | "FALSE" | "false" | "False"
    )
}

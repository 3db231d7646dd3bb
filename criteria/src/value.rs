use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Declared type of a filterable field, resolved once when metadata is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Text,
    Int32,
    Int64,
    Float32,
    Float64,
    Bool,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("cannot convert {literal:?} to {type_tag:?}")]
pub struct CoercionError {
    pub literal: String,
    pub type_tag: TypeTag,
}

impl TypeTag {
    /// Name reported by field discovery.
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeTag::Text => "String",
            TypeTag::Int32 => "i32",
            TypeTag::Int64 => "i64",
            TypeTag::Float32 => "f32",
            TypeTag::Float64 => "f64",
            TypeTag::Bool => "bool",
        }
    }

    pub fn is_numeric(&self) -> bool { !matches!(self, TypeTag::Text | TypeTag::Bool) }

    pub fn coerce(&self, literal: &str) -> Result<Value, CoercionError> {
        let trimmed = literal.trim();
        let err = || CoercionError { literal: literal.to_string(), type_tag: *self };
        Ok(match self {
            TypeTag::Text => Value::String(literal.to_string()),
            TypeTag::Int32 => Value::I32(trimmed.parse().map_err(|_| err())?),
            TypeTag::Int64 => Value::I64(trimmed.parse().map_err(|_| err())?),
            TypeTag::Float32 => Value::F32(trimmed.parse().map_err(|_| err())?),
            TypeTag::Float64 => Value::F64(trimmed.parse().map_err(|_| err())?),
            TypeTag::Bool => match trimmed {
                t if t.eq_ignore_ascii_case("true") => Value::Bool(true),
                f if f.eq_ignore_ascii_case("false") => Value::Bool(false),
                _ => return Err(err()),
            },
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.type_name()) }
}

/// A field value read off a record, or a literal after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    String(String),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl Value {
    pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

    /// Numeric view; strings are parsed, booleans and null have none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I32(i) => Some(*i as f64),
            Value::I64(i) => Some(*i as f64),
            Value::F32(f) => Some(*f as f64),
            Value::F64(f) => Some(*f),
            Value::String(s) => parse_number(s),
            Value::Null | Value::Bool(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool { matches!(self, Value::I32(_) | Value::I64(_) | Value::F32(_) | Value::F64(_)) }

    /// Text used for equality, containment and lexicographic fallbacks. `None` for null.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(s) => f.write_str(s),
            Value::I32(i) => write!(f, "{}", i),
            Value::I64(i) => write!(f, "{}", i),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

pub(crate) fn parse_number(s: &str) -> Option<f64> { s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()) }

/// Numeric comparison when both sides are numbers, otherwise lexicographic.
pub(crate) fn compare_with_fallback(left: &str, right: &str) -> Ordering {
    if let (Ok(l), Ok(r)) = (left.trim().parse::<i64>(), right.trim().parse::<i64>()) {
        return l.cmp(&r);
    }
    match (parse_number(left), parse_number(right)) {
        (Some(l), Some(r)) => l.partial_cmp(&r).unwrap_or(Ordering::Equal),
        _ => left.cmp(right),
    }
}

/// Split a `min:max` range literal at its first colon. Both bounds must be non-blank.
pub(crate) fn split_range(literal: &str) -> Option<(&str, &str)> {
    let (min, max) = literal.split_once(':')?;
    let (min, max) = (min.trim(), max.trim());
    if min.is_empty() || max.is_empty() {
        return None;
    }
    Some((min, max))
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self { Value::$variant(value.into()) }
            }
        )*
    };
}

value_from! {
    String => String,
    &str => String,
    i8 => I32,
    i16 => I32,
    i32 => I32,
    u8 => I32,
    u16 => I32,
    i64 => I64,
    u32 => I64,
    f32 => F32,
    f64 => F64,
    bool => Bool,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

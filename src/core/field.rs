//! Field values for structured log records
//!
//! This module provides:
//! - `Value`: borrowed value passed at a call site, no allocation
//! - `FieldValue`: owned value, used for default fields and configuration
//! - `Field`: an owned key/value pair

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Value placed after a key that has no partner in an odd-length field list
pub const MISSING_VALUE: &str = "!MISSING";

/// A single entry of a call-site field list.
///
/// Call sites pass a flat slice alternating keys and values; every entry
/// is converted to a `Value` at the facade boundary so that the encoder
/// only ever matches on this closed set of kinds.
#[derive(Clone, Copy)]
pub enum Value<'a> {
    Str(&'a str),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    /// Rendered through the error's `Display` text
    Error(&'a (dyn Error + 'a)),
    /// Fallback for arbitrary values with a textual form
    Display(&'a (dyn fmt::Display + 'a)),
    /// Fallback for arbitrary structured values
    Debug(&'a (dyn fmt::Debug + 'a)),
}

impl<'a> Value<'a> {
    pub fn error<E: Error + 'a>(err: &'a E) -> Self {
        Value::Error(err)
    }

    pub fn display<T: fmt::Display + 'a>(value: &'a T) -> Self {
        Value::Display(value)
    }

    pub fn debug<T: fmt::Debug + 'a>(value: &'a T) -> Self {
        Value::Debug(value)
    }

    /// Copy this value into an owned `FieldValue`
    pub fn to_field_value(&self) -> FieldValue {
        match *self {
            Value::Str(s) => FieldValue::String(s.to_string()),
            Value::Int(i) => FieldValue::Int(i),
            Value::Uint(u) => FieldValue::Uint(u),
            Value::Float(f) => FieldValue::Float(f),
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Error(e) => FieldValue::Error(e.to_string()),
            Value::Display(d) => FieldValue::Text(d.to_string()),
            Value::Debug(d) => FieldValue::Text(format!("{:?}", d)),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Error(e) => write!(f, "{}", e),
            Value::Display(d) => write!(f, "{}", d),
            Value::Debug(d) => write!(f, "{:?}", d),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Value::Float(fl) => f.debug_tuple("Float").field(fl).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Error(e) => f.debug_tuple("Error").field(&e.to_string()).finish(),
            Value::Display(d) => f.debug_tuple("Display").field(&d.to_string()).finish(),
            Value::Debug(d) => f.debug_tuple("Debug").field(d).finish(),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Str(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::Str(s.as_str())
    }
}

impl<'a> From<&'a (dyn Error + 'static)> for Value<'a> {
    fn from(err: &'a (dyn Error + 'static)) -> Self {
        Value::Error(err)
    }
}

impl<'a> From<&'a (dyn Error + Send + Sync + 'static)> for Value<'a> {
    fn from(err: &'a (dyn Error + Send + Sync + 'static)) -> Self {
        Value::Error(err)
    }
}

impl<'a> From<&'a std::io::Error> for Value<'a> {
    fn from(err: &'a std::io::Error) -> Self {
        Value::Error(err)
    }
}

impl<'a> From<&'a FieldValue> for Value<'a> {
    fn from(value: &'a FieldValue) -> Self {
        value.as_value()
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::Uint(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value<'_> {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Owned value type for fields that outlive a single call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    #[serde(skip_deserializing)]
    Error(String),
    #[serde(skip_deserializing)]
    Text(String),
}

impl FieldValue {
    /// Borrow as a call-site `Value` for encoding
    pub fn as_value(&self) -> Value<'_> {
        match self {
            FieldValue::String(s) | FieldValue::Error(s) | FieldValue::Text(s) => Value::Str(s),
            FieldValue::Int(i) => Value::Int(*i),
            FieldValue::Uint(u) => Value::Uint(*u),
            FieldValue::Float(f) => Value::Float(*f),
            FieldValue::Bool(b) => Value::Bool(*b),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_value().fmt(f)
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::Uint(u)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// An owned key/value pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Pair up a flat alternating key/value list.
    ///
    /// Non-text keys take their textual form. A trailing key without a value
    /// is kept with the `MISSING_VALUE` placeholder.
    pub fn pairs_from(args: &[Value<'_>]) -> Vec<Field> {
        args.chunks(2)
            .map(|pair| {
                let key = match pair[0] {
                    Value::Str(s) => s.to_string(),
                    other => other.to_string(),
                };
                let value = match pair.get(1) {
                    Some(v) => v.to_field_value(),
                    None => FieldValue::String(MISSING_VALUE.to_string()),
                };
                Field { key, value }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct FakeError;

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("fake error")
        }
    }

    impl Error for FakeError {}

    #[test]
    fn test_value_conversions() {
        assert!(matches!(Value::from("x"), Value::Str("x")));
        assert!(matches!(Value::from(1 << 18), Value::Int(262144)));
        assert!(matches!(Value::from(65usize), Value::Uint(65)));
        assert!(matches!(Value::from(true), Value::Bool(true)));
        assert!(matches!(Value::from(8.4), Value::Float(_)));
    }

    #[test]
    fn test_error_value_renders_description() {
        let err = FakeError;
        let value = Value::error(&err);
        assert_eq!(value.to_string(), "fake error");
        assert_eq!(value.to_field_value(), FieldValue::Error("fake error".into()));
    }

    #[test]
    fn test_debug_fallback() {
        let items = vec![1, 2];
        assert_eq!(Value::debug(&items).to_string(), "[1, 2]");
    }

    #[test]
    fn test_pairs_from_even() {
        let fields = Field::pairs_from(&[Value::Str("component"), "logf".into()]);
        assert_eq!(fields, vec![Field::new("component", "logf")]);
    }

    #[test]
    fn test_pairs_from_odd_keeps_dangling_key() {
        let fields = Field::pairs_from(&["a".into(), Value::Int(1), "b".into()]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].key, "b");
        assert_eq!(fields[1].value, FieldValue::String(MISSING_VALUE.into()));
    }

    #[test]
    fn test_pairs_from_non_text_key() {
        let fields = Field::pairs_from(&[Value::Int(42), "answer".into()]);
        assert_eq!(fields[0].key, "42");
    }

    #[test]
    fn test_field_value_untagged_serde() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"["api", -3, 7, 1.5, true]"#).unwrap();
        assert_eq!(values[0], FieldValue::String("api".into()));
        assert_eq!(values[1], FieldValue::Int(-3));
        assert_eq!(values[2], FieldValue::Int(7));
        assert_eq!(values[3], FieldValue::Float(1.5));
        assert_eq!(values[4], FieldValue::Bool(true));
    }
}

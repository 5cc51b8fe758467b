use crate::common::Document;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

/// Compare two integers widened to i128.
#[inline]
fn num_cmp_int(a: i128, b: i128) -> Ordering {
    a.cmp(&b)
}

/// Compare two floats with NaN treated as greater than all other values.
#[inline]
fn num_cmp_float(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Represents a [Document] field value. It can be a simple value like
/// [Value::I64] or [Value::String], or a complex value like [Value::Document]
/// or [Value::Array].
///
/// # Variants
/// - `Null`: absence of a value
/// - `Bool`, `I32`, `I64`, `F64`, `String`: scalar field values
/// - `Document`: nested document
/// - `Array`: ordered collection of values
/// - `DateTime`: a point in time (UTC)
/// - `ServerTimestamp`: write-time sentinel; backends replace it with the
///   current server time when a document is set
///
/// Numeric variants compare by numeric value across widths, so `I32(2)`
/// equals `I64(2)` and sorts before `F64(2.5)`.
///
/// Create values using the `From` trait or the `val!` macro:
/// ```text
/// let v1: Value = 42i64.into();
/// let v2 = Value::from("hello");
/// let v3 = val!(true);
/// ```
#[derive(Clone, Default, serde::Deserialize, serde::Serialize)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 32-bit integer value.
    I32(i32),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a nested document value.
    Document(Document),
    /// Represents an array value.
    Array(Vec<Value>),
    /// Represents a point in time.
    DateTime(DateTime<Utc>),
    /// Server-generated timestamp sentinel, resolved by the backend at write time.
    ServerTimestamp,
}

impl Value {
    /// Returns `true` if this value is [Value::Null].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this value holds an integer variant.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::I32(_) | Value::I64(_))
    }

    /// Returns `true` if this value holds a numeric variant.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::I32(_) | Value::I64(_) | Value::F64(_))
    }

    /// Returns the value widened to i128 if it is an integer.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Value::I32(v) => Some(*v as i128),
            Value::I64(v) => Some(*v as i128),
            _ => None,
        }
    }

    /// Returns the value widened to f64 if it is numeric.
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::I32(v) => Some(*v as f64),
            Value::I64(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date_time(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(v) => Some(v),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        // integers compare across widths, and any numeric pair involving a
        // float compares as floats
        if self.is_integer() && other.is_integer() {
            if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
                return a == b;
            }
        }
        if self.is_number() && other.is_number() {
            if let (Some(a), Some(b)) = (self.as_decimal(), other.as_decimal()) {
                return num_cmp_float(a, b) == Ordering::Equal;
            }
        }

        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Document(a), Value::Document(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::ServerTimestamp, Value::ServerTimestamp) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.is_integer() && other.is_integer() {
            if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
                return num_cmp_int(a, b);
            }
        }
        if self.is_number() && other.is_number() {
            if let (Some(a), Some(b)) = (self.as_decimal(), other.as_decimal()) {
                return num_cmp_float(a, b);
            }
        }

        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::ServerTimestamp, Value::ServerTimestamp) => Ordering::Equal,
            // fallback to string comparison for mixed types
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => write!(f, "Bool({})", v),
            Value::I32(v) => write!(f, "I32({})", v),
            Value::I64(v) => write!(f, "I64({})", v),
            Value::F64(v) => write!(f, "F64({})", v),
            Value::String(v) => write!(f, "String({:?})", v),
            Value::Document(v) => write!(f, "Document({:?})", v),
            Value::Array(v) => write!(f, "Array({:?})", v),
            Value::DateTime(v) => write!(f, "DateTime({})", v.to_rfc3339()),
            Value::ServerTimestamp => write!(f, "ServerTimestamp"),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Document(v) => write!(f, "{}", v),
            Value::Array(v) => {
                write!(f, "[")?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Value::ServerTimestamp => write!(f, "<server timestamp>"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A macro to create a `Value` from a given expression.
///
/// # Examples
///
/// ```rust
/// use docref::common::Value;
/// use docref::val;
///
/// let int_value = val!(42);
/// assert_eq!(int_value, Value::I32(42));
///
/// let string_value = val!("hello");
/// assert_eq!(string_value, Value::String("hello".to_string()));
/// ```
#[macro_export]
macro_rules! val {
    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

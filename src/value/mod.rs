//! Serializable values produced by query execution.

mod object;

use std::fmt;

pub use self::object::Object;

/// A primitive leaf value of a response tree.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    /// A signed 32-bit integer.
    Int(i32),
    /// A 64-bit floating point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A boolean.
    Boolean(bool),
}

impl From<i32> for ScalarValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Serializable value returned from query and field execution.
///
/// Used by the execution engine and resolvers to build up the response
/// structure. Lists and objects carry no location information since they are
/// produced by resolving fields rather than by parsing a source query.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The absence of a value.
    Null,
    /// A leaf value.
    Scalar(ScalarValue),
    /// An ordered list of values.
    List(Vec<Value>),
    /// An ordered map of response keys to values.
    Object(Object),
}

impl Value {
    // CONSTRUCTORS

    /// Constructs a null value.
    pub fn null() -> Self {
        Self::Null
    }

    /// Constructs a list value.
    pub fn list(l: Vec<Self>) -> Self {
        Self::List(l)
    }

    /// Constructs an object value.
    pub fn object(o: Object) -> Self {
        Self::Object(o)
    }

    /// Constructs a scalar value.
    pub fn scalar<T: Into<ScalarValue>>(s: T) -> Self {
        Self::Scalar(s.into())
    }

    // DISCRIMINATORS

    /// Indicates whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Views the underlying scalar value, if present.
    pub fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Views the underlying integer value, if present.
    pub fn as_int_value(&self) -> Option<i32> {
        match self {
            Self::Scalar(ScalarValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Views the underlying float value, if present.
    pub fn as_float_value(&self) -> Option<f64> {
        match self {
            Self::Scalar(ScalarValue::Float(n)) => Some(*n),
            _ => None,
        }
    }

    /// Views the underlying string value, if present.
    pub fn as_string_value(&self) -> Option<&str> {
        match self {
            Self::Scalar(ScalarValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Views the underlying boolean value, if present.
    pub fn as_boolean_value(&self) -> Option<bool> {
        match self {
            Self::Scalar(ScalarValue::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Views the underlying object value, if present.
    pub fn as_object_value(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Mutable view into the underlying object value, if present.
    pub fn as_mut_object_value(&mut self) -> Option<&mut Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Converts this value into an [`Object`], if it is one.
    pub fn into_object(self) -> Option<Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Views the underlying list value, if present.
    pub fn as_list_value(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Self::Object(o)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Scalar(s) => write!(f, "{s}"),
            Self::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Self::Object(o) => {
                write!(f, "{{")?;
                for (i, (k, v)) in o.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{k}\": {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

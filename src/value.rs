//! Scalar values carried by tree nodes.
//!
//! Every node holds an ordered list of [`Value`]s. A value is one of four
//! closed variants: a string, a boolean, a 32-bit signed integer or a 32-bit
//! float.
//!
//! ## Extracting Values
//!
//! String and boolean accessors require an exact variant match. The numeric
//! accessors accept either numeric variant and convert:
//!
//! ```rust
//! use tabtree::Value;
//!
//! let value = Value::from(2.75_f32);
//! assert_eq!(value.as_int().unwrap(), 2);
//! assert_eq!(value.as_float().unwrap(), 2.75);
//! assert!(value.as_bool().is_err());
//! ```
//!
//! ### Conversions
//!
//! ```rust
//! use tabtree::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from("hello");
//! let text = String::try_from(value).unwrap();
//! assert_eq!(text, "hello");
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single typed scalar.
///
/// # Examples
///
/// ```rust
/// use tabtree::Value;
///
/// let int = Value::Int(42);
/// let text = Value::String("hello".to_string());
///
/// assert!(int.is_int());
/// assert!(text.is_string());
/// assert_eq!(int.type_name(), "int");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    String(String),
    Bool(bool),
    Int(i32),
    Float(f32),
}

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Returns `true` for either numeric variant.
    #[inline]
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// The lowercase name of this value's variant, as used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
        }
    }

    /// Returns the string if this is a [`Value::String`].
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch for any other variant.
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(Error::type_mismatch("string", other.type_name())),
        }
    }

    /// Returns the boolean if this is a [`Value::Bool`].
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch for any other variant.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::type_mismatch("bool", other.type_name())),
        }
    }

    /// Returns this number as an `i32`.
    ///
    /// Floats are truncated toward zero and saturate at the `i32` bounds;
    /// NaN becomes `0`.
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch for strings and booleans.
    pub fn as_int(&self) -> Result<i32> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::Float(f) => Ok(*f as i32),
            other => Err(Error::type_mismatch("number", other.type_name())),
        }
    }

    /// Returns this number as an `f32`, rounding large integers to the
    /// nearest representable float.
    ///
    /// # Errors
    ///
    /// Fails with a type mismatch for strings and booleans.
    pub fn as_float(&self) -> Result<f32> {
        match self {
            Value::Int(i) => Ok(*i as f32),
            Value::Float(f) => Ok(*f),
            other => Err(Error::type_mismatch("number", other.type_name())),
        }
    }
}

/// Formats the value as its literal in the text format.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        crate::ser::write_literal(&mut out, self);
        f.write_str(&out)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i32(*i),
            Value::Float(f) => serializer.serialize_f32(*f),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ValueVisitor;

        impl<'de> serde::de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, boolean, 32-bit integer or float")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i32::try_from(value)
                    .map(Value::Int)
                    .map_err(|_| E::custom(format!("integer {} out of 32-bit range", value)))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i32::try_from(value)
                    .map(Value::Int)
                    .map_err(|_| E::custom(format!("integer {} out of 32-bit range", value)))
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E> {
                Ok(Value::Float(value as f32))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E> {
                Ok(Value::String(value))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for i32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_int()
    }
}

impl TryFrom<Value> for f32 {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_float()
    }
}

impl TryFrom<Value> for bool {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        value.as_bool()
    }
}

impl TryFrom<Value> for String {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(Error::type_mismatch("string", other.type_name())),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Int(i32::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int(i32::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Int(i32::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int(i32::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

/// Narrows to `f32`.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value as f32)
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

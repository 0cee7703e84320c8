//! Dynamic value representation for CON data.
//!
//! This module provides the [`Value`] enum, the tree that both the text codec
//! and the binary codec read and write.
//!
//! ## Core Types
//!
//! - [`Value`]: one of Null, Bool, Integer, Float, String, Array, Object
//! - [`ConMap`](crate::ConMap): the sorted map behind `Value::Object`
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use confile::{con, Value};
//!
//! let null = Value::Null;
//! let boolean = Value::from(true);
//! let integer = Value::from(42);
//! let text = Value::from("hello");
//!
//! let obj = con!({
//!     "name": "Alice",
//!     "age": 30
//! });
//! assert!(obj.is_object());
//! ```
//!
//! ### Extracting Values
//!
//! Accessors never reinterpret one variant as another. `as_*` returns an
//! `Option`; `TryFrom` returns [`Error::TypeMismatch`](crate::Error::TypeMismatch).
//!
//! ```rust
//! use confile::Value;
//! use std::convert::TryFrom;
//!
//! let value = Value::from(42);
//! assert_eq!(value.as_i64(), Some(42));
//! assert_eq!(value.as_f64(), None);
//!
//! let num: i64 = i64::try_from(&value).unwrap();
//! assert_eq!(num, 42);
//! assert!(String::try_from(value).is_err());
//! ```
//!
//! ### Copying
//!
//! `Clone` produces a fully independent deep copy:
//!
//! ```rust
//! use confile::con;
//!
//! let original = con!({"list": [1, 2]});
//! let mut copy = original.clone();
//! copy.as_object_mut().unwrap().remove("list");
//! assert_eq!(original.as_object().unwrap().len(), 1);
//! ```

use crate::{ConMap, Error, Tag};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A dynamically-typed CON value.
///
/// The variant always matches the payload it holds, and there is no way to
/// read one variant as another without a checked conversion.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(ConMap),
}

impl Value {
    /// Returns the binary tag identifying this variant.
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> Tag {
        match self {
            Value::Null => Tag::Null,
            Value::Bool(_) => Tag::Boolean,
            Value::Integer(_) => Tag::Integer,
            Value::Float(_) => Tag::Float,
            Value::String(_) => Tag::String,
            Value::Array(_) => Tag::Array,
            Value::Object(_) => Tag::Object,
        }
    }

    /// Returns the variant name, as used in error messages.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.tag().name()
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// If the value is a boolean, returns it. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confile::Value;
    ///
    /// assert_eq!(Value::Bool(true).as_bool(), Some(true));
    /// assert_eq!(Value::from(1).as_bool(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is an `Integer`, returns it. Floats are not converted.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// If the value is a `Float`, returns it. Integers are not converted.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&ConMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut ConMap> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::print_text(self))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid CON value")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
                Ok(Value::Integer(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Integer(i)),
                    Err(_) => Ok(Value::Float(value as f64)),
                }
            }

            fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::Array(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = ConMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// Checked conversions out of a Value. Each one fails with TypeMismatch when
// the variant does not match; none of them converts between variants.
macro_rules! impl_try_from_owned {
    ($target:ty, $variant:ident, $expected:literal) => {
        impl TryFrom<Value> for $target {
            type Error = Error;

            fn try_from(value: Value) -> crate::Result<Self> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(Error::type_mismatch($expected, other.type_name())),
                }
            }
        }
    };
}

impl_try_from_owned!(bool, Bool, "Boolean");
impl_try_from_owned!(i64, Integer, "Integer");
impl_try_from_owned!(f64, Float, "Float");
impl_try_from_owned!(String, String, "String");
impl_try_from_owned!(Vec<Value>, Array, "Array");
impl_try_from_owned!(ConMap, Object, "Object");

impl TryFrom<&Value> for bool {
    type Error = Error;

    fn try_from(value: &Value) -> crate::Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| Error::type_mismatch("Boolean", value.type_name()))
    }
}

impl TryFrom<&Value> for i64 {
    type Error = Error;

    fn try_from(value: &Value) -> crate::Result<Self> {
        value
            .as_i64()
            .ok_or_else(|| Error::type_mismatch("Integer", value.type_name()))
    }
}

impl TryFrom<&Value> for f64 {
    type Error = Error;

    fn try_from(value: &Value) -> crate::Result<Self> {
        value
            .as_f64()
            .ok_or_else(|| Error::type_mismatch("Float", value.type_name()))
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = Error;

    fn try_from(value: &'a Value) -> crate::Result<Self> {
        value
            .as_str()
            .ok_or_else(|| Error::type_mismatch("String", value.type_name()))
    }
}

impl<'a> TryFrom<&'a Value> for &'a [Value] {
    type Error = Error;

    fn try_from(value: &'a Value) -> crate::Result<Self> {
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| Error::type_mismatch("Array", value.type_name()))
    }
}

impl<'a> TryFrom<&'a Value> for &'a ConMap {
    type Error = Error;

    fn try_from(value: &'a Value) -> crate::Result<Self> {
        value
            .as_object()
            .ok_or_else(|| Error::type_mismatch("Object", value.type_name()))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
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

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<ConMap> for Value {
    fn from(value: ConMap) -> Self {
        Value::Object(value)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Value::Object(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_tryfrom_owned() {
        assert_eq!(i64::try_from(Value::Integer(42)).unwrap(), 42);
        assert_eq!(f64::try_from(Value::Float(3.5)).unwrap(), 3.5);
        assert!(bool::try_from(Value::Bool(true)).unwrap());
        assert_eq!(String::try_from(Value::from("hi")).unwrap(), "hi");

        // Checked accessors never convert between variants
        assert!(i64::try_from(Value::Float(42.0)).is_err());
        assert!(f64::try_from(Value::Integer(42)).is_err());
    }

    #[test]
    fn test_tryfrom_reports_both_variants() {
        let err = i64::try_from(Value::from("x")).unwrap_err();
        match err {
            Error::TypeMismatch { expected, found } => {
                assert_eq!(expected, "Integer");
                assert_eq!(found, "String");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_tryfrom_borrowed() {
        let value = Value::Array(vec![Value::Null, Value::from(1)]);
        let slice: &[Value] = TryFrom::try_from(&value).unwrap();
        assert_eq!(slice.len(), 2);
        assert!(<&ConMap>::try_from(&value).is_err());
        assert!(<&str>::try_from(&value).is_err());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Integer(42));
        assert_eq!(Value::from(42u32), Value::Integer(42));
        assert_eq!(Value::from(3.5f64), Value::Float(3.5));
        assert_eq!(Value::from("test"), Value::String("test".to_string()));
    }

    #[test]
    fn test_from_iterators() {
        let arr: Value = (1..=3).map(Value::from).collect();
        assert_eq!(arr.as_array().map(Vec::len), Some(3));

        let obj: Value = vec![("k".to_string(), Value::Null)].into_iter().collect();
        assert!(obj.as_object().unwrap().contains_key("k"));
    }

    #[test]
    fn test_tag_matches_variant() {
        assert_eq!(Value::Null.tag(), Tag::Null);
        assert_eq!(Value::from(false).tag(), Tag::Boolean);
        assert_eq!(Value::from(1).tag(), Tag::Integer);
        assert_eq!(Value::from(1.5).tag(), Tag::Float);
        assert_eq!(Value::from("s").tag(), Tag::String);
        assert_eq!(Value::Array(vec![]).tag(), Tag::Array);
        assert_eq!(Value::Object(ConMap::new()).tag(), Tag::Object);
        assert_eq!(Value::Object(ConMap::new()).type_name(), "Object");
    }

    #[test]
    fn test_clone_is_deep() {
        let mut inner = ConMap::new();
        inner.insert("n".to_string(), Value::from(1));
        let original = Value::Array(vec![Value::Object(inner)]);

        let mut copy = original.clone();
        if let Some(Value::Object(map)) = copy.as_array_mut().and_then(|a| a.get_mut(0)) {
            map.insert("n".to_string(), Value::from(2));
        }

        assert_ne!(original, copy);
        let first = &original.as_array().unwrap()[0];
        assert_eq!(first.as_object().unwrap().get("n"), Some(&Value::from(1)));
    }
}

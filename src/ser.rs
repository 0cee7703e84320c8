//! CON text printing and typed serialization.
//!
//! This module provides:
//!
//! - [`Printer`]: renders a [`Value`] as JSON-like text
//! - [`to_value`]: converts any `T: Serialize` into a [`Value`]
//!
//! ## Text layout
//!
//! Compact output separates items with `", "` and keys from values with
//! `": "`. Object keys appear in sorted order. Pretty output puts every
//! element on its own line, indented by [`ConOptions::indent`] spaces per
//! level; empty containers stay `[]` and `{}`.
//!
//! Strings are written between double quotes exactly as stored. There is no
//! escaping, so strings containing `"` do not read back.
//!
//! ```rust
//! use confile::{con, print_text, print_text_with_options, ConOptions};
//!
//! let value = con!({"b": [1, 2.5], "a": null});
//! assert_eq!(print_text(&value), r#"{"a": null, "b": [1, 2.5]}"#);
//!
//! let pretty = print_text_with_options(&value, &ConOptions::pretty());
//! assert_eq!(pretty, "{\n  \"a\": null,\n  \"b\": [\n    1,\n    2.5\n  ]\n}");
//! ```

use crate::{ConMap, ConOptions, Error, Result, Value};
use serde::{ser, Serialize};

/// The CON text printer.
///
/// Printing never fails: every [`Value`] has a textual form.
pub struct Printer<'a> {
    output: String,
    options: &'a ConOptions,
    indent_level: usize,
}

impl<'a> Printer<'a> {
    pub fn new(options: &'a ConOptions) -> Self {
        Printer {
            output: String::new(),
            options,
            indent_level: 0,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    pub fn print(&mut self, value: &Value) {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::Bool(true) => self.output.push_str("true"),
            Value::Bool(false) => self.output.push_str("false"),
            Value::Integer(i) => self.output.push_str(&i.to_string()),
            Value::Float(f) => self.write_float(*f),
            Value::String(s) => self.write_string(s),
            Value::Array(items) => self.write_array(items),
            Value::Object(map) => self.write_object(map),
        }
    }

    fn write_float(&mut self, f: f64) {
        if f.is_nan() {
            self.output.push_str("nan");
        } else if f.is_infinite() {
            self.output
                .push_str(if f.is_sign_positive() { "inf" } else { "-inf" });
        } else {
            self.output.push_str(&f.to_string());
        }
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        self.output.push_str(s);
        self.output.push('"');
    }

    fn write_array(&mut self, items: &[Value]) {
        if items.is_empty() {
            self.output.push_str("[]");
            return;
        }

        self.output.push('[');
        self.indent_level += 1;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write_separator();
            }
            self.write_newline();
            self.print(item);
        }
        self.indent_level -= 1;
        self.write_newline();
        self.output.push(']');
    }

    fn write_object(&mut self, map: &ConMap) {
        if map.is_empty() {
            self.output.push_str("{}");
            return;
        }

        self.output.push('{');
        self.indent_level += 1;
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 {
                self.write_separator();
            }
            self.write_newline();
            self.write_string(key);
            self.output.push_str(": ");
            self.print(value);
        }
        self.indent_level -= 1;
        self.write_newline();
        self.output.push('}');
    }

    fn write_separator(&mut self) {
        if self.options.pretty {
            self.output.push(',');
        } else {
            self.output.push_str(", ");
        }
    }

    fn write_newline(&mut self) {
        if self.options.pretty {
            self.output.push('\n');
            let width = self.indent_level * self.options.indent;
            self.output.extend(std::iter::repeat(' ').take(width));
        }
    }
}

/// Convert a `T` into a [`Value`].
///
/// Structs and maps become Objects, sequences and tuples become Arrays, and
/// `None` or `()` become Null. Unit enum variants become their name as a
/// String; other variants become a single-key Object holding their content.
///
/// # Examples
///
/// ```rust
/// use confile::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(value.as_object().unwrap().get("x"), Some(&Value::Integer(1)));
/// ```
///
/// # Errors
///
/// Returns an error if `T`'s `Serialize` impl fails or produces a map
/// with non-string keys.
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// A serde `Serializer` that builds a [`Value`] tree.
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

pub struct SerializeMap {
    map: ConMap,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

/// Wraps enum variant content as `{variant: content}`.
fn tag_variant(variant: &'static str, content: Value) -> Value {
    let mut map = ConMap::new();
    map.insert(variant.to_string(), content);
    Value::Object(map)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(v as i64))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(i) => Ok(Value::Integer(i)),
            Err(_) => Ok(Value::Float(v as f64)),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Float(v as f64))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Array(
            v.iter().map(|&b| Value::Integer(b as i64)).collect(),
        ))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tag_variant(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len.unwrap_or(0), None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(len, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(capacity: usize, variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        let array = Value::Array(self.vec);
        match self.variant {
            Some(variant) => tag_variant(variant, array),
            None => array,
        }
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: ConMap::new(),
            current_key: None,
            variant,
        }
    }

    fn finish(self) -> Value {
        let object = Value::Object(self.map);
        match self.variant {
            Some(variant) => tag_variant(variant, object),
            None => object,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::type_mismatch("String map key", other.type_name())),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{print_text, print_text_with_options};
    use std::collections::HashMap;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        Value::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_print_scalars() {
        assert_eq!(print_text(&Value::Null), "null");
        assert_eq!(print_text(&Value::Bool(true)), "true");
        assert_eq!(print_text(&Value::Integer(-12)), "-12");
        assert_eq!(print_text(&Value::Float(0.1)), "0.1");
        assert_eq!(print_text(&Value::from("a b")), "\"a b\"");
    }

    #[test]
    fn test_print_non_finite_floats() {
        assert_eq!(print_text(&Value::Float(f64::NAN)), "nan");
        assert_eq!(print_text(&Value::Float(f64::INFINITY)), "inf");
        assert_eq!(print_text(&Value::Float(f64::NEG_INFINITY)), "-inf");
    }

    #[test]
    fn test_print_sorted_object() {
        let value = obj(&[("z", Value::Integer(1)), ("a", Value::Integer(2))]);
        assert_eq!(print_text(&value), r#"{"a": 2, "z": 1}"#);
    }

    #[test]
    fn test_print_empty_containers() {
        let options = ConOptions::pretty();
        let value = Value::Array(vec![Value::Array(vec![]), obj(&[])]);
        assert_eq!(print_text(&value), "[[], {}]");
        assert_eq!(
            print_text_with_options(&value, &options),
            "[\n  [],\n  {}\n]"
        );
    }

    #[test]
    fn test_pretty_indent_width() {
        let options = ConOptions::pretty().with_indent(4);
        let value = obj(&[("k", Value::Array(vec![Value::Null]))]);
        assert_eq!(
            print_text_with_options(&value, &options),
            "{\n    \"k\": [\n        null\n    ]\n}"
        );
    }

    #[derive(Serialize)]
    enum Event {
        Start,
        Move(i32, i32),
        Rename(String),
        Resize { w: u32, h: u32 },
    }

    #[test]
    fn test_to_value_enum_variants() {
        assert_eq!(to_value(&Event::Start).unwrap(), Value::from("Start"));
        assert_eq!(
            to_value(&Event::Move(1, -1)).unwrap(),
            obj(&[(
                "Move",
                Value::Array(vec![Value::Integer(1), Value::Integer(-1)])
            )])
        );
        assert_eq!(
            to_value(&Event::Rename("x".into())).unwrap(),
            obj(&[("Rename", Value::from("x"))])
        );
        assert_eq!(
            to_value(&Event::Resize { w: 3, h: 4 }).unwrap(),
            obj(&[(
                "Resize",
                obj(&[("h", Value::Integer(4)), ("w", Value::Integer(3))])
            )])
        );
    }

    #[test]
    fn test_to_value_large_u64() {
        assert_eq!(to_value(&u64::MAX).unwrap(), Value::Float(u64::MAX as f64));
    }

    #[test]
    fn test_to_value_non_string_keys_rejected() {
        let mut map = HashMap::new();
        map.insert(1, "one");
        let err = to_value(&map).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }
}

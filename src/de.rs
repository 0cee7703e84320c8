//! CON text parsing and typed deserialization.
//!
//! This module provides:
//!
//! - [`Parser`]: a single-pass recursive-descent parser from JSON-like text to [`Value`]
//! - [`from_value`]: converts a [`Value`] into any `T: Deserialize`
//!
//! ## Grammar
//!
//! Whitespace (space, tab, CR, LF) is skipped between tokens. The next
//! character selects the production:
//!
//! - `n` is Null, `t` is `true`, `f` is `false`. Exactly 4, 4 and 5 characters
//!   are consumed without checking the spelling, so `nxyz` reads as Null.
//! - `"` starts a string that ends at the next `"`. There are no escape
//!   sequences, so a string cannot contain a double quote.
//! - `[` and `{` start arrays and objects; elements are separated by `,`.
//! - Anything else is a number, read as a double. A double with an exact
//!   `i64` value becomes an Integer (`42.0` is Integer 42), otherwise a Float.
//!
//! ## Usage
//!
//! ```rust
//! use confile::{parse_text, Value};
//!
//! let value = parse_text(r#"{"b": 1, "a": [true, null, 2.5]}"#).unwrap();
//! let obj = value.as_object().unwrap();
//! assert_eq!(obj.get("b"), Some(&Value::Integer(1)));
//! assert_eq!(obj.keys().next().map(String::as_str), Some("a"));
//! ```

use crate::{ConMap, ConOptions, Error, Result, Value};
use serde::de::{self, DeserializeOwned, IntoDeserializer};
use serde::forward_to_deserialize_any;

/// 2^63 as a double: the first value above `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// The CON text parser.
///
/// Created via [`Parser::new`] and consumed by [`Parser::parse`]. Positions in
/// errors are 1-based lines and columns, counted in characters.
pub struct Parser<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str, options: &ConOptions) -> Self {
        Parser {
            input,
            position: 0,
            line: 1,
            column: 1,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    /// Parses one value; only whitespace may follow it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`], [`Error::UnexpectedEof`] or
    /// [`Error::ParseDepthExceeded`] at the first violation. No partial
    /// tree is returned.
    pub fn parse(mut self) -> Result<Value> {
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.at_end() {
            Ok(value)
        } else {
            Err(self.error_here("end of input"))
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek_char() {
            self.next_char();
        }
    }

    /// Builds an error describing the character at the current position.
    fn error_here(&self, expected: &str) -> Error {
        match self.peek_char() {
            Some(ch) => Error::syntax(self.line, self.column, expected, ch),
            None => Error::unexpected_eof(self.line, self.column, expected),
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::ParseDepthExceeded {
                line: self.line,
                col: self.column,
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_value(&mut self) -> Result<Value> {
        self.skip_whitespace();
        match self.peek_char() {
            None => Err(self.error_here("a value")),
            Some('n') => {
                self.skip_literal(4, "null")?;
                Ok(Value::Null)
            }
            Some('t') => {
                self.skip_literal(4, "true")?;
                Ok(Value::Bool(true))
            }
            Some('f') => {
                self.skip_literal(5, "false")?;
                Ok(Value::Bool(false))
            }
            Some('"') => self.parse_string().map(Value::String),
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object(),
            Some(_) => self.parse_number(),
        }
    }

    /// Consumes `len` characters without looking at them.
    fn skip_literal(&mut self, len: usize, literal: &str) -> Result<()> {
        for _ in 0..len {
            if self.next_char().is_none() {
                return Err(self.error_here(literal));
            }
        }
        Ok(())
    }

    fn parse_string(&mut self) -> Result<String> {
        if self.peek_char() != Some('"') {
            return Err(self.error_here("'\"'"));
        }
        self.next_char();

        let start = self.position;
        loop {
            match self.peek_char() {
                Some('"') => {
                    let s = self.input[start..self.position].to_string();
                    self.next_char();
                    return Ok(s);
                }
                Some(_) => {
                    self.next_char();
                }
                None => return Err(self.error_here("closing '\"'")),
            }
        }
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.enter()?;
        self.next_char(); // consume '['

        self.skip_whitespace();
        if self.peek_char() == Some(']') {
            self.next_char();
            self.depth -= 1;
            return Ok(Value::Array(Vec::new()));
        }

        let mut items = Vec::new();
        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                }
                Some(']') => {
                    self.next_char();
                    break;
                }
                _ => return Err(self.error_here("',' or ']'")),
            }
        }

        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.enter()?;
        self.next_char(); // consume '{'

        self.skip_whitespace();
        if self.peek_char() == Some('}') {
            self.next_char();
            self.depth -= 1;
            return Ok(Value::Object(ConMap::new()));
        }

        let mut map = ConMap::new();
        loop {
            self.skip_whitespace();
            if self.peek_char() != Some('"') {
                return Err(self.error_here("'\"' to start a key"));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            if self.peek_char() != Some(':') {
                return Err(self.error_here("':'"));
            }
            self.next_char();

            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek_char() {
                Some(',') => {
                    self.next_char();
                }
                Some('}') => {
                    self.next_char();
                    break;
                }
                _ => return Err(self.error_here("',' or '}'")),
            }
        }

        self.depth -= 1;
        Ok(Value::Object(map))
    }

    /// Reads the longest prefix of the form `[+-]? d* (. d*)? ([eE] [+-]? d+)?`
    /// with at least one mantissa digit.
    fn parse_number(&mut self) -> Result<Value> {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.position;
        let digits_from = |mut at: usize| {
            while bytes.get(at).is_some_and(u8::is_ascii_digit) {
                at += 1;
            }
            at
        };

        let mut end = start;
        if let Some(b'+' | b'-') = bytes.get(end) {
            end += 1;
        }

        let int_end = digits_from(end);
        let mut mantissa_digits = int_end - end;
        end = int_end;

        let mut integer_literal = true;
        if bytes.get(end) == Some(&b'.') {
            integer_literal = false;
            let frac_end = digits_from(end + 1);
            mantissa_digits += frac_end - (end + 1);
            end = frac_end;
        }

        if mantissa_digits == 0 {
            return Err(self.error_here("a value"));
        }

        if let Some(b'e' | b'E') = bytes.get(end) {
            let mut exp = end + 1;
            if let Some(b'+' | b'-') = bytes.get(exp) {
                exp += 1;
            }
            let exp_end = digits_from(exp);
            if exp_end > exp {
                integer_literal = false;
                end = exp_end;
            }
        }

        let text = &input[start..end];
        if integer_literal {
            if let Ok(i) = text.parse::<i64>() {
                self.advance_ascii(end);
                return Ok(Value::Integer(i));
            }
        }

        let d: f64 = text.parse().map_err(|_| self.error_here("a number"))?;
        self.advance_ascii(end);
        Ok(collapse_double(d))
    }

    /// Moves to `end` over characters known to be ASCII and not newlines.
    fn advance_ascii(&mut self, end: usize) {
        self.column += end - self.position;
        self.position = end;
    }
}

/// Stores a double as Integer when it has an exact `i64` value.
fn collapse_double(d: f64) -> Value {
    if d.is_finite() && d.fract() == 0.0 && (-I64_LIMIT..I64_LIMIT).contains(&d) {
        Value::Integer(d as i64)
    } else {
        Value::Float(d)
    }
}

/// Deserialize an instance of type `T` from a [`Value`].
///
/// # Examples
///
/// ```rust
/// use confile::{from_value, parse_text};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let value = parse_text(r#"{"x": 1, "y": 2}"#).unwrap();
/// let point: Point = from_value(value).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

impl<'de> IntoDeserializer<'de, Error> for Value {
    type Deserializer = ValueDeserializer;

    fn into_deserializer(self) -> ValueDeserializer {
        ValueDeserializer::new(self)
    }
}

/// A serde `Deserializer` that reads from an owned [`Value`].
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            value => visitor.visit_some(ValueDeserializer::new(value)),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer::new(variant, None)),
            Value::Object(obj) => {
                let mut iter = obj.into_iter();
                match (iter.next(), iter.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, Some(value)))
                    }
                    _ => Err(Error::custom("Expected object with a single variant key")),
                }
            }
            other => Err(Error::type_mismatch("String or Object", other.type_name())),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: std::collections::btree_map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: ConMap) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl EnumDeserializer {
    fn new(variant: String, value: Option<Value>) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("Expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(obj)) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn parse(input: &str) -> Result<Value> {
        Parser::new(input, &ConOptions::default()).parse()
    }

    #[test]
    fn test_number_collapse() {
        assert_eq!(parse("42").unwrap(), Value::Integer(42));
        assert_eq!(parse("42.5").unwrap(), Value::Float(42.5));
        assert_eq!(parse("42.0").unwrap(), Value::Integer(42));
        assert_eq!(parse("-1e3").unwrap(), Value::Integer(-1000));
        assert_eq!(parse("2.5e-1").unwrap(), Value::Float(0.25));
        assert_eq!(parse("1e19").unwrap(), Value::Float(1e19));
        assert_eq!(parse(".5").unwrap(), Value::Float(0.5));
        assert_eq!(parse("+7").unwrap(), Value::Integer(7));
    }

    #[test]
    fn test_integer_literals_are_exact() {
        assert_eq!(
            parse("9007199254740993").unwrap(),
            Value::Integer(9_007_199_254_740_993)
        );
        assert_eq!(
            parse("-9223372036854775808").unwrap(),
            Value::Integer(i64::MIN)
        );
        // Too large for i64: read as a double
        assert_eq!(
            parse("9223372036854775808").unwrap(),
            Value::Float(9_223_372_036_854_775_808.0)
        );
    }

    #[test]
    fn test_exponent_without_digits_is_not_consumed() {
        let err = parse("1e").unwrap_err();
        assert!(matches!(err, Error::Syntax { col: 2, .. }));
    }

    #[test]
    fn test_lenient_literals() {
        assert_eq!(parse("nxyz").unwrap(), Value::Null);
        assert_eq!(parse("tzzz").unwrap(), Value::Bool(true));
        assert_eq!(parse("fabcd").unwrap(), Value::Bool(false));
        assert!(matches!(
            parse("nu").unwrap_err(),
            Error::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_error_position() {
        let err = parse("[1,\n  2 3]").unwrap_err();
        match err {
            Error::Syntax {
                line,
                col,
                expected,
                found,
            } => {
                assert_eq!((line, col), (2, 5));
                assert_eq!(expected, "',' or ']'");
                assert_eq!(found, "'3'");
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit() {
        let options = ConOptions::new().with_max_depth(2);
        assert!(Parser::new("[[1]]", &options).parse().is_ok());
        let err = Parser::new("[[[1]]]", &options).parse().unwrap_err();
        assert!(matches!(err, Error::ParseDepthExceeded { limit: 2, .. }));
    }

    #[test]
    fn test_depth_resets_between_siblings() {
        let options = ConOptions::new().with_max_depth(2);
        let text = "[[1], [2], {\"a\": []}]";
        assert!(Parser::new(text, &options).parse().is_ok());
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Unit,
        Circle(f64),
        Rect { w: i64, h: i64 },
    }

    #[test]
    fn test_from_value_enums() {
        let unit: Shape = from_value(Value::from("Unit")).unwrap();
        assert_eq!(unit, Shape::Unit);

        let circle: Shape = from_value(parse(r#"{"Circle": 1.5}"#).unwrap()).unwrap();
        assert_eq!(circle, Shape::Circle(1.5));

        let rect: Shape = from_value(parse(r#"{"Rect": {"w": 2, "h": 3}}"#).unwrap()).unwrap();
        assert_eq!(rect, Shape::Rect { w: 2, h: 3 });
    }

    #[test]
    fn test_from_value_options() {
        let v: Vec<Option<i32>> = from_value(parse("[1, null, 3]").unwrap()).unwrap();
        assert_eq!(v, vec![Some(1), None, Some(3)]);
    }
}

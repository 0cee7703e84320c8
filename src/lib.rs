//! # confile
//!
//! Reading and writing CON, a compact self-describing binary format for
//! JSON-shaped trees, plus a JSON-like text form of the same data.
//!
//! ## What is CON?
//!
//! A CON document is a tree of [`Value`]s: Null, Boolean, 64-bit Integer,
//! 64-bit Float, String, Array and Object. In the binary form every node starts
//! with a one-byte [`Tag`]. String, Array and Object nodes can be DEFLATE
//! compressed individually; the encoder decides per node from the node's body
//! size and nesting level (see [`ConOptions`]).
//!
//! ## Key Features
//!
//! - **Two codecs**: binary (`encode_binary` / `decode_binary`) and text
//!   (`print_text` / `parse_text`) over one value model
//! - **Per-node compression**: large bodies near the root are zlib-compressed
//!   with `flate2`, small or deep nodes are stored raw
//! - **Checked decoding**: truncated input, unknown tags, bad UTF-8 and
//!   over-deep nesting are reported as errors with byte offsets, never panics
//! - **Serde compatible**: [`to_value`] and [`from_value`] bridge any
//!   `Serialize`/`Deserialize` type
//!
//! ## Quick Start
//!
//! ```rust
//! use confile::{decode_binary, encode_binary, parse_text, print_text, ConOptions};
//!
//! let value = parse_text(r#"{"id": 7, "tags": ["a", "b"], "ratio": 0.5}"#).unwrap();
//!
//! let bytes = encode_binary(&value, &ConOptions::default()).unwrap();
//! assert_eq!(decode_binary(&bytes).unwrap(), value);
//!
//! assert_eq!(print_text(&value), r#"{"id": 7, "ratio": 0.5, "tags": ["a", "b"]}"#);
//! ```
//!
//! ### Typed data
//!
//! ```rust
//! use confile::{decode_binary, encode_binary, from_value, to_value, ConOptions};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Reading {
//!     sensor: String,
//!     samples: Vec<f64>,
//! }
//!
//! let reading = Reading { sensor: "t1".into(), samples: vec![20.5, 21.25] };
//! let bytes = encode_binary(&to_value(&reading).unwrap(), &ConOptions::default()).unwrap();
//! let back: Reading = from_value(decode_binary(&bytes).unwrap()).unwrap();
//! assert_eq!(back, reading);
//! ```
//!
//! ### Building values with the con! macro
//!
//! ```rust
//! use confile::{con, Value};
//!
//! let data = con!({
//!     "name": "Alice",
//!     "age": 30,
//!     "tags": ["rust", "binary"]
//! });
//!
//! if let Value::Object(obj) = data {
//!     assert_eq!(obj.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! }
//! ```
//!
//! ## Compatibility notes
//!
//! - Lengths, counts and numbers are stored in the host's native byte order.
//! - An uncompressed Array or Object has no length field, while an uncompressed
//!   String does. Readers must follow this exactly.
//! - Text strings have no escape sequences, so strings containing `"` do not
//!   survive a text round trip. The binary form stores any UTF-8 string.
//!
//! ## Logging
//!
//! The crate emits `tracing` events (`debug` for whole-document operations,
//! `trace` per compressed node) and never prints. Install a subscriber such as
//! `tracing-subscriber` to see them.

pub mod compress;
pub mod de;
pub mod decode;
pub mod encode;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod ser;
pub mod tag;
pub mod value;

pub use de::{from_value, Parser};
pub use decode::Decoder;
pub use encode::Encoder;
pub use error::{Error, ErrorCategory, Result};
pub use map::ConMap;
pub use options::ConOptions;
pub use ser::{to_value, Printer, ValueSerializer};
pub use tag::Tag;
pub use value::Value;

use std::io;

/// Parse CON text into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use confile::{parse_text, Value};
///
/// assert_eq!(parse_text(" [1, 2.0, 2.5] ").unwrap(), Value::Array(vec![
///     Value::Integer(1),
///     Value::Integer(2),
///     Value::Float(2.5),
/// ]));
/// ```
///
/// # Errors
///
/// Returns a parse error with the line and column of the first offending
/// character. Text after the root value (other than whitespace) is an error.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_text(input: &str) -> Result<Value> {
    parse_text_with_options(input, &ConOptions::default())
}

/// Parse CON text, rejecting nesting deeper than `options.max_depth`.
///
/// # Errors
///
/// Returns a parse error with the line and column of the first offending
/// character.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_text_with_options(input: &str, options: &ConOptions) -> Result<Value> {
    let value = Parser::new(input, options).parse()?;
    tracing::debug!(input_size = input.len(), "Parsed CON text");
    Ok(value)
}

/// Render a [`Value`] as compact CON text.
///
/// Same output as the value's `Display` impl.
///
/// # Panics
///
/// The printer recurses once per nesting level and has no depth limit. A
/// tree built in code deeper than the thread's stack allows overflows the
/// stack. Trees from [`parse_text`] and [`decode_binary`] are bounded by
/// `max_depth` and print safely.
#[must_use]
pub fn print_text(value: &Value) -> String {
    print_text_with_options(value, &ConOptions::default())
}

/// Render a [`Value`] as CON text, pretty-printed when `options.pretty` is set.
///
/// Recursion is unbounded here as in [`print_text`].
///
/// # Examples
///
/// ```rust
/// use confile::{con, print_text_with_options, ConOptions};
///
/// let text = print_text_with_options(&con!({"a": [1]}), &ConOptions::pretty());
/// assert_eq!(text, "{\n  \"a\": [\n    1\n  ]\n}");
/// ```
#[must_use]
pub fn print_text_with_options(value: &Value, options: &ConOptions) -> String {
    let mut printer = Printer::new(options);
    printer.print(value);
    printer.into_inner()
}

/// Encode a [`Value`] as binary CON.
///
/// # Examples
///
/// ```rust
/// use confile::{encode_binary, ConOptions, Value};
///
/// let bytes = encode_binary(&Value::Null, &ConOptions::default()).unwrap();
/// assert_eq!(bytes, vec![0]);
/// ```
///
/// # Errors
///
/// Returns an error if the tree is nested deeper than `options.max_depth` or
/// a node body cannot be compressed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_binary(value: &Value, options: &ConOptions) -> Result<Vec<u8>> {
    let bytes = Encoder::new(options).encode(value)?;
    tracing::debug!(
        root = value.type_name(),
        output_size = bytes.len(),
        "Encoded CON binary"
    );
    Ok(bytes)
}

/// Encode a [`Value`] as binary CON into a writer.
///
/// # Errors
///
/// Returns an error if encoding fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_binary_to_writer<W>(
    mut writer: W,
    value: &Value,
    options: &ConOptions,
) -> Result<()>
where
    W: io::Write,
{
    let bytes = encode_binary(value, options)?;
    writer.write_all(&bytes).map_err(|e| Error::io(&e))?;
    writer.flush().map_err(|e| Error::io(&e))?;
    Ok(())
}

/// Decode binary CON with default options.
///
/// The root value must span the whole input.
///
/// # Examples
///
/// ```rust
/// use confile::{decode_binary, Value};
///
/// assert_eq!(decode_binary(&[1, 0]).unwrap(), Value::Bool(false));
/// assert!(decode_binary(&[1, 0, 0]).is_err());
/// ```
///
/// # Errors
///
/// Returns a decode error with the byte offset of the problem. No partial
/// tree is returned.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_binary(bytes: &[u8]) -> Result<Value> {
    decode_binary_with_options(bytes, &ConOptions::default())
}

/// Decode binary CON, rejecting nesting deeper than `options.max_depth`.
///
/// # Errors
///
/// Returns a decode error with the byte offset of the problem.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_binary_with_options(bytes: &[u8], options: &ConOptions) -> Result<Value> {
    let mut decoder = Decoder::new(bytes, options);
    let value = decoder.decode_value()?;
    decoder.finish()?;
    tracing::debug!(
        root = value.type_name(),
        input_size = bytes.len(),
        "Decoded CON binary"
    );
    Ok(value)
}

/// Decode binary CON read in full from a reader.
///
/// # Errors
///
/// Returns an error if reading fails or the bytes are not valid CON.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode_binary_from_reader<R>(mut reader: R, options: &ConOptions) -> Result<Value>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|e| Error::io(&e))?;
    decode_binary_with_options(&bytes, options)
}

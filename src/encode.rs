//! Binary CON encoding.
//!
//! Each node is written as a tag byte followed by its payload:
//!
//! | Variant | Payload |
//! |---------|---------|
//! | Null    | nothing |
//! | Boolean | 1 byte (`0`/`1`) |
//! | Integer | 8 bytes, `i64` |
//! | Float   | 8 bytes, `f64` |
//! | String  | flag, 8-byte length, bytes (compressed or raw) |
//! | Array   | flag, then either 8-byte length + compressed body, or the raw body |
//! | Object  | same framing as Array |
//!
//! An Array body is an 8-byte child count followed by every child; an Object
//! body is an 8-byte pair count followed by `key length, key bytes, value` per
//! pair in sorted key order. Children are encoded one level deeper than their
//! container, and compression is decided per node by
//! [`ConOptions::should_compress`].
//!
//! An uncompressed Array/Object has no length field: the body is written right
//! after the flag and is delimited only by its own counts. Uncompressed strings
//! do carry a length. Files written by earlier CON encoders rely on this, so
//! the layout is kept.
//!
//! Multi-byte integers use the host's native byte order; files are not
//! portable between little- and big-endian machines.

use crate::tag::{FLAG_COMPRESSED, FLAG_UNCOMPRESSED};
use crate::{compress, ConMap, ConOptions, Error, Result, Value};

/// Binary encoder for [`Value`] trees.
///
/// # Examples
///
/// ```rust
/// use confile::{ConOptions, Encoder, Value};
///
/// let options = ConOptions::default();
/// let bytes = Encoder::new(&options).encode(&Value::Bool(true)).unwrap();
/// assert_eq!(bytes, vec![1, 1]);
/// ```
pub struct Encoder<'a> {
    options: &'a ConOptions,
}

impl<'a> Encoder<'a> {
    pub fn new(options: &'a ConOptions) -> Self {
        Encoder { options }
    }

    /// Encodes `value` as a root node (level 0).
    ///
    /// # Errors
    ///
    /// Fails when the tree is nested deeper than `max_depth` or a body cannot
    /// be compressed.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(64);
        self.write_value(&mut output, value, 0)?;
        Ok(output)
    }

    fn write_value(&self, out: &mut Vec<u8>, value: &Value, level: u64) -> Result<()> {
        out.push(value.tag().as_byte());

        match value {
            Value::Null => {}
            Value::Bool(b) => out.push(u8::from(*b)),
            Value::Integer(i) => out.extend_from_slice(&i.to_ne_bytes()),
            Value::Float(f) => out.extend_from_slice(&f.to_ne_bytes()),
            Value::String(s) => {
                let body = s.as_bytes();
                if self.options.should_compress(body.len(), level) {
                    self.write_compressed(out, body, level)?;
                } else {
                    out.push(FLAG_UNCOMPRESSED);
                    write_len(out, body.len());
                    out.extend_from_slice(body);
                }
            }
            Value::Array(items) => {
                self.enter(level)?;
                let body = self.array_body(items, level)?;
                self.write_container(out, &body, level)?;
            }
            Value::Object(map) => {
                self.enter(level)?;
                let body = self.object_body(map, level)?;
                self.write_container(out, &body, level)?;
            }
        }

        Ok(())
    }

    fn enter(&self, level: u64) -> Result<()> {
        if level >= self.options.max_depth as u64 {
            return Err(Error::EncodeDepthExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    fn array_body(&self, items: &[Value], level: u64) -> Result<Vec<u8>> {
        let mut body = Vec::with_capacity(8 + items.len() * 9);
        write_len(&mut body, items.len());
        for item in items {
            self.write_value(&mut body, item, level + 1)?;
        }
        Ok(body)
    }

    fn object_body(&self, map: &ConMap, level: u64) -> Result<Vec<u8>> {
        let mut body = Vec::with_capacity(8 + map.len() * 24);
        write_len(&mut body, map.len());
        for (key, value) in map {
            write_len(&mut body, key.len());
            body.extend_from_slice(key.as_bytes());
            self.write_value(&mut body, value, level + 1)?;
        }
        Ok(body)
    }

    fn write_container(&self, out: &mut Vec<u8>, body: &[u8], level: u64) -> Result<()> {
        if self.options.should_compress(body.len(), level) {
            self.write_compressed(out, body, level)
        } else {
            out.push(FLAG_UNCOMPRESSED);
            out.extend_from_slice(body);
            Ok(())
        }
    }

    fn write_compressed(&self, out: &mut Vec<u8>, body: &[u8], level: u64) -> Result<()> {
        let packed = compress::compress(body, self.options.compression)?;
        tracing::trace!(
            level,
            body_size = body.len(),
            compressed_size = packed.len(),
            "Compressed node body"
        );
        out.push(FLAG_COMPRESSED);
        write_len(out, packed.len());
        out.extend_from_slice(&packed);
        Ok(())
    }
}

#[inline]
fn write_len(out: &mut Vec<u8>, len: usize) {
    out.extend_from_slice(&(len as u64).to_ne_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value) -> Vec<u8> {
        Encoder::new(&ConOptions::default()).encode(value).unwrap()
    }

    fn ne(n: u64) -> [u8; 8] {
        n.to_ne_bytes()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encode(&Value::Null), vec![0]);
        assert_eq!(encode(&Value::Bool(false)), vec![1, 0]);

        let mut expected = vec![2];
        expected.extend_from_slice(&(-5i64).to_ne_bytes());
        assert_eq!(encode(&Value::Integer(-5)), expected);

        let mut expected = vec![3];
        expected.extend_from_slice(&1.25f64.to_ne_bytes());
        assert_eq!(encode(&Value::Float(1.25)), expected);
    }

    #[test]
    fn test_short_string_has_length() {
        let mut expected = vec![4, 0];
        expected.extend_from_slice(&ne(2));
        expected.extend_from_slice(b"hi");
        assert_eq!(encode(&Value::from("hi")), expected);
    }

    #[test]
    fn test_uncompressed_array_has_no_length() {
        let value = Value::Array(vec![Value::Null, Value::Bool(true)]);
        let mut expected = vec![5, 0];
        expected.extend_from_slice(&ne(2));
        expected.extend_from_slice(&[0, 1, 1]);
        assert_eq!(encode(&value), expected);
    }

    #[test]
    fn test_object_keys_sorted() {
        let mut map = ConMap::new();
        map.insert("b".to_string(), Value::Null);
        map.insert("a".to_string(), Value::Null);

        let mut expected = vec![6, 0];
        expected.extend_from_slice(&ne(2));
        expected.extend_from_slice(&ne(1));
        expected.extend_from_slice(b"a");
        expected.push(0);
        expected.extend_from_slice(&ne(1));
        expected.extend_from_slice(b"b");
        expected.push(0);
        assert_eq!(encode(&Value::Object(map)), expected);
    }

    #[test]
    fn test_depth_limit() {
        let mut value = Value::Null;
        for _ in 0..4 {
            value = Value::Array(vec![value]);
        }
        let options = ConOptions::new().with_max_depth(3);
        let err = Encoder::new(&options).encode(&value).unwrap_err();
        assert!(matches!(err, Error::EncodeDepthExceeded { limit: 3 }));

        let options = ConOptions::new().with_max_depth(4);
        assert!(Encoder::new(&options).encode(&value).is_ok());
    }
}

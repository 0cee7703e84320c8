//! Binary CON decoding.
//!
//! The decoder mirrors [`Encoder`](crate::Encoder): it reads a tag, then the
//! payload for that tag, recursing into containers. Compressed bodies are
//! inflated and decoded by a nested decoder that must consume the whole
//! decompressed buffer. Uncompressed Array/Object bodies are read straight
//! from the live input, since they carry no length field.
//!
//! All reads are bounds-checked against the input slice. Lengths and counts
//! are validated against the bytes that remain before anything is allocated,
//! so a corrupt length cannot trigger a huge allocation or a read past the end.

use crate::tag::{FLAG_COMPRESSED, FLAG_UNCOMPRESSED};
use crate::{compress, ConMap, ConOptions, Error, Result, Tag, Value};

/// Smallest encoded Array element: a bare tag byte.
const MIN_ELEMENT_SIZE: u64 = 1;

/// Smallest encoded Object pair: key length field plus a bare tag byte.
const MIN_PAIR_SIZE: u64 = 9;

/// Binary decoder over a byte slice.
///
/// # Examples
///
/// ```rust
/// use confile::{ConOptions, Decoder, Value};
///
/// let options = ConOptions::default();
/// let mut decoder = Decoder::new(&[1, 1, 0], &options);
/// assert_eq!(decoder.decode_value().unwrap(), Value::Bool(true));
/// assert_eq!(decoder.remaining(), 1);
/// assert!(decoder.finish().is_err());
/// ```
pub struct Decoder<'a> {
    input: &'a [u8],
    position: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8], options: &ConOptions) -> Self {
        Decoder {
            input,
            position: 0,
            max_depth: options.max_depth,
        }
    }

    /// Current byte offset into the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of input bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    /// Decodes one root node (level 0) starting at the current position.
    ///
    /// # Errors
    ///
    /// Returns a decode error naming the offset and field of the first
    /// malformed byte, or a compression error for a corrupt compressed body.
    pub fn decode_value(&mut self) -> Result<Value> {
        self.read_value(0)
    }

    /// Fails with [`Error::TrailingBytes`] unless all input was consumed.
    pub fn finish(self) -> Result<()> {
        if self.position == self.input.len() {
            Ok(())
        } else {
            Err(Error::TrailingBytes {
                offset: self.position,
                count: self.remaining(),
            })
        }
    }

    fn read_value(&mut self, level: u64) -> Result<Value> {
        let offset = self.position;
        let byte = self.read_u8("tag")?;
        let tag = Tag::from_byte(byte).ok_or(Error::UnknownTag { offset, tag: byte })?;

        match tag {
            Tag::Null => Ok(Value::Null),
            Tag::Boolean => {
                let offset = self.position;
                match self.read_u8("boolean")? {
                    0 => Ok(Value::Bool(false)),
                    1 => Ok(Value::Bool(true)),
                    byte => Err(Error::InvalidByte {
                        offset,
                        field: "boolean",
                        byte,
                    }),
                }
            }
            Tag::Integer => Ok(Value::Integer(i64::from_ne_bytes(
                self.read_array("integer")?,
            ))),
            Tag::Float => Ok(Value::Float(f64::from_ne_bytes(self.read_array("float")?))),
            Tag::String => {
                let body_offset;
                let bytes = if self.read_flag()? {
                    body_offset = self.position;
                    self.read_compressed("string")?
                } else {
                    let len = self.read_len("string length")?;
                    body_offset = self.position;
                    self.read_bytes(len, "string")?.to_vec()
                };
                String::from_utf8(bytes)
                    .map(Value::String)
                    .map_err(|_| Error::InvalidUtf8 {
                        offset: body_offset,
                        field: "string",
                    })
            }
            Tag::Array => {
                self.enter(level)?;
                if self.read_flag()? {
                    let offset = self.position;
                    let body = self.read_compressed("array")?;
                    self.decode_body(&body, offset, |d| d.read_array_body(level))
                        .map(Value::Array)
                } else {
                    self.read_array_body(level).map(Value::Array)
                }
            }
            Tag::Object => {
                self.enter(level)?;
                if self.read_flag()? {
                    let offset = self.position;
                    let body = self.read_compressed("object")?;
                    self.decode_body(&body, offset, |d| d.read_object_body(level))
                        .map(Value::Object)
                } else {
                    self.read_object_body(level).map(Value::Object)
                }
            }
        }
    }

    fn enter(&self, level: u64) -> Result<()> {
        if level >= self.max_depth as u64 {
            return Err(Error::DecodeDepthExceeded {
                offset: self.position.saturating_sub(1),
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn read_array_body(&mut self, level: u64) -> Result<Vec<Value>> {
        let count = self.read_count("array count", MIN_ELEMENT_SIZE)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.read_value(level + 1)?);
        }
        Ok(items)
    }

    fn read_object_body(&mut self, level: u64) -> Result<ConMap> {
        let count = self.read_count("object count", MIN_PAIR_SIZE)?;
        let mut map = ConMap::new();
        for _ in 0..count {
            let key_len = self.read_len("key length")?;
            let key_offset = self.position;
            let key = self.read_bytes(key_len, "key")?;
            let key = std::str::from_utf8(key)
                .map_err(|_| Error::InvalidUtf8 {
                    offset: key_offset,
                    field: "key",
                })?
                .to_string();
            let value = self.read_value(level + 1)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    /// Runs `read` over a decompressed body with a nested decoder.
    ///
    /// The nested decoder must consume the body exactly; its errors are
    /// wrapped with the offset of the compressed payload.
    fn decode_body<T>(
        &self,
        body: &[u8],
        offset: usize,
        read: impl FnOnce(&mut Decoder<'_>) -> Result<T>,
    ) -> Result<T> {
        let mut nested = Decoder {
            input: body,
            position: 0,
            max_depth: self.max_depth,
        };
        read(&mut nested)
            .and_then(|value| nested.finish().map(|()| value))
            .map_err(|err| Error::in_compressed_body(offset, err))
    }

    fn read_flag(&mut self) -> Result<bool> {
        let offset = self.position;
        match self.read_u8("compression flag")? {
            FLAG_UNCOMPRESSED => Ok(false),
            FLAG_COMPRESSED => Ok(true),
            byte => Err(Error::InvalidByte {
                offset,
                field: "compression flag",
                byte,
            }),
        }
    }

    fn read_compressed(&mut self, field: &'static str) -> Result<Vec<u8>> {
        let len = self.read_len("compressed length")?;
        let packed = self.read_bytes(len, field)?;
        let body = compress::decompress(packed)?;
        tracing::trace!(
            field,
            compressed_size = packed.len(),
            body_size = body.len(),
            "Decompressed node body"
        );
        Ok(body)
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.read_bytes(1, field)?[0])
    }

    fn read_array(&mut self, field: &'static str) -> Result<[u8; 8]> {
        let bytes = self.read_bytes(8, field)?;
        let mut out = [0u8; 8];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn read_u64(&mut self, field: &'static str) -> Result<u64> {
        self.read_array(field).map(u64::from_ne_bytes)
    }

    /// Reads a byte length that must fit in the remaining input.
    fn read_len(&mut self, field: &'static str) -> Result<usize> {
        let offset = self.position;
        let len = self.read_u64(field)?;
        match usize::try_from(len) {
            Ok(len) if len <= self.remaining() => Ok(len),
            _ => Err(Error::truncated(offset, field, len, self.remaining())),
        }
    }

    /// Reads an element count, rejecting counts the remaining input cannot hold.
    fn read_count(&mut self, field: &'static str, min_size: u64) -> Result<usize> {
        let offset = self.position;
        let count = self.read_u64(field)?;
        let available = self.remaining();
        match count.checked_mul(min_size) {
            Some(needed) if needed <= available as u64 => Ok(count as usize),
            needed => Err(Error::truncated(
                offset,
                field,
                needed.unwrap_or(u64::MAX),
                available,
            )),
        }
    }

    fn read_bytes(&mut self, len: usize, field: &'static str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::truncated(
                self.position,
                field,
                len as u64,
                self.remaining(),
            ));
        }
        let start = self.position;
        self.position += len;
        Ok(&self.input[start..self.position])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Result<Value> {
        let options = ConOptions::default();
        let mut decoder = Decoder::new(bytes, &options);
        let value = decoder.decode_value()?;
        decoder.finish()?;
        Ok(value)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode(&[0]).unwrap(), Value::Null);
        assert_eq!(decode(&[1, 0]).unwrap(), Value::Bool(false));

        let mut bytes = vec![2];
        bytes.extend_from_slice(&7i64.to_ne_bytes());
        assert_eq!(decode(&bytes).unwrap(), Value::Integer(7));
    }

    #[test]
    fn test_empty_input() {
        let err = decode(&[]).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                offset: 0,
                field: "tag",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_tag() {
        let err = decode(&[9]).unwrap_err();
        assert!(matches!(err, Error::UnknownTag { offset: 0, tag: 9 }));
    }

    #[test]
    fn test_invalid_boolean_byte() {
        let err = decode(&[1, 2]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidByte {
                offset: 1,
                field: "boolean",
                byte: 2
            }
        ));
    }

    #[test]
    fn test_truncated_integer() {
        let err = decode(&[2, 1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                offset: 1,
                field: "integer",
                needed: 8,
                available: 3
            }
        ));
    }

    #[test]
    fn test_string_length_past_end() {
        let mut bytes = vec![4, 0];
        bytes.extend_from_slice(&u64::MAX.to_ne_bytes());
        bytes.extend_from_slice(b"abc");
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                offset: 2,
                field: "string length",
                ..
            }
        ));
    }

    #[test]
    fn test_huge_array_count_rejected_before_allocation() {
        let mut bytes = vec![5, 0];
        bytes.extend_from_slice(&(1u64 << 60).to_ne_bytes());
        bytes.push(0);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                field: "array count",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_utf8_key() {
        let mut bytes = vec![6, 0];
        bytes.extend_from_slice(&1u64.to_ne_bytes());
        bytes.extend_from_slice(&1u64.to_ne_bytes());
        bytes.push(0xff);
        bytes.push(0);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidUtf8 {
                offset: 18,
                field: "key"
            }
        ));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let mut bytes = vec![6, 0];
        bytes.extend_from_slice(&2u64.to_ne_bytes());
        for flag in [0u8, 1] {
            bytes.extend_from_slice(&1u64.to_ne_bytes());
            bytes.push(b'k');
            bytes.extend_from_slice(&[1, flag]);
        }
        let value = decode(&bytes).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("k"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_invalid_flag() {
        let err = decode(&[5, 7]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidByte {
                field: "compression flag",
                byte: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_depth_limit() {
        // [[[[]]]] uncompressed: each level is tag, flag, count
        let mut bytes = Vec::new();
        for i in 0..4 {
            bytes.extend_from_slice(&[5, 0]);
            let count: u64 = if i < 3 { 1 } else { 0 };
            bytes.extend_from_slice(&count.to_ne_bytes());
        }
        let options = ConOptions::new().with_max_depth(3);
        let err = Decoder::new(&bytes, &options).decode_value().unwrap_err();
        assert!(matches!(
            err,
            Error::DecodeDepthExceeded {
                offset: 30,
                limit: 3
            }
        ));
        assert!(decode(&bytes).is_ok());
    }
}

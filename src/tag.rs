//! Tag and flag bytes of the CON binary format.
//!
//! Every node starts with a 1-byte tag naming its variant. String, Array and
//! Object nodes follow the tag with a 1-byte compression flag.

/// Variant identifier written as the first byte of every node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tag {
    Null = 0,
    Boolean = 1,
    Integer = 2,
    Float = 3,
    String = 4,
    Array = 5,
    Object = 6,
}

/// Flag byte: body follows uncompressed.
pub const FLAG_UNCOMPRESSED: u8 = 0;

/// Flag byte: an 8-byte length and a DEFLATE-compressed body follow.
pub const FLAG_COMPRESSED: u8 = 1;

impl Tag {
    /// Parses a tag byte, returning `None` for bytes outside the known set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confile::Tag;
    ///
    /// assert_eq!(Tag::from_byte(5), Some(Tag::Array));
    /// assert_eq!(Tag::from_byte(7), None);
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Tag::Null),
            1 => Some(Tag::Boolean),
            2 => Some(Tag::Integer),
            3 => Some(Tag::Float),
            4 => Some(Tag::String),
            5 => Some(Tag::Array),
            6 => Some(Tag::Object),
            _ => None,
        }
    }

    /// Get the raw tag byte.
    #[inline]
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Get the variant name (for error messages).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Tag::Null => "Null",
            Tag::Boolean => "Boolean",
            Tag::Integer => "Integer",
            Tag::Float => "Float",
            Tag::String => "String",
            Tag::Array => "Array",
            Tag::Object => "Object",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_roundtrip() {
        for b in 0..=6u8 {
            let tag = Tag::from_byte(b).unwrap();
            assert_eq!(tag.as_byte(), b);
        }
        for b in 7..=255u8 {
            assert!(Tag::from_byte(b).is_none());
        }
    }
}

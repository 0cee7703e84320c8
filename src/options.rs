//! Configuration for CON encoding, decoding and printing.
//!
//! [`ConOptions`] is threaded explicitly into every operation; there is no
//! process-wide state. It carries:
//!
//! - the compression policy (size threshold, level window, DEFLATE effort)
//! - the nesting limit applied by the parser, encoder and decoder
//! - the printer layout (compact or pretty with an indent width)
//!
//! ## Examples
//!
//! ```rust
//! use confile::{con, encode_binary, ConOptions};
//!
//! let value = con!({"name": "Alice", "tags": ["a", "b"]});
//!
//! // Allow compression on the root and its direct children
//! let options = ConOptions::new()
//!     .with_compression_threshold(64)
//!     .with_compression_window(0, 1);
//! let bytes = encode_binary(&value, &options).unwrap();
//! assert!(!bytes.is_empty());
//! ```

use flate2::Compression;

/// Body size (in bytes) a node must exceed before it is compressed.
pub const DEFAULT_COMPRESSION_THRESHOLD: usize = 256;

/// Default nesting limit for arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for CON operations.
///
/// The compression window `[compression_level_min, compression_level_max]` is
/// inclusive; with the defaults (0, 0) only the root node can be compressed.
///
/// # Examples
///
/// ```rust
/// use confile::ConOptions;
///
/// let options = ConOptions::new();
/// assert!(options.should_compress(257, 0));
/// assert!(!options.should_compress(256, 0));
/// assert!(!options.should_compress(10_000, 1));
/// ```
#[derive(Clone, Debug)]
pub struct ConOptions {
    pub compression_threshold: usize,
    pub compression_level_min: u64,
    pub compression_level_max: u64,
    pub compression: Compression,
    pub max_depth: usize,
    pub pretty: bool,
    pub indent: usize,
}

impl Default for ConOptions {
    fn default() -> Self {
        ConOptions {
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
            compression_level_min: 0,
            compression_level_max: 0,
            compression: Compression::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            pretty: false,
            indent: 2,
        }
    }
}

impl ConOptions {
    /// Creates default options (threshold 256, window 0..=0, depth 128, compact text).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options for pretty-printed text output.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confile::ConOptions;
    ///
    /// let options = ConOptions::pretty();
    /// assert!(options.pretty);
    /// assert_eq!(options.indent, 2);
    /// ```
    #[must_use]
    pub fn pretty() -> Self {
        ConOptions {
            pretty: true,
            ..Default::default()
        }
    }

    /// Sets the body size a node must exceed to be compressed.
    #[must_use]
    pub fn with_compression_threshold(mut self, threshold: usize) -> Self {
        self.compression_threshold = threshold;
        self
    }

    /// Sets the inclusive range of levels eligible for compression.
    ///
    /// Level 0 is the root; children of a container sit one level deeper.
    #[must_use]
    pub fn with_compression_window(mut self, min: u64, max: u64) -> Self {
        self.compression_level_min = min;
        self.compression_level_max = max;
        self
    }

    /// Sets the DEFLATE effort (0 = store, 9 = best).
    ///
    /// Values above 9 are clamped.
    #[must_use]
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression = Compression::new(level.min(9));
        self
    }

    /// Disables compression entirely.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confile::ConOptions;
    ///
    /// let options = ConOptions::new().without_compression();
    /// assert!(!options.should_compress(1 << 20, 0));
    /// ```
    #[must_use]
    pub fn without_compression(mut self) -> Self {
        self.compression_threshold = usize::MAX;
        self
    }

    /// Sets the maximum nesting depth of arrays and objects.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the indentation width used when pretty-printing.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Returns `true` if a node body of `body_len` bytes at `level` must be compressed.
    #[inline]
    #[must_use]
    pub fn should_compress(&self, body_len: usize, level: u64) -> bool {
        body_len > self.compression_threshold
            && level >= self.compression_level_min
            && level <= self.compression_level_max
    }
}

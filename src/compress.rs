//! DEFLATE compression of node bodies.
//!
//! Bodies are compressed as zlib streams (DEFLATE with the zlib header and
//! Adler-32 trailer), streamed through a fixed 64 KiB buffer. This module adds
//! no framing of its own; flag and length bytes belong to the binary encoder.

use crate::{Error, Result};
use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

/// Size of the intermediate output buffer.
const CHUNK_SIZE: usize = 64 * 1024;

/// Compresses `input` into a complete zlib stream.
///
/// # Examples
///
/// ```rust
/// use confile::compress::{compress, decompress};
/// use flate2::Compression;
///
/// let data = vec![b'x'; 4096];
/// let packed = compress(&data, Compression::default()).unwrap();
/// assert!(packed.len() < data.len());
/// assert_eq!(decompress(&packed).unwrap(), data);
/// ```
///
/// # Errors
///
/// Returns [`Error::Compression`] if the underlying stream reports an error.
pub fn compress(input: &[u8], level: Compression) -> Result<Vec<u8>> {
    let mut stream = Compress::new(level, true);
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut output = Vec::with_capacity(input.len() / 2 + 16);

    loop {
        let consumed = stream.total_in() as usize;
        let produced_before = stream.total_out();

        let status = stream
            .compress(&input[consumed..], &mut buffer, FlushCompress::Finish)
            .map_err(Error::compression)?;

        let produced = (stream.total_out() - produced_before) as usize;
        output.extend_from_slice(&buffer[..produced]);

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                if produced == 0 && stream.total_in() as usize == consumed {
                    return Err(Error::compression("deflate stream made no progress"));
                }
            }
        }
    }

    if output.len() >= input.len() {
        tracing::debug!(
            input_size = input.len(),
            compressed_size = output.len(),
            "Compression did not shrink body"
        );
    }

    Ok(output)
}

/// Decompresses a complete zlib stream.
///
/// # Errors
///
/// Returns [`Error::Compression`] when the stream is corrupt, ends before the
/// end-of-stream marker, or is followed by extra bytes. No partial output is
/// ever returned.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut stream = Decompress::new(true);
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut output = Vec::with_capacity(input.len().saturating_mul(2));

    loop {
        let consumed = stream.total_in() as usize;
        let produced_before = stream.total_out();

        let status = stream
            .decompress(&input[consumed..], &mut buffer, FlushDecompress::None)
            .map_err(Error::compression)?;

        let produced = (stream.total_out() - produced_before) as usize;
        output.extend_from_slice(&buffer[..produced]);

        let now_consumed = stream.total_in() as usize;
        match status {
            Status::StreamEnd => {
                if now_consumed != input.len() {
                    return Err(Error::compression(format!(
                        "{} bytes after end of compressed stream",
                        input.len() - now_consumed
                    )));
                }
                return Ok(output);
            }
            Status::Ok | Status::BufError => {
                if produced == 0 && now_consumed == consumed {
                    if now_consumed == input.len() {
                        return Err(Error::compression("truncated compressed stream"));
                    }
                    return Err(Error::compression("inflate stream made no progress"));
                }
            }
        }
    }
}

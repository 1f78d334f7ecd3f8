//! Compression support for VGM files
//!
//! VGM logs are commonly distributed gzip-compressed with a `.vgz`
//! extension. This module detects the gzip magic and inflates the stream
//! with `flate2`; anything else passes through unchanged, so callers never
//! need to know which container they were handed.
//!
//! Decompression is bounded by [`MAX_DECOMPRESSED_SIZE`] so a hostile or
//! corrupted archive cannot exhaust memory.

use crate::{Result, Sn76489Error};
use flate2::read::GzDecoder;
use std::io::Read;

/// gzip member magic (RFC 1952)
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Maximum decompressed size: 64MB
///
/// Uncompressed VGM logs for PSG-only music are rarely above a few MB.
pub const MAX_DECOMPRESSED_SIZE: usize = 64 * 1024 * 1024;

/// Automatically decompress gzip data if compressed, otherwise return as-is
///
/// # Returns
/// - `Ok(Vec<u8>)` - Decompressed or original data
/// - `Err` - If the gzip stream is corrupt or exceeds the size limit
///
/// # Examples
/// ```no_run
/// use sn76489::compression::decompress_if_needed;
///
/// let data = std::fs::read("song.vgz").unwrap();
/// let vgm = decompress_if_needed(&data).unwrap();
/// assert!(vgm.starts_with(b"Vgm "));
/// ```
pub fn decompress_if_needed(data: &[u8]) -> Result<Vec<u8>> {
    if !is_gzip_compressed(data) {
        return Ok(data.to_vec());
    }

    let decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();

    // One byte past the limit tells a file of exactly the limit apart from a truncated bomb.
    let mut limited_reader = decoder.take(MAX_DECOMPRESSED_SIZE as u64 + 1);
    limited_reader.read_to_end(&mut decompressed).map_err(|e| {
        Sn76489Error::DecompressionError(format!("gzip decompression failed: {}", e))
    })?;

    if decompressed.len() > MAX_DECOMPRESSED_SIZE {
        return Err(Sn76489Error::DecompressionError(format!(
            "Decompressed data exceeded maximum safe size ({} MB). \
             The file may be corrupted or an attempted decompression bomb.",
            MAX_DECOMPRESSED_SIZE / (1024 * 1024)
        )));
    }

    log::debug!(
        "Decompressed gzip container: {} -> {} bytes",
        data.len(),
        decompressed.len()
    );
    Ok(decompressed)
}

/// Detect if data is gzip-compressed by checking the magic bytes
pub fn is_gzip_compressed(data: &[u8]) -> bool {
    data.starts_with(&GZIP_MAGIC)
}

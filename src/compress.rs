//! Payload codec: zlib.
//!
//! Document payloads are pushed as zlib-deflated bytes so the index side can
//! decompress with any standard zlib implementation. The codec is declared on
//! every document (`compressionType`), never assumed.

use anyhow::Result;
use flate2::write::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;
use std::io::Write;

/// Fixed level so identical input always produces identical output.
const LEVEL: u32 = 6;

/// Compresses `bytes` with zlib.
pub fn deflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(LEVEL));
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

/// Inverse of [`deflate`]. The pipeline itself never decompresses; this keeps
/// the round-trip provable in tests.
pub fn inflate(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(Vec::new());
    decoder.write_all(bytes)?;
    Ok(decoder.finish()?)
}

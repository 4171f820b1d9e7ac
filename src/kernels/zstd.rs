//! This module contains the pure, stateless kernel for Zstandard compression
//! and decompression, exposed as the `Zstd` codec.
//!
//! The encoded form is a varint uncompressed-size header followed by a single
//! Zstd frame. The header lets decode validate the recovered size, so a
//! corrupted stream can never hand the caller a partially-filled buffer.
//! This module is a safe, panic-free wrapper around the `zstd` crate.

use std::io::{Cursor, Write};

use crate::error::LapisError;
use crate::kernels::varint;
use crate::traits::Codec;

//==================================================================================
// 1. Core Logic (The "Engine")
//==================================================================================

/// Compresses a byte slice, prepending the uncompressed size as a varint.
fn encode_bytes(input: &[u8], level: i32) -> Result<Vec<u8>, LapisError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut output = Vec::with_capacity(input.len() / 2 + 16);
    varint::encode_usize(input.len(), &mut output)?;

    // The streaming Encoder writes directly into the output buffer, after
    // the size header.
    let mut encoder = zstd::stream::Encoder::new(&mut output, level)
        .map_err(|e| LapisError::ZstdError(e.to_string()))?;
    encoder
        .write_all(input)
        .map_err(|e| LapisError::ZstdError(e.to_string()))?;

    // `finish` is essential to finalize the Zstd frame.
    encoder
        .finish()
        .map_err(|e| LapisError::ZstdError(e.to_string()))?;

    Ok(output)
}

/// Decompresses a size-prefixed Zstd stream, validating the declared size.
fn decode_bytes(input: &[u8]) -> Result<Vec<u8>, LapisError> {
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut cursor = Cursor::new(input);
    let expected_len = varint::decode_usize(&mut cursor)?;
    let compressed = &input[cursor.position() as usize..];

    let mut output = Vec::new();
    zstd::stream::copy_decode(compressed, &mut output)
        .map_err(|e| LapisError::ZstdError(e.to_string()))?;

    if output.len() != expected_len {
        return Err(LapisError::ZstdError(format!(
            "decompressed size does not match header: expected {}, got {}",
            expected_len,
            output.len()
        )));
    }

    Ok(output)
}

//==================================================================================
// 2. The Codec
//==================================================================================

/// Zstandard compression at a fixed level.
#[derive(Debug, Clone, Copy)]
pub struct Zstd {
    level: i32,
}

impl Zstd {
    /// The registry identifier for this codec.
    pub const CODEC_ID: &'static str = "zstd";

    pub fn new(level: i32) -> Self {
        Self { level }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for Zstd {
    fn default() -> Self {
        Self { level: 3 }
    }
}

impl Codec for Zstd {
    fn id(&self) -> &str {
        Self::CODEC_ID
    }

    fn encode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError> {
        encode_bytes(buf, self.level)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, LapisError> {
        decode_bytes(bytes)
    }

    fn get_config(&self) -> Result<serde_json::Value, LapisError> {
        Ok(serde_json::json!({ "id": Self::CODEC_ID, "level": self.level }))
    }
}

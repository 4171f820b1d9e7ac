//! This module contains the pure, stateless kernel for byte-level Run-Length
//! Encoding, exposed as the `Rle` codec.
//!
//! The encoded form is a sequence of `(value, run_length)` pairs, where the
//! run length is LEB128-encoded for space efficiency. Highly effective for
//! buffers with long contiguous runs of identical bytes; pathological for
//! high-entropy input (up to 2x expansion), which is exactly what best-of
//! selection is for.

use std::io::Cursor;

use crate::error::LapisError;
use crate::kernels::varint;
use crate::traits::Codec;

//==================================================================================
// 1. Core Logic
//==================================================================================

fn encode_bytes(input: &[u8], output_buf: &mut Vec<u8>) -> Result<(), LapisError> {
    output_buf.clear();
    if input.is_empty() {
        return Ok(());
    }

    let mut current = input[0];
    let mut run: u64 = 1;

    for &byte in &input[1..] {
        if byte == current {
            run += 1;
        } else {
            output_buf.push(current);
            varint::encode_one(run, output_buf)?;
            current = byte;
            run = 1;
        }
    }

    output_buf.push(current);
    varint::encode_one(run, output_buf)?;
    Ok(())
}

fn decode_bytes(input: &[u8], output_buf: &mut Vec<u8>) -> Result<(), LapisError> {
    output_buf.clear();
    let mut cursor = Cursor::new(input);

    while (cursor.position() as usize) < input.len() {
        let pos = cursor.position() as usize;
        let value = input[pos];
        cursor.set_position((pos + 1) as u64);

        let run = varint::decode_one::<u64>(&mut cursor)?;
        // The encoder never emits empty runs; one in the stream is corruption.
        if run == 0 {
            return Err(LapisError::MalformedStream(
                "run length of zero in RLE stream".into(),
            ));
        }
        let run = usize::try_from(run).map_err(|_| {
            LapisError::MalformedStream(format!(
                "RLE run length {} exceeds the platform integer width",
                run
            ))
        })?;

        output_buf.extend(std::iter::repeat(value).take(run));
    }

    Ok(())
}

//==================================================================================
// 2. The Codec
//==================================================================================

/// Byte-level run-length encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rle;

impl Rle {
    /// The registry identifier for this codec.
    pub const CODEC_ID: &'static str = "rle";

    pub fn new() -> Self {
        Self
    }
}

impl Codec for Rle {
    fn id(&self) -> &str {
        Self::CODEC_ID
    }

    fn encode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut output = Vec::with_capacity(buf.len() / 2 + 2);
        encode_bytes(buf, &mut output)?;
        Ok(output)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut output = Vec::with_capacity(bytes.len());
        decode_bytes(bytes, &mut output)?;
        Ok(output)
    }

    fn get_config(&self) -> Result<serde_json::Value, LapisError> {
        Ok(serde_json::json!({ "id": Self::CODEC_ID }))
    }
}

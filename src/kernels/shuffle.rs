//! This module contains the pure, stateless kernel for byte-shuffling
//! streams of fixed-width elements, exposed as the `Shuffle` codec.
//!
//! The transform reorganizes a row-oriented byte stream into a byte-plane
//! layout: all first bytes of every element, then all second bytes, and so
//! on. It changes no byte values and never changes the buffer length, but
//! groups similar bytes together so a following entropy coder compresses
//! better.

use crate::error::LapisError;
use crate::traits::Codec;

//==================================================================================
// 1. Core Logic (The "Engine")
//==================================================================================

fn shuffle_bytes(
    input: &[u8],
    element_size: usize,
    output_buf: &mut Vec<u8>,
) -> Result<(), LapisError> {
    // Single-byte elements are already in byte-plane order.
    if element_size <= 1 {
        output_buf.clear();
        output_buf.extend_from_slice(input);
        return Ok(());
    }

    if input.len() % element_size != 0 {
        return Err(LapisError::BufferMismatch(element_size, input.len()));
    }

    let num_elements = input.len() / element_size;
    output_buf.clear();
    output_buf.resize(input.len(), 0);

    for i in 0..element_size {
        for j in 0..num_elements {
            output_buf[i * num_elements + j] = input[j * element_size + i];
        }
    }

    Ok(())
}

fn unshuffle_bytes(
    input: &[u8],
    element_size: usize,
    output_buf: &mut Vec<u8>,
) -> Result<(), LapisError> {
    if element_size <= 1 {
        output_buf.clear();
        output_buf.extend_from_slice(input);
        return Ok(());
    }

    if input.len() % element_size != 0 {
        return Err(LapisError::BufferMismatch(element_size, input.len()));
    }

    let num_elements = input.len() / element_size;
    output_buf.clear();
    output_buf.resize(input.len(), 0);

    for i in 0..element_size {
        for j in 0..num_elements {
            output_buf[j * element_size + i] = input[i * num_elements + j];
        }
    }

    Ok(())
}

//==================================================================================
// 2. The Codec
//==================================================================================

/// Byte-plane shuffle over fixed-width elements.
#[derive(Debug, Clone, Copy)]
pub struct Shuffle {
    element_size: usize,
}

impl Shuffle {
    /// The registry identifier for this codec.
    pub const CODEC_ID: &'static str = "shuffle";

    pub fn new(element_size: usize) -> Self {
        Self { element_size }
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }
}

impl Codec for Shuffle {
    fn id(&self) -> &str {
        Self::CODEC_ID
    }

    fn encode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut output = Vec::new();
        shuffle_bytes(buf, self.element_size, &mut output)?;
        Ok(output)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut output = Vec::new();
        unshuffle_bytes(bytes, self.element_size, &mut output)?;
        Ok(output)
    }

    fn get_config(&self) -> Result<serde_json::Value, LapisError> {
        Ok(serde_json::json!({
            "id": Self::CODEC_ID,
            "element_size": self.element_size,
        }))
    }
}

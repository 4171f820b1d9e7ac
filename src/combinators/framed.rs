// In: src/combinators/framed.rs

//! This module defines `FramedCodecStack`, which makes a codec stack's stage
//! boundaries explicit so decode never depends on a stage being
//! self-delimiting.
//!
//! The frame stream is the single source of truth for the wire layout:
//!
//! ```text
//! framed  := varint(len_1) varint(len_2) ... varint(len_n) payload
//! len_i   := byte length of stage i's encode output, in stage order
//! payload := the final stage's output; its length must equal len_n
//! ```
//!
//! One frame is recorded per stage. Non-terminal payloads are not stored --
//! each is reproduced by the following stage's decode -- but their recorded
//! lengths let decode allocate and validate every intermediate buffer, which
//! is what makes the stream self-describing with no out-of-band shape
//! knowledge and no parsing backtracking. An empty wrapped stack produces
//! zero varints followed by the input verbatim, preserving the identity
//! property.

use std::io::Cursor;

use crate::combinators::stack::{stage_failure, CodecStack};
use crate::error::LapisError;
use crate::kernels::varint;
use crate::traits::Codec;

/// A sanity limit on declared frame lengths, to prevent OOM on corrupted or
/// hostile length prefixes before any allocation happens. (4 GiB)
const MAX_REASONABLE_FRAME_LEN: u64 = 4 * 1024 * 1024 * 1024;

/// A codec stack whose encoded form carries every stage's output length.
pub struct FramedCodecStack {
    stack: CodecStack,
}

impl FramedCodecStack {
    /// The registry identifier for this combinator.
    pub const CODEC_ID: &'static str = "framed";

    pub fn new(stack: CodecStack) -> Self {
        Self { stack }
    }

    /// Frames a single codec (a stack of one).
    pub fn wrap(codec: Box<dyn Codec>) -> Self {
        Self::new(CodecStack::new(vec![codec]))
    }

    pub fn stack(&self) -> &CodecStack {
        &self.stack
    }

    /// Parses only the frame header of an encoded stream, returning the
    /// recorded stage output lengths without decoding any payload.
    pub fn peek_frame_lengths(&self, bytes: &[u8]) -> Result<Vec<u64>, LapisError> {
        let (lengths, _) = self.parse_frame_header(bytes)?;
        Ok(lengths)
    }

    /// Reads the stack's varint length prefixes; returns the recorded
    /// lengths and the offset where the payload begins.
    fn parse_frame_header(&self, bytes: &[u8]) -> Result<(Vec<u64>, usize), LapisError> {
        let mut cursor = Cursor::new(bytes);
        let mut lengths = Vec::with_capacity(self.stack.len());

        for frame in 0..self.stack.len() {
            let len = varint::decode_one::<u64>(&mut cursor)?;
            // SECURITY: validate the declared length before it is ever used
            // to size an allocation.
            if len > MAX_REASONABLE_FRAME_LEN {
                return Err(LapisError::MalformedStream(format!(
                    "frame {} declares length {} exceeding the {} byte limit",
                    frame + 1,
                    len,
                    MAX_REASONABLE_FRAME_LEN
                )));
            }
            lengths.push(len);
        }

        Ok((lengths, cursor.position() as usize))
    }
}

impl Codec for FramedCodecStack {
    fn id(&self) -> &str {
        Self::CODEC_ID
    }

    fn encode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut encoded = buf.to_vec();
        let mut lengths = Vec::with_capacity(self.stack.len());
        for codec in self.stack.iter() {
            encoded = codec.encode(&encoded)?;
            lengths.push(encoded.len());
        }

        let mut output = Vec::with_capacity(encoded.len() + lengths.len() * 2);
        for len in lengths {
            varint::encode_usize(len, &mut output)?;
        }
        output.extend_from_slice(&encoded);
        Ok(output)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, LapisError> {
        let (lengths, payload_offset) = self.parse_frame_header(bytes)?;
        let payload = &bytes[payload_offset..];

        // Zero stages: the payload is the original buffer.
        if self.stack.is_empty() {
            return Ok(payload.to_vec());
        }

        let final_len = lengths[lengths.len() - 1];
        if payload.len() as u64 != final_len {
            return Err(LapisError::MalformedStream(format!(
                "payload is {} bytes but the final frame declares {}",
                payload.len(),
                final_len
            )));
        }
        log::debug!(
            "framed decode: {} frame(s), payload {} bytes",
            lengths.len(),
            payload.len()
        );

        let mut decoded = payload.to_vec();
        for (stage, codec) in self.stack.iter().enumerate().rev() {
            if stage == 0 {
                // The first stage's decode output is the caller's buffer; its
                // size is whatever the stage produces.
                decoded = codec
                    .decode(&decoded)
                    .map_err(|e| stage_failure(stage, codec, e))?;
            } else {
                // Every other stage decodes into a buffer of exactly the
                // recorded size of the previous stage's output.
                let expected = lengths[stage - 1] as usize;
                let mut out = vec![0u8; expected];
                codec
                    .decode_into(&decoded, &mut out)
                    .map_err(|e| stage_failure(stage, codec, e))?;
                decoded = out;
            }
        }
        Ok(decoded)
    }

    fn get_config(&self) -> Result<serde_json::Value, LapisError> {
        let codecs = self
            .stack
            .iter()
            .map(|codec| codec.get_config())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::json!({ "id": Self::CODEC_ID, "codecs": codecs }))
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{Rle, Shuffle, Zstd};

    fn sample_data() -> Vec<u8> {
        (0..200u32)
            .flat_map(|i| [7, 7, 7, (i % 5) as u8])
            .collect()
    }

    fn sample_framed() -> FramedCodecStack {
        FramedCodecStack::new(CodecStack::new(vec![
            Box::new(Shuffle::new(4)),
            Box::new(Rle::new()),
            Box::new(Zstd::new(3)),
        ]))
    }

    #[test]
    fn test_framed_roundtrip() {
        let data = sample_data();
        let framed = sample_framed();
        let encoded = framed.encode(&data).unwrap();
        assert_eq!(framed.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_framed_empty_stack_is_identity() {
        let framed = FramedCodecStack::new(CodecStack::new(vec![]));
        let data = b"framing adds nothing here".to_vec();
        let encoded = framed.encode(&data).unwrap();
        assert_eq!(encoded, data);
        assert_eq!(framed.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_frame_lengths_match_independent_stage_measurements() {
        let data = sample_data();
        let framed = sample_framed();
        let encoded = framed.encode(&data).unwrap();
        let recorded = framed.peek_frame_lengths(&encoded).unwrap();

        // Measure each stage independently, outside the framed stack.
        let mut buf = data.clone();
        let mut measured = Vec::new();
        for codec in framed.stack().iter() {
            buf = codec.encode(&buf).unwrap();
            measured.push(buf.len() as u64);
        }

        assert_eq!(recorded, measured);
        // And the encode is deterministic frame-for-frame.
        assert_eq!(framed.encode(&data).unwrap(), encoded);
    }

    #[test]
    fn test_framed_wrap_single_codec() {
        let data = sample_data();
        let framed = FramedCodecStack::wrap(Box::new(Zstd::new(3)));
        let encoded = framed.encode(&data).unwrap();
        assert_eq!(framed.peek_frame_lengths(&encoded).unwrap().len(), 1);
        assert_eq!(framed.decode(&encoded).unwrap(), data);
    }

    #[test]
    fn test_truncated_header_is_rejected() {
        let framed = sample_framed();
        // Three frames expected; an empty stream truncates the first varint.
        let result = framed.decode(&[]);
        assert!(matches!(result, Err(LapisError::MalformedStream(_))));
    }

    #[test]
    fn test_payload_length_disagreement_is_rejected() {
        let data = sample_data();
        let framed = sample_framed();
        let encoded = framed.encode(&data).unwrap();
        // Dropping the last payload byte contradicts the final frame length.
        let truncated = &encoded[..encoded.len() - 1];
        let result = framed.decode(truncated);
        assert!(matches!(result, Err(LapisError::MalformedStream(_))));
    }

    #[test]
    fn test_oversized_declared_length_is_rejected() {
        let framed = sample_framed();
        // First frame declares u64::MAX - 1, far past the sanity cap.
        let mut stream = Vec::new();
        varint::encode_one(u64::MAX - 1, &mut stream).unwrap();
        let result = framed.decode(&stream);
        assert!(matches!(result, Err(LapisError::MalformedStream(_))));
    }

    #[test]
    fn test_corrupted_intermediate_length_is_shape_mismatch() {
        let data = sample_data();
        let framed = sample_framed();
        let encoded = framed.encode(&data).unwrap();
        let recorded = framed.peek_frame_lengths(&encoded).unwrap();

        // Rebuild the stream with the middle frame's length off by one; the
        // rle stage then decodes to a size disagreeing with the record.
        let mut corrupted = Vec::new();
        for (i, len) in recorded.iter().enumerate() {
            let len = if i == 1 { len + 1 } else { *len };
            varint::encode_one(len, &mut corrupted).unwrap();
        }
        let payload_offset = encoded.len() - recorded[recorded.len() - 1] as usize;
        corrupted.extend_from_slice(&encoded[payload_offset..]);

        let result = framed.decode(&corrupted);
        match result {
            Err(LapisError::StageDecodeFailure { source, .. }) => {
                assert!(matches!(*source, LapisError::ShapeMismatch { .. }));
            }
            other => panic!("expected ShapeMismatch, got {:?}", other.map(|_| ())),
        }
    }
}

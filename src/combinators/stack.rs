// In: src/combinators/stack.rs

//! This module defines `CodecStack`, which exposes an ordered list of codecs
//! as one combined codec.
//!
//! On encoding, the codecs are applied front-to-back: `stack([a, b, c])`
//! computes `c.encode(b.encode(a.encode(buf)))`. On decoding they are applied
//! back-to-front. The stack records no stage boundaries of its own; its
//! decode trusts each stage to parse the bytes it receives, which is valid
//! only when every non-terminal stage's output is self-delimiting. When that
//! does not hold, wrap the stack in a `FramedCodecStack` instead.

use crate::error::LapisError;
use crate::traits::Codec;

/// An ordered stack of codecs, which makes up a combined codec.
///
/// The empty stack is the identity codec. The stack is immutable after
/// construction and both `encode` and `decode` are pure functions of the
/// input plus the fixed codec list.
pub struct CodecStack {
    codecs: Vec<Box<dyn Codec>>,
}

impl CodecStack {
    /// The registry identifier for this combinator.
    pub const CODEC_ID: &'static str = "stack";

    pub fn new(codecs: Vec<Box<dyn Codec>>) -> Self {
        Self { codecs }
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &dyn Codec> + ExactSizeIterator + '_ {
        self.codecs.iter().map(|codec| codec.as_ref())
    }

    pub fn get(&self, stage: usize) -> Option<&dyn Codec> {
        self.codecs.get(stage).map(|codec| codec.as_ref())
    }

    /// Appends the codecs of `other` after the codecs of `self`.
    pub fn concat(mut self, other: CodecStack) -> CodecStack {
        self.codecs.extend(other.codecs);
        self
    }

    /// Encodes, then decodes `buf` in one call.
    ///
    /// Unlike calling `decode(encode(buf))`, this replays the recorded length
    /// of every intermediate buffer as an exact-size `decode_into` hint, so
    /// it works even when a stage's decode cannot infer its own output size.
    pub fn encode_decode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut silhouettes = Vec::with_capacity(self.codecs.len());
        let mut encoded = buf.to_vec();
        for codec in self.iter() {
            silhouettes.push(encoded.len());
            encoded = codec.encode(&encoded)?;
        }

        let mut decoded = encoded;
        for (stage, codec) in self.iter().enumerate().rev() {
            let mut out = vec![0u8; silhouettes[stage]];
            codec
                .decode_into(&decoded, &mut out)
                .map_err(|e| stage_failure(stage, codec, e))?;
            decoded = out;
        }
        Ok(decoded)
    }
}

impl FromIterator<Box<dyn Codec>> for CodecStack {
    fn from_iter<I: IntoIterator<Item = Box<dyn Codec>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Codec for CodecStack {
    fn id(&self) -> &str {
        Self::CODEC_ID
    }

    fn encode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut encoded = buf.to_vec();
        for codec in self.iter() {
            encoded = codec.encode(&encoded)?;
        }
        Ok(encoded)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut decoded = bytes.to_vec();
        for (stage, codec) in self.iter().enumerate().rev() {
            decoded = codec
                .decode(&decoded)
                .map_err(|e| stage_failure(stage, codec, e))?;
        }
        Ok(decoded)
    }

    fn get_config(&self) -> Result<serde_json::Value, LapisError> {
        let codecs = self
            .iter()
            .map(|codec| codec.get_config())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::json!({ "id": Self::CODEC_ID, "codecs": codecs }))
    }
}

/// Attaches the failing stage's position and codec id; the inner error is
/// carried unchanged as the source.
pub(crate) fn stage_failure(stage: usize, codec: &dyn Codec, source: LapisError) -> LapisError {
    LapisError::StageDecodeFailure {
        stage: format!("stage {} ({})", stage + 1, codec.id()),
        source: Box::new(source),
    }
}

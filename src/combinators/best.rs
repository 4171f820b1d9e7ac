// In: src/combinators/best.rs

//! This module defines `PickBestCodec`, the empirical selection combinator.
//!
//! On encode it trials every configured candidate codec on the full input,
//! keeps the smallest encoded result, and prefixes the output with the
//! winning candidate's varint index. Ties are broken by the lowest configured
//! index, so selection is deterministic regardless of execution order. On
//! decode the selector is parsed first and the remaining bytes are delegated
//! to that candidate.
//!
//! The cost model is inherent to the algorithm: encode runs every candidate's
//! full encode, so time and peak transient memory are O(number of
//! candidates).

use std::io::Cursor;

use crate::combinators::stack::stage_failure;
use crate::error::LapisError;
use crate::kernels::varint;
use crate::traits::Codec;

/// A codec that tries every candidate and keeps the smallest result.
///
/// A candidate set of size one degenerates to a pass-through with a constant
/// one-byte selector.
pub struct PickBestCodec {
    candidates: Vec<Box<dyn Codec>>,
}

impl PickBestCodec {
    /// The registry identifier for this combinator.
    pub const CODEC_ID: &'static str = "best";

    /// Builds the combinator from an ordered candidate list. At least one
    /// candidate is required; the candidate order is part of the wire
    /// contract, since selectors are indices into it.
    pub fn new(candidates: Vec<Box<dyn Codec>>) -> Result<Self, LapisError> {
        if candidates.is_empty() {
            return Err(LapisError::ConfigError(
                "at least one candidate codec is required".into(),
            ));
        }
        Ok(Self { candidates })
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn candidates(&self) -> impl ExactSizeIterator<Item = &dyn Codec> + '_ {
        self.candidates.iter().map(|codec| codec.as_ref())
    }
}

impl Codec for PickBestCodec {
    fn id(&self) -> &str {
        Self::CODEC_ID
    }

    fn encode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut best: Option<(usize, Vec<u8>)> = None;

        for (index, candidate) in self.candidates.iter().enumerate() {
            let encoded = candidate.encode(buf).map_err(|e| {
                LapisError::CandidateEncodeFailure {
                    candidate: format!("{} ({})", index, candidate.id()),
                    source: Box::new(e),
                }
            })?;
            log::debug!(
                "best-of trial: candidate {} ({}) scored {} bytes",
                index,
                candidate.id(),
                encoded.len()
            );

            // Strict `<` keeps the earliest candidate on ties.
            let improves = match &best {
                Some((_, current)) => encoded.len() < current.len(),
                None => true,
            };
            if improves {
                best = Some((index, encoded));
            }
        }

        let (winner, payload) = best.ok_or_else(|| {
            LapisError::InternalError("candidate set cannot be empty after construction".into())
        })?;
        log::debug!(
            "best-of winner: candidate {} ({}) at {} bytes",
            winner,
            self.candidates[winner].id(),
            payload.len()
        );

        let mut output = Vec::with_capacity(payload.len() + 2);
        varint::encode_usize(winner, &mut output)?;
        output.extend_from_slice(&payload);
        Ok(output)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, LapisError> {
        let mut cursor = Cursor::new(bytes);
        let selector = varint::decode_one::<u64>(&mut cursor)?;

        let index = usize::try_from(selector)
            .ok()
            .filter(|&i| i < self.candidates.len())
            .ok_or(LapisError::UnknownSelector {
                selector,
                candidates: self.candidates.len(),
            })?;

        let payload = &bytes[cursor.position() as usize..];
        let candidate = self.candidates[index].as_ref();
        candidate
            .decode(payload)
            .map_err(|e| stage_failure(index, candidate, e))
    }

    fn get_config(&self) -> Result<serde_json::Value, LapisError> {
        let candidates = self
            .candidates()
            .map(|codec| codec.get_config())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::json!({ "id": Self::CODEC_ID, "candidates": candidates }))
    }
}

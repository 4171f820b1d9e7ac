// In: src/error.rs

//! This module defines the single, unified error type for the entire lapis library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LapisError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// A frame stream could not be parsed: truncated or invalid varint, a
    /// declared length disagreeing with the bytes that are actually present,
    /// or a declared length exceeding the sanity cap.
    #[error("malformed frame stream: {0}")]
    MalformedStream(String),

    /// A best-of selector pointed outside the candidate set configured at
    /// decode time. This usually means the codec set used for decoding
    /// differs from the one used for encoding.
    #[error("unknown candidate selector {selector}: {candidates} candidate(s) configured")]
    UnknownSelector { selector: u64, candidates: usize },

    /// An inner codec rejected its payload during a combinator decode. The
    /// inner failure is carried unchanged as the source; this variant only
    /// adds which stage it happened at.
    #[error("decode failed at {stage}: {source}")]
    StageDecodeFailure {
        stage: String,
        #[source]
        source: Box<LapisError>,
    },

    /// A candidate codec failed while being trialled for best-of selection.
    #[error("candidate {candidate} failed to encode: {source}")]
    CandidateEncodeFailure {
        candidate: String,
        #[source]
        source: Box<LapisError>,
    },

    /// A decoded buffer's size does not match the caller-supplied output
    /// buffer or a recorded frame length.
    #[error("decoded buffer size mismatch: expected {expected} bytes, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === Registry & Configuration Errors
    // =========================================================================
    #[error("no codec registered under id '{0}'")]
    UnknownCodecId(String),

    #[error("invalid codec configuration: {0}")]
    ConfigError(String),

    /// An error from the Serde JSON library, typically during codec config
    /// serialization or reconstruction.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    // =========================================================================
    // === Low-Level Kernel Errors
    // =========================================================================
    #[error("buffer length mismatch: expected a multiple of {0}, got {1}")]
    BufferMismatch(usize, usize),

    #[error("Zstd operation failed: {0}")]
    ZstdError(String),
}

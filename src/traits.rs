// In: src/traits.rs

//! Defines the `Codec` trait, the behavioral contract shared by every
//! primitive transform and every combinator in this crate.
//!
//! A codec is a paired encode/decode transform over in-memory byte buffers
//! satisfying an exact round trip: `decode(encode(x)) == x` bit-for-bit for
//! every buffer `x` in the codec's supported domain. Codecs are immutable
//! value-like objects once constructed and carry no state across calls, so a
//! single instance is safe to share across threads (`Send + Sync` is part of
//! the contract). Combinators hold their inner codecs as `Box<dyn Codec>` and
//! are codecs themselves, so they nest arbitrarily.

use crate::error::LapisError;

/// The contract every codec satisfies.
///
/// `encode` must be deterministic (same input, same output) and must not
/// retain references to its input past the call. `decode` is the exact
/// inverse of `encode` on the codec's domain.
pub trait Codec: Send + Sync {
    /// The stable string identifier for this codec (e.g. "stack", "zstd"),
    /// used by the registry and in error messages.
    fn id(&self) -> &str;

    /// Transforms the input buffer into an encoded byte sequence.
    fn encode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError>;

    /// Inverse of `encode`; allocates and returns a fresh buffer.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, LapisError>;

    /// Inverse of `encode`, writing into a caller-supplied buffer.
    ///
    /// `out` must be exactly the size of the decoded data; a mismatch is a
    /// `ShapeMismatch` error and `out` is left in an unspecified state. The
    /// default implementation decodes into a fresh buffer and copies, but
    /// implementations may override it to decode in place.
    fn decode_into(&self, bytes: &[u8], out: &mut [u8]) -> Result<(), LapisError> {
        let decoded = self.decode(bytes)?;
        if decoded.len() != out.len() {
            return Err(LapisError::ShapeMismatch {
                expected: out.len(),
                actual: decoded.len(),
            });
        }
        out.copy_from_slice(&decoded);
        Ok(())
    }

    /// Returns the JSON configuration from which an equal codec can be
    /// reconstructed via [`crate::registry::CodecRegistry::build`].
    fn get_config(&self) -> Result<serde_json::Value, LapisError>;
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal codec that reverses its input; exists only to exercise the
    /// default `decode_into`.
    struct Reverse;

    impl Codec for Reverse {
        fn id(&self) -> &str {
            "reverse"
        }

        fn encode(&self, buf: &[u8]) -> Result<Vec<u8>, LapisError> {
            Ok(buf.iter().rev().copied().collect())
        }

        fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, LapisError> {
            Ok(bytes.iter().rev().copied().collect())
        }

        fn get_config(&self) -> Result<serde_json::Value, LapisError> {
            Ok(serde_json::json!({ "id": "reverse" }))
        }
    }

    #[test]
    fn test_default_decode_into_copies_exact_size() {
        let codec = Reverse;
        let encoded = codec.encode(b"abcd").unwrap();
        let mut out = vec![0u8; 4];
        codec.decode_into(&encoded, &mut out).unwrap();
        assert_eq!(&out, b"abcd");
    }

    #[test]
    fn test_default_decode_into_rejects_wrong_size() {
        let codec = Reverse;
        let encoded = codec.encode(b"abcd").unwrap();
        let mut out = vec![0u8; 3];
        let result = codec.decode_into(&encoded, &mut out);
        assert!(matches!(
            result,
            Err(LapisError::ShapeMismatch {
                expected: 3,
                actual: 4
            })
        ));
    }
}

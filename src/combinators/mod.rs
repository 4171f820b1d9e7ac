// In: src/combinators/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Combinator Layer
// ====================================================================================
//
// Combinators are codecs built out of other codecs. Each one satisfies the
// same `Codec` contract as the primitives it wraps, so combined codecs remain
// interchangeable with primitive ones and nest arbitrarily.
//
// Data Flow (Encode):
//
//   1. [CodecStack]       -> applies stage 1..n front-to-back, each stage
//         |                  consuming the previous stage's output
//   2. [FramedCodecStack] -> runs the wrapped stack, recording every stage's
//         |                  output length as a varint frame header
//   3. [PickBestCodec]    -> trials every candidate, keeps the smallest
//                            output, prefixes the winner's varint selector
//
// Decode reverses each of these exactly; every combinator's decode is the
// bit-exact inverse of its encode. All wire-level integers are unsigned
// LEB128 varints (see `kernels::varint`).
//
// ====================================================================================

mod best;
mod framed;
mod stack;

pub use best::PickBestCodec;
pub use framed::FramedCodecStack;
pub use stack::CodecStack;

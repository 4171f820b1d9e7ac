//! This file is the root of the `lapis_codec` Rust crate.
//!
//! lapis is a small combinator framework for composing reversible binary
//! buffer transforms ("codecs"). A codec maps a buffer to an encoded buffer
//! and back; combinators build new codecs out of existing ones without
//! changing the codec contract, so combined codecs remain interchangeable
//! with primitive ones:
//!
//! - [`CodecStack`]: sequences a list of codecs into one pipeline codec.
//! - [`FramedCodecStack`]: wraps a stack so every stage boundary is
//!   recoverable from the byte stream itself.
//! - [`PickBestCodec`]: tries several candidate codecs on the same input and
//!   keeps the smallest result, tagging the output with the winner.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod combinators;
pub mod kernels;
pub mod observability;
pub mod registry;

mod error;
mod traits;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use combinators::{CodecStack, FramedCodecStack, PickBestCodec};
pub use error::LapisError;
pub use registry::CodecRegistry;
pub use traits::Codec;

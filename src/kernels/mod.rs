//! This module contains the pure, stateless kernels bundled with the crate:
//! the LEB128 varint primitives used by the combinator wire formats, and a
//! small set of concrete byte codecs (`Zstd`, `Rle`, `Shuffle`) so that
//! stacks, framing, and best-of selection have real transforms to compose.
//!
//! Every kernel is panic-free and operates on whole in-memory buffers. The
//! combinators make no assumption about what transform a kernel performs;
//! they rely only on the `Codec` contract.

pub mod varint;

mod rle;
mod shuffle;
mod zstd;

pub use rle::Rle;
pub use shuffle::Shuffle;
pub use zstd::Zstd;

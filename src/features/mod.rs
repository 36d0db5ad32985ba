//! Optional features module.
//!
//! Compression lives here, apart from the core codec: the codec itself
//! never compresses, the packer composes the two.

pub mod compression;

pub use compression::{Compression, CompressionAlgorithm, Compressor, compress, decompress};

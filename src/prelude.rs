//! Convenient re-exports for common usage.
//!
//! ```
//! use widebase::prelude::*;
//!
//! let registry = ProfileRegistry::load_default().unwrap();
//! let (_, profile) = registry.resolve(None).unwrap();
//! let packer = profile.build_packer().unwrap();
//! let artifact = packer.pack(b"\x7fELF").unwrap();
//! assert_eq!(packer.unpack(&artifact.text).unwrap(), b"\x7fELF");
//! ```

pub use crate::{
    Alphabet, Charset, CharsetVersion, ChunkCodec, ChunkLayout, CompressionAlgorithm, Compressor,
    Error, LiteralOracle, PackedArtifact, Packer, ProfileRegistry, SafetyOracle, StreamCodec,
};

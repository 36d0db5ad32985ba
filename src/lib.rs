//! Dense binary-to-text codec and self-extracting payload packer.
//!
//! Bytes are carried in chunks over an alphabet of roughly 63 000 code
//! points chosen so the text survives a restrictive channel, then wrapped
//! with a small bootstrap that rebuilds and runs the payload remotely.
//!
//! ```
//! use std::sync::Arc;
//! use widebase::{Alphabet, LiteralOracle, StreamCodec};
//!
//! let alphabet = Arc::new(Alphabet::build(&LiteralOracle::python()).unwrap());
//! let codec = StreamCodec::new(alphabet, 347).unwrap();
//! let text = codec.encode(b"hello").unwrap();
//! assert_eq!(text.chars().count(), 174);
//! assert_eq!(codec.decode(&text, Some(5)).unwrap(), b"hello");
//! ```

mod core;
mod encoders;
mod error;
mod features;
mod packer;
pub mod prelude;

pub use crate::core::alphabet::Alphabet;
pub use crate::core::charset::{Charset, CharsetVersion, SEPARATORS};
pub use crate::core::config::{ProfileConfig, ProfileRegistry, Settings};
pub use crate::core::offset_table::{DecodeTable, EncodeTable, OffsetTables};
pub use crate::core::oracle::{
    CODE_SPACE, LiteralOracle, OracleError, ProbedOracle, SURROGATES, SafetyOracle,
};
pub use crate::encoders::{
    ChunkCodec, ChunkLayout, MAX_UNIT_BYTES, StreamCodec, StreamingDecoder, StreamingEncoder,
};
pub use crate::error::{CodePointDisplay, Error, Result};
pub use crate::features::{Compression, CompressionAlgorithm, Compressor, compress, decompress};
pub use crate::packer::{
    ArtifactHeader, BootstrapContext, BootstrapRenderer, PackedArtifact, Packer,
    PythonBootstrap, write_atomic,
};

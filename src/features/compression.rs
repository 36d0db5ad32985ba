use crate::error::{Error, Result};
use std::io::{Read, Write};
use std::str::FromStr;

/// A lossless byte compressor.
///
/// Determinism is not required; only `decompress(compress(x)) == x`.
/// `algorithm` names the format a bootstrap has to undo.
pub trait Compressor {
    fn algorithm(&self) -> CompressionAlgorithm;
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Supported compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionAlgorithm {
    Gzip,
    Lzma,
}

impl CompressionAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionAlgorithm::Gzip => "gzip",
            CompressionAlgorithm::Lzma => "lzma",
        }
    }

    pub fn default_level(&self) -> u32 {
        match self {
            CompressionAlgorithm::Gzip => 6,
            CompressionAlgorithm::Lzma => 9,
        }
    }

    /// Pairs the algorithm with a level.
    pub fn with_level(self, level: u32) -> Compression {
        Compression {
            algorithm: self,
            level,
        }
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gzip" | "gz" => Ok(CompressionAlgorithm::Gzip),
            "lzma" | "xz" => Ok(CompressionAlgorithm::Lzma),
            _ => Err(Error::Config(format!("unknown compression algorithm: {}", s))),
        }
    }
}

/// An algorithm at a fixed level; the packer's default [`Compressor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compression {
    pub algorithm: CompressionAlgorithm,
    pub level: u32,
}

impl Compressor for Compression {
    fn algorithm(&self) -> CompressionAlgorithm {
        self.algorithm
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        compress(data, self.algorithm, self.level)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        decompress(data, self.algorithm)
    }
}

/// Compress data using the specified algorithm and level.
pub fn compress(data: &[u8], algorithm: CompressionAlgorithm, level: u32) -> Result<Vec<u8>> {
    let result = match algorithm {
        CompressionAlgorithm::Gzip => compress_gzip(data, level),
        CompressionAlgorithm::Lzma => compress_lzma(data, level),
    };
    result.map_err(|e| Error::CompressionFailed(format!("{}: {}", algorithm.as_str(), e)))
}

/// Decompress data using the specified algorithm.
pub fn decompress(data: &[u8], algorithm: CompressionAlgorithm) -> Result<Vec<u8>> {
    let result = match algorithm {
        CompressionAlgorithm::Gzip => decompress_gzip(data),
        CompressionAlgorithm::Lzma => decompress_lzma(data),
    };
    result.map_err(|e| Error::DecompressionFailed(format!("{}: {}", algorithm.as_str(), e)))
}

type IoResult<T> = std::io::Result<T>;

fn compress_gzip(data: &[u8], level: u32) -> IoResult<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data)?;
    encoder.finish()
}

fn decompress_gzip(data: &[u8]) -> IoResult<Vec<u8>> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(data);
    let mut result = Vec::new();
    decoder.read_to_end(&mut result)?;
    Ok(result)
}

fn compress_lzma(data: &[u8], level: u32) -> IoResult<Vec<u8>> {
    use xz2::write::XzEncoder;

    let mut encoder = XzEncoder::new(Vec::new(), level);
    encoder.write_all(data)?;
    encoder.finish()
}

fn decompress_lzma(data: &[u8]) -> IoResult<Vec<u8>> {
    use xz2::read::XzDecoder;

    let mut decoder = XzDecoder::new(data);
    let mut result = Vec::new();
    decoder.read_to_end(&mut result)?;
    Ok(result)
}

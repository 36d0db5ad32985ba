//! Self-extracting payload packing.
//!
//! `pack` runs binary -> compress -> encode -> bootstrap text. The target
//! runtime reverses it by executing the bootstrap; [`Packer::unpack`] does
//! the same reversal in-process without running anything.

mod bootstrap;

pub use bootstrap::{ArtifactHeader, BootstrapContext, BootstrapRenderer, PythonBootstrap};

use crate::core::charset::CharsetVersion;
use crate::encoders::stream::StreamCodec;
use crate::error::{CodePointDisplay, Error, Result};
use crate::features::compression::{Compression, Compressor};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// A rendered bootstrap holding one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedArtifact {
    pub text: String,
    pub compressed_len: usize,
    pub encoded_chars: usize,
    pub version: CharsetVersion,
}

impl PackedArtifact {
    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_atomic(path, |writer| Ok(writer.write_all(self.text.as_bytes())?))
    }
}

/// Writes `path` through a sibling `.partial` file that is renamed into
/// place only when `write` succeeds. On failure the partial file is removed
/// and `path` is left untouched.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".partial");
    let tmp = path.with_file_name(tmp_name);

    let result = (|| -> Result<()> {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        write(&mut writer)?;
        writer.flush()?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            fs::rename(&tmp, path)?;
            Ok(())
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

/// Composes a compressor, a [`StreamCodec`] and a bootstrap renderer.
pub struct Packer<C: Compressor = Compression> {
    codec: StreamCodec,
    compressor: C,
    renderer: Box<dyn BootstrapRenderer>,
}

impl<C: Compressor> std::fmt::Debug for Packer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packer")
            .field("codec", &self.codec)
            .field("renderer", &self.renderer.name())
            .finish_non_exhaustive()
    }
}

impl<C: Compressor> Packer<C> {
    pub fn new(codec: StreamCodec, compressor: C) -> Self {
        Packer {
            codec,
            compressor,
            renderer: Box::new(PythonBootstrap),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn BootstrapRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn codec(&self) -> &StreamCodec {
        &self.codec
    }

    pub fn renderer(&self) -> &dyn BootstrapRenderer {
        self.renderer.as_ref()
    }

    pub fn pack(&self, binary: &[u8]) -> Result<PackedArtifact> {
        let algorithm = self.compressor.algorithm();
        if !self.renderer.supports(algorithm) {
            return Err(Error::UnsupportedCompression {
                renderer: self.renderer.name(),
                algorithm: algorithm.as_str().to_string(),
            });
        }

        let compressed = self.compressor.compress(binary)?;
        let encoded = self.codec.encode(&compressed)?;

        let forbidden = self.renderer.forbidden_chars();
        if let Some(c) = encoded.chars().find(|c| forbidden.contains(c)) {
            return Err(Error::TemplateConflict {
                renderer: self.renderer.name(),
                found: CodePointDisplay(c as u32),
            });
        }

        let alphabet = self.codec.alphabet();
        let ctx = BootstrapContext {
            encoded: &encoded,
            compressed_len: compressed.len(),
            layout: self.codec.layout(),
            tables: alphabet.tables(),
            version: alphabet.version(),
            algorithm,
        };
        let text = self.renderer.render(&ctx);
        let encoded_chars = self.codec.layout().encoded_len(compressed.len());

        tracing::info!(
            input = binary.len(),
            compressed = compressed.len(),
            encoded_chars,
            artifact_bytes = text.len(),
            renderer = self.renderer.name(),
            "packed payload"
        );

        Ok(PackedArtifact {
            text,
            compressed_len: compressed.len(),
            encoded_chars,
            version: alphabet.version().clone(),
        })
    }

    /// Recovers the original binary from a rendered artifact.
    pub fn unpack(&self, artifact: &str) -> Result<Vec<u8>> {
        let (header, encoded) = self.renderer.parse(artifact)?;

        let layout = self.codec.layout();
        let expected = format!(
            "{} {}/{} {}",
            self.codec.version(),
            layout.unit_bytes(),
            layout.unit_chars(),
            self.compressor.algorithm().as_str()
        );
        let found = format!(
            "{} {}/{} {}",
            header.version,
            header.unit_bytes,
            header.unit_chars,
            header.algorithm.as_str()
        );
        if expected != found {
            return Err(Error::VersionMismatch { expected, found });
        }

        let compressed = self.codec.decode(encoded, Some(header.compressed_len))?;
        let binary = self.compressor.decompress(&compressed)?;
        tracing::info!(
            compressed = compressed.len(),
            output = binary.len(),
            "unpacked payload"
        );
        Ok(binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::Alphabet;
    use crate::core::oracle::LiteralOracle;
    use crate::features::compression::CompressionAlgorithm;
    use std::sync::Arc;

    fn python_codec() -> StreamCodec {
        let alphabet = Alphabet::build(&LiteralOracle::python()).unwrap();
        StreamCodec::new(Arc::new(alphabet), 347).unwrap()
    }

    fn packer() -> Packer {
        Packer::new(python_codec(), CompressionAlgorithm::Lzma.with_level(9))
    }

    #[test]
    fn test_ten_bytes_survive_decode_and_decompress() {
        let binary = [0x7F, b'E', b'L', b'F', 2, 1, 1, 0, 0, 0];
        let packer = packer();
        let artifact = packer.pack(&binary).unwrap();

        // independent of the bootstrap: decode the literal and decompress by hand
        let (header, encoded) = PythonBootstrap.parse(&artifact.text).unwrap();
        assert_eq!(header.compressed_len, artifact.compressed_len);
        let compressed = packer.codec().decode(encoded, Some(header.compressed_len)).unwrap();
        let restored = crate::features::compression::decompress(
            &compressed,
            CompressionAlgorithm::Lzma,
        )
        .unwrap();
        assert_eq!(restored, binary);

        assert_eq!(packer.unpack(&artifact.text).unwrap(), binary);
    }

    #[test]
    fn test_artifact_shape() {
        let artifact = packer().pack(b"hello world").unwrap();
        assert_eq!(artifact.encoded_chars % 174, 0);
        assert!(artifact.text.contains("UNIT_BYTES = 347"));
        assert!(artifact.text.contains("CHARSET_SIZE = 63481"));
        assert!(artifact.text.contains("(8231, 5), (55295, 7), (65536, 2055)"));
        assert!(artifact.text.contains(&format!("\nl={}\n", artifact.compressed_len)));
    }

    #[test]
    fn test_large_payload_roundtrip() {
        let binary: Vec<u8> = (0..50_000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
        let packer = packer();
        let artifact = packer.pack(&binary).unwrap();
        assert_eq!(packer.unpack(&artifact.text).unwrap(), binary);
    }

    #[test]
    fn test_gzip_packer() {
        let packer = Packer::new(python_codec(), CompressionAlgorithm::Gzip.with_level(9));
        let artifact = packer.pack(b"gzip payload").unwrap();
        assert!(artifact.text.contains("import gzip"));
        assert_eq!(packer.unpack(&artifact.text).unwrap(), b"gzip payload");
    }

    /// Python bootstrap that pretends its runtime lacks gzip.
    struct LzmaOnly;

    impl BootstrapRenderer for LzmaOnly {
        fn name(&self) -> &'static str {
            "lzma-only"
        }
        fn forbidden_chars(&self) -> &[char] {
            PythonBootstrap.forbidden_chars()
        }
        fn supports(&self, algorithm: CompressionAlgorithm) -> bool {
            algorithm == CompressionAlgorithm::Lzma
        }
        fn render(&self, ctx: &BootstrapContext<'_>) -> String {
            PythonBootstrap.render(ctx)
        }
        fn parse<'a>(&self, artifact: &'a str) -> Result<(ArtifactHeader, &'a str)> {
            PythonBootstrap.parse(artifact)
        }
    }

    #[test]
    fn test_unsupported_compression() {
        let packer = Packer::new(python_codec(), CompressionAlgorithm::Gzip.with_level(6))
            .with_renderer(Box::new(LzmaOnly));
        let err = packer.pack(b"x").unwrap_err();
        assert_eq!(err.kind(), "unsupported-compression");
        assert!(err.to_string().contains("lzma-only"));
    }

    #[test]
    fn test_unpack_refuses_other_algorithm() {
        let artifact = Packer::new(python_codec(), CompressionAlgorithm::Gzip.with_level(6))
            .pack(b"gzip inside")
            .unwrap();
        let err = packer().unpack(&artifact.text).unwrap_err();
        assert_eq!(err.kind(), "version-mismatch");
        assert!(err.to_string().contains("gzip"));
    }

    #[test]
    fn test_compressor_failure_propagates() {
        struct Broken;
        impl Compressor for Broken {
            fn algorithm(&self) -> CompressionAlgorithm {
                CompressionAlgorithm::Lzma
            }
            fn compress(&self, _data: &[u8]) -> Result<Vec<u8>> {
                Err(Error::CompressionFailed("encoder out of memory".into()))
            }
            fn decompress(&self, _data: &[u8]) -> Result<Vec<u8>> {
                unreachable!()
            }
        }
        let err = Packer::new(python_codec(), Broken).pack(b"x").unwrap_err();
        assert_eq!(err.kind(), "compression-failed");
        assert!(err.to_string().contains("out of memory"));
    }

    #[test]
    fn test_template_conflict_when_alphabet_has_quote() {
        // an alphabet that wrongly admits '"' and '\'
        let alphabet = Alphabet::from_code_points(vec![0x22, 0x5C]).unwrap();
        let codec = StreamCodec::new(Arc::new(alphabet), 1).unwrap();
        let packer = Packer::new(codec, CompressionAlgorithm::Lzma.with_level(6));
        let err = packer.pack(b"any").unwrap_err();
        assert_eq!(err.kind(), "template-conflict");
    }

    #[test]
    fn test_unpack_refuses_other_version() {
        let artifact = packer().pack(b"versioned").unwrap();
        let other = Alphabet::build(&LiteralOracle::new([0x00, 0x0A, 0x0D, 0x22, 0x5C, 0x27], true))
            .unwrap();
        let other_packer = Packer::new(
            StreamCodec::new(Arc::new(other), 347).unwrap(),
            CompressionAlgorithm::Lzma.with_level(9),
        );
        let err = other_packer.unpack(&artifact.text).unwrap_err();
        assert_eq!(err.kind(), "version-mismatch");
    }

    #[test]
    fn test_write_to_replaces_atomically() {
        let artifact = packer().pack(b"file").unwrap();
        let path = std::env::temp_dir().join(format!("widebase-pack-{}.py", std::process::id()));
        artifact.write_to(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, artifact.text);
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let path = std::env::temp_dir().join(format!("widebase-keep-{}.bin", std::process::id()));
        fs::write(&path, b"previous").unwrap();

        let err = write_atomic(&path, |writer| {
            writer.write_all(b"half")?;
            Err(Error::malformed("stream broke"))
        })
        .unwrap_err();
        assert_eq!(err.kind(), "malformed-input");

        let mut partial = path.file_name().unwrap().to_os_string();
        partial.push(".partial");
        assert!(!path.with_file_name(partial).exists());
        assert_eq!(fs::read(&path).unwrap(), b"previous");
        fs::remove_file(&path).unwrap();
    }
}

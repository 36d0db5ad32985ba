use crate::core::alphabet::Alphabet;
use crate::core::charset::CharsetVersion;
use crate::encoders::chunk::ChunkCodec;
use crate::encoders::layout::ChunkLayout;
use crate::error::{Error, Result};
use std::sync::Arc;

/// Applies a [`ChunkCodec`] across whole buffers.
///
/// Encoding zero-pads the input to a whole number of byte units; decoding
/// returns the padded buffer unless the real length is declared.
#[derive(Debug, Clone)]
pub struct StreamCodec {
    chunk: ChunkCodec,
}

impl StreamCodec {
    pub fn new(alphabet: Arc<Alphabet>, unit_bytes: usize) -> Result<Self> {
        Ok(StreamCodec {
            chunk: ChunkCodec::new(alphabet, unit_bytes)?,
        })
    }

    pub fn with_layout(alphabet: Arc<Alphabet>, layout: ChunkLayout) -> Result<Self> {
        Ok(StreamCodec {
            chunk: ChunkCodec::with_layout(alphabet, layout)?,
        })
    }

    pub fn chunk_codec(&self) -> &ChunkCodec {
        &self.chunk
    }

    pub fn layout(&self) -> ChunkLayout {
        self.chunk.layout()
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.chunk.alphabet()
    }

    pub fn version(&self) -> &CharsetVersion {
        self.chunk.alphabet().version()
    }

    pub fn encode(&self, data: &[u8]) -> Result<String> {
        let layout = self.layout();
        let mut out = String::with_capacity(layout.encoded_len(data.len()) * 3);

        let chunks = data.chunks_exact(layout.unit_bytes());
        let remainder = chunks.remainder();
        for chunk in chunks {
            self.chunk.encode_chunk_into(chunk, &mut out)?;
        }
        if !remainder.is_empty() {
            let mut padded = remainder.to_vec();
            padded.resize(layout.unit_bytes(), 0);
            self.chunk.encode_chunk_into(&padded, &mut out)?;
        }
        Ok(out)
    }

    /// Decodes `text`, truncating to `declared_len` bytes when given.
    pub fn decode(&self, text: &str, declared_len: Option<usize>) -> Result<Vec<u8>> {
        let layout = self.layout();
        let chars: Vec<char> = text.chars().collect();
        if chars.len() % layout.unit_chars() != 0 {
            return Err(Error::malformed(format!(
                "input is {} characters, expected a multiple of {}",
                chars.len(),
                layout.unit_chars()
            )));
        }

        let mut out = Vec::with_capacity(chars.len() / layout.unit_chars() * layout.unit_bytes());
        for (i, unit) in chars.chunks_exact(layout.unit_chars()).enumerate() {
            self.chunk.decode_chunk_into(unit, &mut out).map_err(|e| match e {
                Error::MalformedInput(msg) => Error::malformed(format!("chunk {}: {}", i, msg)),
                other => other,
            })?;
        }

        if let Some(len) = declared_len {
            truncate_declared(&mut out, len)?;
        }
        Ok(out)
    }

    /// Like [`decode`](Self::decode), refusing text tagged with another
    /// charset version.
    pub fn decode_versioned(
        &self,
        text: &str,
        version: &str,
        declared_len: Option<usize>,
    ) -> Result<Vec<u8>> {
        self.check_version(version)?;
        self.decode(text, declared_len)
    }

    pub fn check_version(&self, version: &str) -> Result<()> {
        let expected = self.version().to_string();
        if expected != version {
            return Err(Error::VersionMismatch {
                expected,
                found: version.to_string(),
            });
        }
        Ok(())
    }
}

pub(crate) fn truncate_declared(out: &mut Vec<u8>, len: usize) -> Result<()> {
    if len > out.len() {
        return Err(Error::malformed(format!(
            "declared length {} exceeds the {} decoded bytes",
            len,
            out.len()
        )));
    }
    out.truncate(len);
    Ok(())
}

use crate::encoders::stream::StreamCodec;
use crate::error::{Error, Result};
use std::io::{Read, Write};

const CHUNK_SIZE: usize = 4096; // 4KB reads

/// Streaming decoder working in fixed character units.
///
/// UTF-8 sequences split across reads are carried over, so the source can
/// be any byte stream.
pub struct StreamingDecoder<'a, W: Write> {
    codec: &'a StreamCodec,
    writer: W,
    declared_len: Option<usize>,
}

impl<'a, W: Write> StreamingDecoder<'a, W> {
    pub fn new(codec: &'a StreamCodec, writer: W) -> Self {
        StreamingDecoder {
            codec,
            writer,
            declared_len: None,
        }
    }

    /// Stops writing after `len` bytes, dropping the zero padding.
    pub fn with_declared_len(mut self, len: usize) -> Self {
        self.declared_len = Some(len);
        self
    }

    /// Decodes everything `reader` yields. Returns the number of bytes written.
    pub fn decode<R: Read>(&mut self, reader: &mut R) -> Result<u64> {
        let layout = self.codec.layout();
        let unit_chars = layout.unit_chars();

        let mut raw = [0u8; CHUNK_SIZE];
        let mut carry: Vec<u8> = Vec::new();
        let mut pending: Vec<char> = Vec::with_capacity(unit_chars * 2);
        let mut decoded = Vec::with_capacity(layout.unit_bytes());
        let mut produced = 0usize;
        let mut written = 0u64;
        let mut chunk_index = 0usize;

        loop {
            let n = match reader.read(&mut raw) {
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                break;
            }
            carry.extend_from_slice(&raw[..n]);

            let valid = match std::str::from_utf8(&carry) {
                Ok(text) => text.len(),
                Err(e) if e.error_len().is_none() => e.valid_up_to(),
                Err(_) => return Err(Error::malformed("input is not valid UTF-8")),
            };
            // `valid` is a UTF-8 boundary checked just above
            let text = std::str::from_utf8(&carry[..valid])
                .map_err(|e| Error::invariant(e.to_string()))?;
            pending.extend(text.chars());
            carry.drain(..valid);

            let whole = pending.len() / unit_chars * unit_chars;
            for unit in pending[..whole].chunks_exact(unit_chars) {
                decoded.clear();
                self.codec
                    .chunk_codec()
                    .decode_chunk_into(unit, &mut decoded)
                    .map_err(|e| match e {
                        Error::MalformedInput(msg) => {
                            Error::malformed(format!("chunk {}: {}", chunk_index, msg))
                        }
                        other => other,
                    })?;
                chunk_index += 1;

                let keep = match self.declared_len {
                    Some(len) => decoded.len().min(len.saturating_sub(produced)),
                    None => decoded.len(),
                };
                produced += decoded.len();
                self.writer.write_all(&decoded[..keep])?;
                written += keep as u64;
            }
            pending.drain(..whole);
        }

        if !carry.is_empty() {
            return Err(Error::malformed("input ends inside a UTF-8 sequence"));
        }
        if !pending.is_empty() {
            return Err(Error::malformed(format!(
                "trailing {} characters do not form a whole unit of {}",
                pending.len(),
                unit_chars
            )));
        }
        if let Some(len) = self.declared_len
            && len > produced
        {
            return Err(Error::malformed(format!(
                "declared length {} exceeds the {} decoded bytes",
                len, produced
            )));
        }

        self.writer.flush()?;
        tracing::debug!(bytes = written, "streamed decode finished");
        Ok(written)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

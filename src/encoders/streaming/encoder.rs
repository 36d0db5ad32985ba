use crate::encoders::stream::StreamCodec;
use crate::error::Result;
use std::io::{Read, Write};

const UNITS_PER_READ: usize = 16;

/// Streaming encoder for inputs too large to hold in memory.
///
/// Reads whole byte units from the source and writes their encoded text
/// as UTF-8. The final partial unit is zero-padded like
/// [`StreamCodec::encode`].
pub struct StreamingEncoder<'a, W: Write> {
    codec: &'a StreamCodec,
    writer: W,
}

impl<'a, W: Write> StreamingEncoder<'a, W> {
    pub fn new(codec: &'a StreamCodec, writer: W) -> Self {
        StreamingEncoder { codec, writer }
    }

    /// Encodes everything `reader` yields. Returns the number of input bytes.
    pub fn encode<R: Read>(&mut self, reader: &mut R) -> Result<u64> {
        let unit_bytes = self.codec.layout().unit_bytes();
        let mut buffer = vec![0u8; unit_bytes * UNITS_PER_READ];
        let mut total = 0u64;

        loop {
            let filled = read_full(reader, &mut buffer)?;
            if filled == 0 {
                break;
            }
            total += filled as u64;

            let encoded = self.codec.encode(&buffer[..filled])?;
            self.writer.write_all(encoded.as_bytes())?;

            if filled < buffer.len() {
                break;
            }
        }

        self.writer.flush()?;
        tracing::debug!(bytes = total, "streamed encode finished");
        Ok(total)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Fills `buf` unless the reader runs dry first.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

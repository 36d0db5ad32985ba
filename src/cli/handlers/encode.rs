use crate::cli::args::EncodeArgs;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use widebase::{ProfileConfig, Result, StreamingEncoder, write_atomic};

pub fn handle(args: EncodeArgs, profile: &ProfileConfig) -> Result<()> {
    let codec = profile.build_codec()?;
    if let Some(size) = args.size {
        tracing::debug!(size, "--size has no effect when encoding");
    }

    if args.stream {
        let mut reader = BufReader::new(File::open(&args.src)?);
        return write_atomic(&args.dst, |writer| {
            StreamingEncoder::new(&codec, writer).encode(&mut reader)?;
            Ok(())
        });
    }

    let data = fs::read(&args.src)?;
    let encoded = codec.encode(&data)?;
    tracing::info!(
        bytes = data.len(),
        chars = encoded.chars().count(),
        version = %codec.version(),
        "encoded"
    );
    write_atomic(&args.dst, |writer| Ok(writer.write_all(encoded.as_bytes())?))
}

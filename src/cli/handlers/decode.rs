use crate::cli::args::DecodeArgs;
use crate::cli::handlers::read_text;
use std::fs::File;
use std::io::{BufReader, Write};
use widebase::{ProfileConfig, Result, StreamingDecoder, write_atomic};

pub fn handle(args: DecodeArgs, profile: &ProfileConfig) -> Result<()> {
    let codec = profile.build_codec()?;

    if args.stream {
        let mut reader = BufReader::new(File::open(&args.src)?);
        return write_atomic(&args.dst, |writer| {
            let mut decoder = StreamingDecoder::new(&codec, writer);
            if let Some(size) = args.size {
                decoder = decoder.with_declared_len(size);
            }
            decoder.decode(&mut reader)?;
            Ok(())
        });
    }

    let text = read_text(&args.src)?;
    let decoded = codec.decode(&text, args.size)?;
    tracing::info!(bytes = decoded.len(), version = %codec.version(), "decoded");
    write_atomic(&args.dst, |writer| Ok(writer.write_all(&decoded)?))
}

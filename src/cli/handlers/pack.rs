use crate::cli::args::PackArgs;
use std::fs;
use widebase::{ProfileConfig, Result};

pub fn handle(args: PackArgs, profile: &ProfileConfig) -> Result<()> {
    let binary = fs::read(&args.bin)?;
    let packer = profile.build_packer()?;
    let artifact = packer.pack(&binary)?;
    artifact.write_to(&args.dst)?;

    println!(
        "packed {} bytes -> {} compressed -> {} chars ({} bootstrap, charset {})",
        binary.len(),
        artifact.compressed_len,
        artifact.encoded_chars,
        packer.renderer().name(),
        artifact.version
    );
    Ok(())
}

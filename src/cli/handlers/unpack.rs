use crate::cli::args::UnpackArgs;
use crate::cli::handlers::read_text;
use std::io::Write;
use widebase::{ProfileConfig, Result, write_atomic};

pub fn handle(args: UnpackArgs, profile: &ProfileConfig) -> Result<()> {
    let text = read_text(&args.artifact)?;
    let packer = profile.build_packer()?;
    let binary = packer.unpack(&text)?;
    write_atomic(&args.dst, |writer| Ok(writer.write_all(&binary)?))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&args.dst, std::fs::Permissions::from_mode(0o755))?;
    }

    println!("unpacked {} bytes", binary.len());
    Ok(())
}

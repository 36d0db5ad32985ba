use crate::cli::args::LayoutArgs;
use widebase::{ChunkLayout, MAX_UNIT_BYTES, ProfileConfig, Result};

pub fn handle(args: LayoutArgs, profile: &ProfileConfig) -> Result<()> {
    let alphabet = profile.build_alphabet()?;
    let current = profile.layout(alphabet.base())?;
    let best = ChunkLayout::best(alphabet.base(), args.max_bytes.clamp(1, MAX_UNIT_BYTES))?;

    println!("charset:  {} symbols", alphabet.base());
    print_layout("profile", &current);
    print_layout("best", &best);
    Ok(())
}

fn print_layout(label: &str, layout: &ChunkLayout) {
    println!(
        "{:<8}  {} bytes -> {} chars ({:.4} bits/char)",
        format!("{}:", label),
        layout.unit_bytes(),
        layout.unit_chars(),
        layout.efficiency()
    );
}

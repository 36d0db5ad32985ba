use crate::cli::args::CharsetAction;
use widebase::{Alphabet, ProfileConfig, Result};

pub fn handle(action: CharsetAction, profile: &ProfileConfig) -> Result<()> {
    let alphabet = profile.build_alphabet()?;
    match action {
        CharsetAction::Build { dst } => {
            alphabet.charset().save(&dst)?;
            println!(
                "wrote {} code points to {} (version {})",
                alphabet.base(),
                dst.display(),
                alphabet.version()
            );
            Ok(())
        }
        CharsetAction::Show { json } => show(&alphabet, json),
    }
}

fn show(alphabet: &Alphabet, json: bool) -> Result<()> {
    let tables = alphabet.tables();
    let encode = tables.encode_table().entries();
    let decode = tables.decode_table().entries();

    if json {
        let output = serde_json::json!({
            "version": alphabet.version().to_string(),
            "size": alphabet.base(),
            "runs": tables.len(),
            "encode_table": encode,
            "decode_table": decode,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("version:  {}", alphabet.version());
    println!("size:     {}", alphabet.base());
    println!("runs:     {}", tables.len());
    println!();
    println!("encode (index >= threshold -> + offset):");
    for (threshold, offset) in encode {
        println!("  {:>6}  +{}", threshold, offset);
    }
    println!("decode (code point <= bound -> - offset):");
    for (bound, offset) in decode {
        println!("  {:>6}  -{}", bound, offset);
    }
    Ok(())
}

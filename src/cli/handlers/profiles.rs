use widebase::{ProfileRegistry, Result};

pub fn handle(registry: &ProfileRegistry) -> Result<()> {
    println!("Available profiles:\n");
    let mut profiles: Vec<_> = registry.profiles.iter().collect();
    profiles.sort_by_key(|(name, _)| *name);

    let default = registry.settings.default_profile.as_deref();
    for (name, profile) in profiles {
        let marker = if Some(name.as_str()) == default { "*" } else { " " };
        let source = match &profile.charset_file {
            Some(path) => format!("file {}", path),
            None => format!("{} forbidden", profile.forbid.len()),
        };
        println!(
            "{} {:<15} {:>4} bytes/unit  {:<6} {:<7} {}",
            marker, name, profile.unit_bytes, profile.compression, profile.bootstrap, source
        );
    }
    Ok(())
}

mod args;
mod global;
mod handlers;
mod logging;

use args::{CharsetAction, DecodeArgs, EncodeArgs, LayoutArgs, PackArgs, UnpackArgs};
use clap::{Parser, Subcommand};
use global::GlobalArgs;
use std::process::ExitCode;
use widebase::{ProfileRegistry, Result};

#[derive(Parser)]
#[command(name = "widebase")]
#[command(version)]
#[command(about = "Dense binary-to-text codec over a ~63k code point alphabet, with a self-extracting packer", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a binary file to text
    Encode(EncodeArgs),

    /// Decode text back to bytes
    Decode(DecodeArgs),

    /// Pack an executable into a self-extracting script
    Pack(PackArgs),

    /// Recover the executable from a packed script without running it
    Unpack(UnpackArgs),

    /// Build or inspect the profile's charset
    Charset {
        #[command(subcommand)]
        action: CharsetAction,
    },

    /// Show the chunk layout for the profile's charset
    Layout(LayoutArgs),

    /// List available profiles
    Profiles,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logging(cli.global.verbose);

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error[{}]: {}", e.kind(), e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let registry = load_registry(&cli.global)?;

    if let Commands::Profiles = cli.command {
        return handlers::profiles::handle(&registry);
    }

    let (name, profile) = registry.resolve(cli.global.profile.as_deref())?;
    tracing::debug!(profile = %name, "resolved profile");

    match cli.command {
        Commands::Encode(args) => handlers::encode::handle(args, profile),
        Commands::Decode(args) => handlers::decode::handle(args, profile),
        Commands::Pack(args) => handlers::pack::handle(args, profile),
        Commands::Unpack(args) => handlers::unpack::handle(args, profile),
        Commands::Charset { action } => handlers::charset::handle(action, profile),
        Commands::Layout(args) => handlers::layout::handle(args, profile),
        Commands::Profiles => handlers::profiles::handle(&registry),
    }
}

fn load_registry(global: &GlobalArgs) -> Result<ProfileRegistry> {
    let mut registry = ProfileRegistry::load_with_overrides()?;
    if let Some(path) = &global.config {
        registry.merge(ProfileRegistry::load_from_file(path)?);
    }
    Ok(registry)
}

use clap::Args;
use std::path::PathBuf;

/// Global arguments that apply to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Profile to use (defaults to settings.default_profile)
    #[arg(short = 'p', long, global = true)]
    pub profile: Option<String>,

    /// Extra profiles file merged over the built-in and user profiles
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log more to stderr (-v info, -vv debug); WIDEBASE_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

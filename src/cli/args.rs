use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Arguments for encoding a file
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Binary file to encode
    pub src: PathBuf,

    /// Where to write the encoded text
    pub dst: PathBuf,

    /// Accepted for symmetry with decode; the input length is always used
    #[arg(long, value_name = "N")]
    pub size: Option<usize>,

    /// Encode unit by unit without loading the whole input
    #[arg(short = 's', long)]
    pub stream: bool,
}

/// Arguments for decoding a file
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Encoded text file
    pub src: PathBuf,

    /// Where to write the decoded bytes
    pub dst: PathBuf,

    /// Original size in bytes; without it the zero padding is kept
    #[arg(long, value_name = "N")]
    pub size: Option<usize>,

    /// Decode unit by unit without loading the whole input
    #[arg(short = 's', long)]
    pub stream: bool,
}

/// Arguments for packing an executable
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Executable to pack
    pub bin: PathBuf,

    /// Where to write the self-extracting script
    pub dst: PathBuf,
}

/// Arguments for unpacking an artifact without running it
#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// Artifact produced by `pack`
    pub artifact: PathBuf,

    /// Where to write the recovered executable
    pub dst: PathBuf,
}

/// Arguments for chunk layout inspection
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Largest byte unit to consider when searching for the best layout
    #[arg(long, value_name = "N", default_value = "512")]
    pub max_bytes: usize,
}

/// Charset subcommand actions
#[derive(Subcommand, Debug)]
pub enum CharsetAction {
    /// Run the profile's oracle and persist the charset as JSON
    Build {
        /// Output file
        dst: PathBuf,
    },

    /// Show the charset version and its offset tables
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// tbext - upload ThingsBoard JS extension modules
#[derive(Parser, Debug)]
#[command(name = "tbext")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a tbext.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Defaults to `upload`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or update the extension module on ThingsBoard
    Upload(UploadArgs),

    /// Show version information
    Version(VersionArgs),
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Upload(UploadArgs::default())
    }
}

#[derive(Args, Debug, Default)]
pub struct UploadArgs {
    /// JS file to upload (overrides config)
    #[arg(short, long)]
    pub file: Option<Utf8PathBuf>,

    /// Resources requested per listing page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Fail when a listing page cannot be fetched
    #[arg(long)]
    pub strict_listing: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

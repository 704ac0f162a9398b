use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bootstrap and manage documentation directory structures"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter docstrap.yaml into the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Create the documentation structure described by a configuration file
    Create(CreateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Path to configuration file (e.g., config/docstrap.yaml)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Project root directory (default: current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Answer yes to all prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Generate mkdocs.yaml even if the configuration does not ask for it
    #[arg(long)]
    pub mkdocs: bool,
}

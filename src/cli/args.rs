//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Environaut - Environment checks for application deployments.
#[derive(Debug, Parser)]
#[command(name = "environaut")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory to run in (overrides current directory)
    #[arg(short = 'w', long, global = true, value_name = "DIR")]
    pub working_dir: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

use super::commands::cache::CacheArgs;

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the configured checks and export settings (default)
    Check(CheckArgs),

    /// Show the merged configuration
    Config(ConfigArgs),

    /// Inspect the settings cache
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Config file or directory; may be repeated, later locations win
    #[arg(short, long = "config", value_name = "LOCATION")]
    pub config: Vec<PathBuf>,

    /// Neither read nor write the settings cache
    #[arg(long)]
    pub no_cache: bool,

    /// Cache file to read from and write to
    #[arg(long, value_name = "PATH")]
    pub cache_location: Option<PathBuf>,

    /// Cache file to read from
    #[arg(long, value_name = "PATH")]
    pub read_cache_location: Option<PathBuf>,

    /// Cache file to write to
    #[arg(long, value_name = "PATH")]
    pub write_cache_location: Option<PathBuf>,

    /// Only run checks in these groups (may be repeated)
    #[arg(short, long = "group", value_name = "GROUP")]
    pub groups: Vec<String>,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Config file or directory; may be repeated, later locations win
    #[arg(short, long = "config", value_name = "LOCATION")]
    pub config: Vec<PathBuf>,

    /// Output as YAML instead of JSON
    #[arg(long)]
    pub yaml: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

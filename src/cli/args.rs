//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Ruta asset pipeline rule table CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: ruta.toml)
    #[arg(short = 'C', long, default_value = "ruta.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a starter ruta.toml
    #[command(visible_alias = "i")]
    Init {
        /// Target directory (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        name: Option<PathBuf>,

        /// Print the config template to stdout instead of writing it
        #[arg(long)]
        dry: bool,
    },

    /// Resolve paths to their transform chains and output placement
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Validate the rule table and report all diagnostics
    #[command(visible_alias = "v")]
    Validate {
        /// Enable verbose output for debugging
        #[arg(short = 'V', long)]
        verbose: bool,
    },
}

/// Output format for the resolve command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveFormat {
    Text,
    Json,
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Paths to resolve. Use `-` to read paths from stdin (one per line).
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ResolveFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Read each file and use its content digest for [hash] tokens
    #[arg(long)]
    pub content: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

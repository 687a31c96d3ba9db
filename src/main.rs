//! Ruta - an asset pipeline rule table.
//!
//! Given a file path and an ordered rule table, decides which transform
//! chain applies and where the produced artifact goes. Running the
//! transformations and emitting files is the surrounding build tool's job.

#![allow(dead_code)]

mod cli;
mod config;
mod logger;
mod rule;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PipelineConfig;
use rule::RuleTable;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Init { name, dry } => cli::init::init_pipeline(&cli, name.as_deref(), *dry),
        Commands::Resolve { args } => {
            logger::set_verbose(args.verbose);
            let config = PipelineConfig::load(&cli)?;
            let table = RuleTable::compile(&config)?;
            cli::resolve::run_resolve(args, &table)
        }
        Commands::Validate { verbose } => {
            logger::set_verbose(*verbose);
            cli::validate::run_validate(&cli)
        }
    }
}

//! Validate command: compile the rule table and report all diagnostics.

use anyhow::Result;

use crate::cli::Cli;
use crate::config::PipelineConfig;
use crate::log;
use crate::rule::RuleTable;
use crate::utils::plural_count;

/// Load the config and compile the table, reporting every problem at once.
pub fn run_validate(cli: &Cli) -> Result<()> {
    let config = PipelineConfig::load(cli)?;
    let table = RuleTable::compile(&config)?;

    log!(
        "validate";
        "ok: {} in {}",
        plural_count(table.len(), "rule"),
        config.root_relative(&config.config_path).display()
    );
    Ok(())
}

//! Pipeline initialization: write a starter `ruta.toml`.
//!
//! The starter table mirrors a typical front-end pipeline: style chains,
//! hashed image names, linted and transpiled scripts, and a catch-all so
//! unmatched files are never dropped silently.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::log;

/// Generate ruta.toml content with comments
pub fn generate_config_template() -> String {
    format!(
        r##"# Ruta configuration file (v{})
# https://github.com/ruta-rs/ruta

# What to do with files no rule matches: "passthrough", "skip", or "error"
on_unmatched = "passthrough"

[output]
dir = "dist"
filename = "[name].[ext]"

[[rules]]
test = "*.css"
use = ["style-loader", "css-loader"]

[[rules]]
test = "*.less"
use = ["style-loader", "css-loader", "less-loader"]

[[rules]]
test = 're:\.(png|jpe?g|gif)$'
use = [{{ name = "url-loader", options = {{ limit = 8192 }} }}]
output = {{ filename = "[hash:8].[ext]", dir = "imgs" }}

[[rules]]
test = "*.js"
exclude = "node_modules/**"
use = [
    {{ name = "eslint-loader", enforce = "pre", options = {{ fix = true }} }},
    "babel-loader",
]

# Catch-all: copy everything else as-is
[[rules]]
test = "**"
use = ["file-loader"]
"##,
        env!("CARGO_PKG_VERSION")
    )
}

/// Create a starter config in the target directory.
///
/// If `dry` is true, only prints the config template to stdout.
pub fn init_pipeline(cli: &Cli, name: Option<&Path>, dry: bool) -> Result<()> {
    if dry {
        print!("{}", generate_config_template());
        return Ok(());
    }

    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let target = match name {
        Some(name) => cwd.join(name),
        None => cwd,
    };

    let config_name = cli
        .config
        .file_name()
        .map(Path::new)
        .unwrap_or_else(|| Path::new("ruta.toml"));
    let config_path = target.join(config_name);

    if config_path.exists() {
        log!("error"; "'{}' already exists", config_path.display());
        std::process::exit(1);
    }

    fs::create_dir_all(&target)
        .with_context(|| format!("Failed to create '{}'", target.display()))?;
    fs::write(&config_path, generate_config_template())
        .with_context(|| format!("Failed to write '{}'", config_path.display()))?;

    log!("init"; "wrote {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::rule::RuleTable;

    #[test]
    fn test_template_parses_and_compiles() {
        let config = PipelineConfig::from_str(&generate_config_template()).unwrap();
        let table = RuleTable::compile(&config).unwrap();
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_template_chains_behave() {
        let config = PipelineConfig::from_str(&generate_config_template()).unwrap();
        let table = RuleTable::compile(&config).unwrap();

        // lint step is ordered before the transpile step
        let js = table.resolve("src/index.js").unwrap();
        let names: Vec<_> = js.matched().unwrap().steps.iter().map(|s| &s.name).collect();
        assert_eq!(names, ["eslint-loader", "babel-loader"]);

        // vendored scripts fall through to the catch-all
        let vendored = table.resolve("node_modules/lodash/index.js").unwrap();
        assert_eq!(
            vendored.matched().unwrap().steps[0].name,
            "file-loader"
        );

        // images get hashed names under imgs/
        let img = table.resolve("assets/logo.png").unwrap();
        assert!(
            img.matched()
                .unwrap()
                .output_path
                .starts_with(table.output_root().join("imgs"))
        );
    }
}

//! Pipeline configuration management for `ruta.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── output     # [output] (root dir, default filename template)
//! │   └── rules      # [[rules]] (test/exclude/use/output)
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # PipelineConfig (this file)
//! ```
//!
//! Loading is strict about shape: unknown fields are collected via
//! `serde_ignored`, reported as warnings, and loading only proceeds after
//! the user confirms. Everything that can be wrong with the rule set
//! itself is validated when the table is compiled, never at resolution
//! time.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

// Re-export from section/
pub use section::{OutputConfig, RuleConfig, RuleOutputConfig, StepEntry, UnmatchedPolicy};

// Re-export from types/
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::Cli;
use crate::log;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing `ruta.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Output placement settings
    pub output: OutputConfig,

    /// Policy for files no rule matches
    pub on_unmatched: UnmatchedPolicy,

    /// Ordered rule entries (first match wins)
    pub rules: Vec<RuleConfig>,
}

impl PipelineConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file. The project root
    /// is the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = match find_config_file(&cli.config) {
            Some(path) => path,
            None => {
                log!(
                    "error";
                    "Config file '{}' not found. Run 'ruta init' to create one.",
                    cli.config.display()
                );
                std::process::exit(1);
            }
        };

        let mut config = Self::from_path(&config_path)?;

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = crate::utils::path::normalize_path(&config_path);
        config.root = crate::utils::path::normalize_path(&root);
        config.output.normalize(&config.root);

        Ok(config)
    }

    /// Parse configuration from TOML string (paths left unnormalized).
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::handle_unknown_fields(&ignored, path, &mut io::stdin().lock())?;
        }

        Ok(config)
    }

    /// Warn about unknown fields and ask whether to continue anyway.
    fn handle_unknown_fields(
        fields: &[String],
        path: &Path,
        input: &mut impl BufRead,
    ) -> Result<()> {
        Self::print_unknown_fields_warning(fields, path);
        if !Self::prompt_continue(input)? {
            bail!("Aborted due to unknown config fields");
        }
        Ok(())
    }

    /// Prompt user to continue. Returns true only if user explicitly confirms.
    fn prompt_continue(input: &mut impl BufRead) -> Result<bool> {
        eprint!("Continue? [y/N] ");
        io::stderr().flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;

        let line = line.trim().to_lowercase();
        // Default no (empty input), explicit "y" or "yes" to continue
        Ok(line == "y" || line == "yes")
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result: Result<PipelineConfig, _> = toml::from_str("[output\ndir = \"dist\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_str("").unwrap();
        assert_eq!(config.output.dir, PathBuf::from("dist"));
        assert_eq!(config.on_unmatched, UnmatchedPolicy::Passthrough);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let config = PipelineConfig::from_str(
            r#"
on_unmatched = "error"

[output]
dir = "build"
filename = "[name]-[hash].[ext]"

[[rules]]
test = "*.css"
use = ["style-loader", "css-loader"]

[[rules]]
test = "*.less"
use = ["style-loader", "css-loader", "less-loader"]
"#,
        )
        .unwrap();

        assert_eq!(config.on_unmatched, UnmatchedPolicy::Error);
        assert_eq!(config.output.dir, PathBuf::from("build"));
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[1].test, "*.less");
        assert_eq!(config.rules[1].steps.len(), 3);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[output]\ndir = \"dist\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.output.dir, PathBuf::from("dist"));
        assert!(!ignored.is_empty());
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[[rules]]\ntest = \"*.css\"\nuse = [\"css-loader\"]";
        let (_, ignored) = PipelineConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_unknown_fields_abort_on_decline() {
        let fields = vec![String::from("unknown_section")];
        let path = Path::new("ruta.toml");

        // Default answer is no
        let err = PipelineConfig::handle_unknown_fields(&fields, path, &mut "\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("Aborted"));

        let err = PipelineConfig::handle_unknown_fields(&fields, path, &mut "n\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("Aborted"));
    }

    #[test]
    fn test_unknown_fields_continue_on_confirm() {
        let fields = vec![String::from("unknown_section")];
        let path = Path::new("ruta.toml");

        assert!(
            PipelineConfig::handle_unknown_fields(&fields, path, &mut "y\n".as_bytes()).is_ok()
        );
        assert!(
            PipelineConfig::handle_unknown_fields(&fields, path, &mut "YES\n".as_bytes()).is_ok()
        );
    }

    #[test]
    fn test_root_relative() {
        let mut config = PipelineConfig::default();
        config.root = PathBuf::from("/project");
        assert_eq!(
            config.root_relative("/project/src/style.css"),
            PathBuf::from("src/style.css")
        );
        assert_eq!(
            config.root_relative("/elsewhere/a.css"),
            PathBuf::from("/elsewhere/a.css")
        );
    }
}

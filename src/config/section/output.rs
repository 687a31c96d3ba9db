//! `[output]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [output]
//! dir = "dist"
//! filename = "[name].[ext]"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::rule::NamingTemplate;

/// Field paths for diagnostics.
pub struct OutputConfigFields {
    pub dir: FieldPath,
    pub filename: FieldPath,
}

/// Pipeline-level output settings: the output root and the default
/// filename template used by rules without their own `output` spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output root directory (relative to project root).
    pub dir: PathBuf,

    /// Default filename template for matched assets.
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dist"),
            filename: "[name].[ext]".to_string(),
        }
    }
}

impl OutputConfig {
    pub const FIELDS: OutputConfigFields = OutputConfigFields {
        dir: FieldPath::new("output.dir"),
        filename: FieldPath::new("output.filename"),
    };

    /// Validate the output root and default filename template.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.dir.as_os_str().is_empty() {
            diag.error(Self::FIELDS.dir, "must not be empty");
        }

        if let Err(e) = NamingTemplate::parse(&self.filename) {
            diag.error(
                Self::FIELDS.filename,
                format!("template '{}': {e}", self.filename),
            );
        }
    }

    /// Normalize the output root relative to the project root.
    pub fn normalize(&mut self, root: &std::path::Path) {
        self.dir = crate::utils::path::normalize_path(&root.join(&self.dir));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OutputConfig::default();
        assert_eq!(config.dir, PathBuf::from("dist"));
        assert_eq!(config.filename, "[name].[ext]");
    }

    #[test]
    fn test_parse_section() {
        let config: OutputConfig =
            toml::from_str("dir = \"build\"\nfilename = \"[hash].[ext]\"").unwrap();
        assert_eq!(config.dir, PathBuf::from("build"));
        assert_eq!(config.filename, "[hash].[ext]");
    }

    #[test]
    fn test_validate_rejects_empty_dir() {
        let config: OutputConfig = toml::from_str("dir = \"\"").unwrap();
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_rejects_bad_template() {
        let config: OutputConfig = toml::from_str("filename = \"[bogus]\"").unwrap();
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.has_errors());
        assert!(diag.errors()[0].message.contains("[bogus]"));
    }
}

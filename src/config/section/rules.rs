//! `[[rules]]` section configuration.
//!
//! Raw rule shapes as they appear in `ruta.toml`, before compilation into a
//! [`RuleTable`](crate::rule::RuleTable). Key names follow the bundler
//! ecosystem (`test`, `exclude`, `use`, `enforce`) for familiarity.
//!
//! # Example
//!
//! ```toml
//! [[rules]]
//! test = "*.js"
//! exclude = "node_modules/**"
//! use = [
//!     { name = "eslint-loader", enforce = "pre", options = { fix = true } },
//!     "babel-loader",
//! ]
//!
//! [[rules]]
//! test = "*.png"
//! use = ["url-loader"]
//! output = { filename = "[hash:8].[ext]", dir = "imgs" }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use toml::Table;

use crate::rule::{StepOrder, TransformStep};

// ============================================================================
// RuleConfig
// ============================================================================

/// One uncompiled rule entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Match pattern (glob, or `re:` regex).
    pub test: String,

    /// Exclusion pattern; a path matching it never matches this rule.
    #[serde(default)]
    pub exclude: Option<String>,

    /// Ordered transform steps.
    #[serde(rename = "use", alias = "steps", default)]
    pub steps: Vec<StepEntry>,

    /// Output placement override.
    #[serde(default)]
    pub output: Option<RuleOutputConfig>,
}

/// Per-rule output placement, both fields optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutputConfig {
    /// Filename template (defaults to `output.filename`).
    #[serde(default)]
    pub filename: Option<String>,

    /// Subdirectory under the output root.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

// ============================================================================
// StepEntry
// ============================================================================

/// A step as written in config: bare name or full table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepEntry {
    /// Simple step name string.
    Simple(String),
    /// Full format with options and precedence.
    Full {
        /// Transformation name.
        #[serde(alias = "loader")]
        name: String,
        /// Scalar options passed to the transformation.
        #[serde(default)]
        options: Table,
        /// Precedence group (`"pre"` runs before default-order steps).
        #[serde(default, rename = "enforce")]
        order: StepOrder,
    },
}

impl StepEntry {
    /// Step name as written.
    pub fn name(&self) -> &str {
        match self {
            Self::Simple(name) => name,
            Self::Full { name, .. } => name,
        }
    }

    /// Convert to a compiled [`TransformStep`].
    pub fn to_step(&self) -> TransformStep {
        match self {
            Self::Simple(name) => TransformStep::named(name.clone()),
            Self::Full {
                name,
                options,
                order,
            } => TransformStep {
                name: name.clone(),
                options: options.clone(),
                order: *order,
            },
        }
    }
}

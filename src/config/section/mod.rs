//! Configuration section definitions.

mod output;
mod rules;

pub use output::OutputConfig;
pub use rules::{RuleConfig, RuleOutputConfig, StepEntry};

use serde::{Deserialize, Serialize};

/// Policy for files no rule matches.
///
/// The resolver itself only reports `NoMatch`; this policy tells the
/// surrounding pipeline what to do with such files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmatchedPolicy {
    /// Emit the asset unchanged.
    #[default]
    Passthrough,
    /// Treat an unmatched file as an error.
    Error,
    /// Drop the asset silently.
    Skip,
}

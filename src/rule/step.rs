//! Transform steps: one named transformation with its options.

use serde::{Deserialize, Serialize};
use toml::Table;

// ============================================================================
// StepOrder
// ============================================================================

/// Precedence group of a step within its rule.
///
/// `Pre` steps run before `Default` steps regardless of declaration order;
/// declaration order is preserved within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOrder {
    Pre,
    #[default]
    Default,
}

// ============================================================================
// TransformStep
// ============================================================================

/// One named external transformation, applied to a matched asset.
///
/// `ruta` never invokes the transformation itself; it only selects and
/// orders steps for the surrounding pipeline to run.
#[derive(Debug, Clone, Serialize)]
pub struct TransformStep {
    /// Identifier of the external transformation (e.g. "css-loader").
    pub name: String,
    /// Scalar options passed through to the transformation.
    pub options: Table,
    /// Precedence group.
    pub order: StepOrder,
}

impl TransformStep {
    /// Create a step with no options and default order.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Table::new(),
            order: StepOrder::Default,
        }
    }

    /// Create a step in the `pre` precedence group.
    pub fn pre(name: impl Into<String>) -> Self {
        Self {
            order: StepOrder::Pre,
            ..Self::named(name)
        }
    }
}

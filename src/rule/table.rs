//! Rule table construction and validation.
//!
//! A [`RuleTable`] is compiled once from [`PipelineConfig`] at startup and is
//! immutable afterwards, so concurrent `resolve` calls need no locking. All
//! construction problems (malformed patterns, bad templates, empty step
//! lists) are collected into one diagnostics batch, each message carrying
//! the offending rule's index. Nothing fails at resolution time.

use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::config::{
    ConfigDiagnostics, ConfigError, FieldPath, PipelineConfig, RuleConfig, UnmatchedPolicy,
};

use super::output::{NamingTemplate, OutputSpec};
use super::pattern::Pattern;
use super::step::{StepOrder, TransformStep};

const RULES: FieldPath = FieldPath::new("rules");

// ============================================================================
// Rule
// ============================================================================

/// A compiled rule: match/exclude predicate pair, ordered steps, and
/// output placement.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Position in the table (used in diagnostics and first-match-wins).
    pub index: usize,
    /// Match pattern.
    pub pattern: Pattern,
    /// Exclusion pattern; a matching path never selects this rule.
    pub exclude: Option<Pattern>,
    /// Steps, already stably ordered: `pre` group before default group.
    pub steps: Vec<TransformStep>,
    /// Output placement override.
    pub output: Option<OutputSpec>,
}

impl Rule {
    /// Whether this rule selects the given path.
    #[inline]
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches(path) && !self.exclude.as_ref().is_some_and(|e| e.matches(path))
    }
}

// ============================================================================
// RuleTable
// ============================================================================

/// The immutable, ordered rule table.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
    output_root: PathBuf,
    default_filename: NamingTemplate,
    on_unmatched: UnmatchedPolicy,
}

impl RuleTable {
    /// Compile the raw config into a table, collecting ALL validation
    /// errors before failing.
    pub fn compile(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        config.output.validate(&mut diag);

        let mut rules = Vec::with_capacity(config.rules.len());
        let mut seen: FxHashMap<(&str, Option<&str>), usize> = FxHashMap::default();

        for (idx, raw) in config.rules.iter().enumerate() {
            // Identical test/exclude pairs are legal but pointless: the
            // later rule is shadowed by first-match-wins.
            let key = (raw.test.as_str(), raw.exclude.as_deref());
            if let Some(prev) = seen.insert(key, idx) {
                diag.warn(
                    RULES,
                    format!(
                        "[{idx}] duplicates rule {prev} (test '{}'); shadowed by first-match-wins",
                        raw.test
                    ),
                );
            }

            if let Some(rule) = Self::compile_rule(raw, idx, &mut diag) {
                rules.push(rule);
            }
        }

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)?;

        // Infallible after into_result: the default template was validated above.
        let default_filename = NamingTemplate::parse(&config.output.filename)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        Ok(Self {
            rules,
            output_root: config.output.dir.clone(),
            default_filename,
            on_unmatched: config.on_unmatched,
        })
    }

    /// Compile one rule, pushing diagnostics for every problem found.
    fn compile_rule(raw: &RuleConfig, idx: usize, diag: &mut ConfigDiagnostics) -> Option<Rule> {
        let mut failed = false;

        let pattern = match Pattern::parse(&raw.test) {
            Ok(p) => Some(p),
            Err(e) => {
                diag.error(RULES, format!("[{idx}] pattern '{}': {e}", raw.test));
                failed = true;
                None
            }
        };

        let exclude = match &raw.exclude {
            Some(source) => match Pattern::parse(source) {
                Ok(p) => Some(p),
                Err(e) => {
                    diag.error(RULES, format!("[{idx}] exclude '{source}': {e}"));
                    failed = true;
                    None
                }
            },
            None => None,
        };

        if raw.steps.is_empty() {
            diag.error_with_hint(
                RULES,
                format!("[{idx}] rule '{}' has no steps", raw.test),
                "add a `use = [...]` list of transform names",
            );
            failed = true;
        }

        let mut steps: Vec<TransformStep> = raw.steps.iter().map(|e| e.to_step()).collect();
        for step in &steps {
            for (key, value) in &step.options {
                if !is_scalar(value) {
                    diag.error(
                        RULES,
                        format!(
                            "[{idx}] step '{}' option '{key}': expected a scalar value",
                            step.name
                        ),
                    );
                    failed = true;
                }
            }
        }
        // Stable partition: `pre` group first, declaration order kept
        // within each group.
        steps.sort_by_key(|s| s.order == StepOrder::Default);

        let output = match &raw.output {
            Some(raw_output) => {
                let filename = match &raw_output.filename {
                    Some(template) => match NamingTemplate::parse(template) {
                        Ok(t) => Some(t),
                        Err(e) => {
                            diag.error(RULES, format!("[{idx}] template '{template}': {e}"));
                            failed = true;
                            None
                        }
                    },
                    None => None,
                };

                if let Some(dir) = &raw_output.dir
                    && let Some(reason) = unsafe_path_component(dir)
                {
                    diag.error(
                        RULES,
                        format!("[{idx}] output dir '{}': {reason}", dir.display()),
                    );
                    failed = true;
                }

                Some(OutputSpec {
                    filename,
                    dir: raw_output.dir.clone(),
                })
            }
            None => None,
        };

        if failed {
            return None;
        }

        Some(Rule {
            index: idx,
            pattern: pattern?,
            exclude,
            steps,
            output,
        })
    }

    /// Rules in declaration order.
    #[inline]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Output root all artifact paths are placed under.
    #[inline]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Default filename template for rules without an `output` spec.
    #[inline]
    pub(super) fn default_filename(&self) -> &NamingTemplate {
        &self.default_filename
    }

    /// Configured policy for unmatched files.
    #[inline]
    pub fn on_unmatched(&self) -> UnmatchedPolicy {
        self.on_unmatched
    }
}

/// Scalar check for step options (string, integer, float, boolean).
fn is_scalar(value: &toml::Value) -> bool {
    matches!(
        value,
        toml::Value::String(_)
            | toml::Value::Integer(_)
            | toml::Value::Float(_)
            | toml::Value::Boolean(_)
    )
}

/// Check an output subdirectory for unsafe components.
fn unsafe_path_component(path: &Path) -> Option<&'static str> {
    for comp in path.components() {
        match comp {
            Component::ParentDir => return Some("parent directory '..' not allowed"),
            Component::Prefix(_) | Component::RootDir => {
                return Some("absolute paths not allowed");
            }
            _ => {}
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================

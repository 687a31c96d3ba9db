//! First-match-wins resolution of a path against the rule table.
//!
//! Resolution is a pure function over `(path, table)`: no I/O, no caching,
//! deterministic. `NoMatch` is a valid outcome, not an error; the caller
//! applies the pipeline's [`UnmatchedPolicy`](crate::config::UnmatchedPolicy).

use std::path::PathBuf;

use thiserror::Error;

use crate::utils::hash;

use super::step::TransformStep;
use super::table::{Rule, RuleTable};

/// Resolution call errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("empty input path")]
    EmptyPath,
}

/// Outcome of resolving one path.
#[derive(Debug)]
pub enum Resolution<'t> {
    /// A rule matched; the asset gets this transform chain and placement.
    Matched(ResolutionResult<'t>),
    /// No rule applies; caller decides (passthrough, skip, or error).
    NoMatch,
}

impl<'t> Resolution<'t> {
    /// Matched result, if any.
    pub fn matched(&self) -> Option<&ResolutionResult<'t>> {
        match self {
            Self::Matched(result) => Some(result),
            Self::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// A matched rule with its effective steps and resolved output path.
#[derive(Debug)]
pub struct ResolutionResult<'t> {
    /// The selected rule.
    pub rule: &'t Rule,
    /// Steps in effective order (`pre` group first).
    pub steps: &'t [TransformStep],
    /// Artifact placement under the output root.
    pub output_path: PathBuf,
}

impl RuleTable {
    /// Resolve a path using a digest of the path string for `[hash]` tokens.
    pub fn resolve(&self, path: &str) -> Result<Resolution<'_>, ResolveError> {
        if path.is_empty() {
            return Err(ResolveError::EmptyPath);
        }
        Ok(self.resolve_inner(path, &hash::path_digest(path)))
    }

    /// Resolve a path using a blake3 digest of the asset bytes, for
    /// content-addressed output names.
    pub fn resolve_with_content(
        &self,
        path: &str,
        content: &[u8],
    ) -> Result<Resolution<'_>, ResolveError> {
        if path.is_empty() {
            return Err(ResolveError::EmptyPath);
        }
        Ok(self.resolve_inner(path, &hash::content_digest(content)))
    }

    fn resolve_inner(&self, path: &str, digest: &str) -> Resolution<'_> {
        // First match wins, never best match.
        let Some(rule) = self.rules().iter().find(|rule| rule.matches(path)) else {
            return Resolution::NoMatch;
        };

        let spec = rule.output.as_ref();
        let template = spec
            .and_then(|s| s.filename.as_ref())
            .unwrap_or_else(|| self.default_filename());
        let file_name = template.render(path, digest);

        let output_path = match spec.and_then(|s| s.dir.as_ref()) {
            Some(dir) => self.output_root().join(dir).join(file_name),
            None => self.output_root().join(file_name),
        };

        Resolution::Matched(ResolutionResult {
            rule,
            steps: &rule.steps,
            output_path,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;

    fn table(toml: &str) -> RuleTable {
        RuleTable::compile(&PipelineConfig::from_str(toml).unwrap()).unwrap()
    }

    fn step_names<'t>(result: &ResolutionResult<'t>) -> Vec<&'t str> {
        result.steps.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_empty_table_no_match() {
        let table = table("");
        assert!(!table.resolve("anything.css").unwrap().is_match());
    }

    #[test]
    fn test_empty_path_is_an_error() {
        let table = table("");
        assert_eq!(table.resolve("").unwrap_err(), ResolveError::EmptyPath);
        assert_eq!(
            table.resolve_with_content("", b"x").unwrap_err(),
            ResolveError::EmptyPath
        );
    }

    #[test]
    fn test_style_chain_selection() {
        // css matches the first rule, less the second with the longer chain
        let table = table(
            r#"
[[rules]]
test = "*.css"
use = ["style-loader", "css-loader"]

[[rules]]
test = "*.less"
use = ["style-loader", "css-loader", "less-loader"]
"#,
        );

        let resolution = table.resolve("style.less").unwrap();
        let result = resolution.matched().unwrap();
        assert_eq!(result.rule.index, 1);
        assert_eq!(
            step_names(result),
            ["style-loader", "css-loader", "less-loader"]
        );
    }

    #[test]
    fn test_first_match_wins() {
        let table = table(
            r#"
[[rules]]
test = "*.css"
use = ["first"]

[[rules]]
test = "**/*.css"
use = ["second"]
"#,
        );

        let resolution = table.resolve("src/style.css").unwrap();
        assert_eq!(resolution.matched().unwrap().rule.index, 0);
    }

    #[test]
    fn test_exclusion_precedence() {
        let table = table(
            r#"
[[rules]]
test = "*.js"
exclude = "node_modules/**"
use = [
    { name = "eslint-loader", enforce = "pre" },
    "babel-loader",
]
"#,
        );

        // the exclude skips the rule entirely, even though test matches
        assert!(!table.resolve("node_modules/x.js").unwrap().is_match());

        let resolution = table.resolve("src/app.js").unwrap();
        let result = resolution.matched().unwrap();
        assert_eq!(step_names(result), ["eslint-loader", "babel-loader"]);
    }

    #[test]
    fn test_hashed_output_under_subdirectory() {
        let table = table(
            r#"
[[rules]]
test = "*.png"
use = ["url-loader"]
output = { filename = "[hash:4].[ext]", dir = "imgs" }
"#,
        );

        let resolution = table.resolve("logo.png").unwrap();
        let output = &resolution.matched().unwrap().output_path;
        let name = output.file_name().unwrap().to_str().unwrap();

        assert!(output.starts_with(table.output_root().join("imgs")));
        assert_eq!(name.len(), "abcd.png".len());
        assert!(name.ends_with(".png"));
        let hash_part = name.strip_suffix(".png").unwrap();
        assert_eq!(hash_part.len(), 4);
        assert!(hash_part.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_default_template_at_output_root() {
        let table = table(
            r#"
[output]
dir = "dist"

[[rules]]
test = "*.css"
use = ["css-loader"]
"#,
        );

        let resolution = table.resolve("src/style.css").unwrap();
        let output = &resolution.matched().unwrap().output_path;
        assert_eq!(output, &table.output_root().join("style.css"));
    }

    #[test]
    fn test_deterministic_repeated_calls() {
        let table = table(
            r#"
[[rules]]
test = "*.png"
use = ["url-loader"]
output = { filename = "[hash].[ext]" }
"#,
        );

        let first = table.resolve("logo.png").unwrap();
        let second = table.resolve("logo.png").unwrap();
        assert_eq!(
            first.matched().unwrap().output_path,
            second.matched().unwrap().output_path
        );
    }

    #[test]
    fn test_content_digest_differs_from_path_digest() {
        let table = table(
            r#"
[[rules]]
test = "*.png"
use = ["url-loader"]
output = { filename = "[hash:16].[ext]" }
"#,
        );

        let by_path = table.resolve("logo.png").unwrap();
        let by_content = table.resolve_with_content("logo.png", b"fake png").unwrap();
        assert_ne!(
            by_path.matched().unwrap().output_path,
            by_content.matched().unwrap().output_path
        );

        // content digest is stable for identical bytes
        let again = table.resolve_with_content("logo.png", b"fake png").unwrap();
        assert_eq!(
            by_content.matched().unwrap().output_path,
            again.matched().unwrap().output_path
        );
    }
}

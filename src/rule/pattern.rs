//! Path patterns for rule matching.
//!
//! Patterns are compiled once at table-construction time, never during
//! resolution. Two syntaxes:
//!
//! - Glob (default): `*` matches within one path segment, `**` crosses
//!   segments, `?` matches one non-separator character. A pattern without
//!   `/` matches the file name anywhere in the tree (`*.css` matches both
//!   `style.css` and `src/style.css`); a pattern containing `/` is anchored
//!   at the start of the path (`node_modules/*` matches `node_modules/x.js`).
//! - Raw regex with a `re:` prefix, unanchored, for bundler-style `test`
//!   expressions (`re:\.m?js$`).

use regex::Regex;
use thiserror::Error;

/// Pattern compilation errors, reported at table construction.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("empty pattern")]
    Empty,

    #[error("invalid regex `{pattern}`: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern string (glob, or raw regex with `re:` prefix).
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if source.is_empty() {
            return Err(PatternError::Empty);
        }

        let expr = match source.strip_prefix("re:") {
            Some(raw) => raw.to_string(),
            None => glob_to_regex(source),
        };

        let regex = Regex::new(&expr).map_err(|source_err| PatternError::Regex {
            pattern: source.to_string(),
            source: source_err,
        })?;

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Test the pattern against a `/`-separated path.
    #[inline]
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Original pattern text as written in the config.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Translate a glob into an anchored regex expression.
fn glob_to_regex(glob: &str) -> String {
    let mut expr = String::with_capacity(glob.len() * 2);

    // Bare file-name globs match at any depth; path globs are rooted.
    if glob.contains('/') {
        expr.push('^');
    } else {
        expr.push_str("(?:^|.*/)");
    }

    let mut chars = glob.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        // `**/` matches zero or more whole segments
                        expr.push_str("(?:.*/)?");
                    } else {
                        expr.push_str(".*");
                    }
                } else {
                    expr.push_str("[^/]*");
                }
            }
            '?' => expr.push_str("[^/]"),
            c => expr.push_str(&regex::escape(&c.to_string())),
        }
    }

    expr.push('$');
    expr
}

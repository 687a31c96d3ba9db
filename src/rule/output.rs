//! Output placement: naming templates and optional output subdirectories.
//!
//! Templates use bundler-style tokens:
//!
//! - `[name]` - source file stem
//! - `[ext]`  - source extension without the dot
//! - `[hash]` - 8 hex chars of the digest
//! - `[hash:N]` - N hex chars of the digest, 1..=16
//!
//! When the source has no extension, a literal `.[ext]` sequence collapses
//! so `[name].[ext]` renders `LICENSE` rather than `LICENSE.`.
//!
//! The `[hash:N]` width is capped at 16 for every digest source. Content
//! digests carry 64 hex chars, but templates are validated once at table
//! construction, before the digest mode is known, so the cap is uniform and
//! a table stays valid regardless of how it is later resolved.

use std::path::PathBuf;

use thiserror::Error;

/// Default width of the `[hash]` token (cache-busting fingerprint size).
const DEFAULT_HASH_LEN: usize = 8;

/// Maximum `[hash:N]` width; the path digest provides 16 hex chars.
const MAX_HASH_LEN: usize = 16;

/// Template parse errors, reported at table construction.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown token `[{0}]`")]
    UnknownToken(String),

    #[error("hash width {0} out of range (1..={MAX_HASH_LEN})")]
    HashWidth(usize),

    #[error("unclosed `[` in template")]
    Unclosed,
}

// ============================================================================
// NamingTemplate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Name,
    Ext,
    Hash(usize),
}

/// A parsed output filename template.
#[derive(Debug, Clone)]
pub struct NamingTemplate {
    source: String,
    tokens: Vec<Token>,
}

impl NamingTemplate {
    /// Parse a template string, rejecting unknown tokens up front.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('[') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after.find(']').ok_or(TemplateError::Unclosed)?;
            let token = &after[..close];

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(Self::parse_token(token)?);
            rest = &after[close + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            tokens,
        })
    }

    fn parse_token(token: &str) -> Result<Token, TemplateError> {
        match token {
            "name" => Ok(Token::Name),
            "ext" => Ok(Token::Ext),
            "hash" => Ok(Token::Hash(DEFAULT_HASH_LEN)),
            _ => {
                if let Some(width) = token.strip_prefix("hash:") {
                    let width: usize = width
                        .parse()
                        .map_err(|_| TemplateError::UnknownToken(token.to_string()))?;
                    if width == 0 || width > MAX_HASH_LEN {
                        return Err(TemplateError::HashWidth(width));
                    }
                    Ok(Token::Hash(width))
                } else {
                    Err(TemplateError::UnknownToken(token.to_string()))
                }
            }
        }
    }

    /// Render the template for a source path.
    ///
    /// `digest` is a hex string of at least 16 chars; `[hash:N]` takes its
    /// first N chars.
    pub fn render(&self, path: &str, digest: &str) -> String {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (name, ext) = match file_name.rsplit_once('.') {
            // Leading dot only (e.g. ".gitignore") is a name, not an extension
            Some((stem, ext)) if !stem.is_empty() => (stem, ext),
            _ => (file_name, ""),
        };

        let mut out = String::with_capacity(self.source.len() + DEFAULT_HASH_LEN);
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Name => out.push_str(name),
                Token::Hash(width) => out.push_str(&digest[..(*width).min(digest.len())]),
                Token::Ext => {
                    if ext.is_empty() {
                        // collapse a literal `.[ext]` for extension-less sources
                        if out.ends_with('.') {
                            out.pop();
                        }
                    } else {
                        out.push_str(ext);
                    }
                }
            }
        }
        out
    }

    /// Original template text as written in the config.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }
}

// ============================================================================
// OutputSpec
// ============================================================================

/// Per-rule output placement: naming template plus optional subdirectory
/// under the pipeline output root.
#[derive(Debug, Clone)]
pub struct OutputSpec {
    /// Filename template; `None` falls back to the pipeline default.
    pub filename: Option<NamingTemplate>,
    /// Subdirectory under the output root.
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "a1b2c3d4e5f60718";

    fn render(template: &str, path: &str) -> String {
        NamingTemplate::parse(template).unwrap().render(path, DIGEST)
    }

    #[test]
    fn test_name_ext_tokens() {
        assert_eq!(render("[name].[ext]", "src/style.css"), "style.css");
        assert_eq!(render("[name].min.[ext]", "app.js"), "app.min.js");
    }

    #[test]
    fn test_hash_default_width() {
        assert_eq!(render("[hash].[ext]", "logo.png"), "a1b2c3d4.png");
    }

    #[test]
    fn test_hash_explicit_width() {
        assert_eq!(render("[hash:4].[ext]", "logo.png"), "a1b2.png");
        assert_eq!(render("[hash:16]", "logo.png"), DIGEST);
    }

    #[test]
    fn test_extensionless_source_collapses_dot() {
        assert_eq!(render("[name].[ext]", "LICENSE"), "LICENSE");
        assert_eq!(render("[name].[ext]", "docs/LICENSE"), "LICENSE");
    }

    #[test]
    fn test_dotfile_is_a_name() {
        assert_eq!(render("[name].[ext]", ".gitignore"), ".gitignore");
    }

    #[test]
    fn test_literal_text_preserved() {
        assert_eq!(render("v2-[name].[ext]", "a/logo.png"), "v2-logo.png");
    }

    #[test]
    fn test_unknown_token_rejected() {
        assert!(matches!(
            NamingTemplate::parse("[nam]"),
            Err(TemplateError::UnknownToken(_))
        ));
    }

    #[test]
    fn test_hash_width_bounds() {
        assert!(matches!(
            NamingTemplate::parse("[hash:0]"),
            Err(TemplateError::HashWidth(0))
        ));
        assert!(matches!(
            NamingTemplate::parse("[hash:17]"),
            Err(TemplateError::HashWidth(17))
        ));
        assert!(NamingTemplate::parse("[hash:16]").is_ok());
    }

    #[test]
    fn test_unclosed_bracket_rejected() {
        assert!(matches!(
            NamingTemplate::parse("[name"),
            Err(TemplateError::Unclosed)
        ));
    }
}

//! Resolve command implementation.
//!
//! Resolves each input path against the compiled rule table and reports the
//! selected transform chain and output placement, in text or JSON.

use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde_json::{Value as JsonValue, json};

use crate::cli::args::{ResolveArgs, ResolveFormat};
use crate::config::UnmatchedPolicy;
use crate::rule::{Resolution, ResolutionResult, RuleTable};
use crate::utils::plural_count;
use crate::{debug, log};

/// Execute resolve command
pub fn run_resolve(args: &ResolveArgs, table: &RuleTable) -> Result<()> {
    let paths = collect_input_paths(&args.paths)?;
    let report = resolve_batch(args, table, &paths)?;

    if args.format == ResolveFormat::Json {
        let output = JsonValue::Array(report.entries);
        let formatted = if args.pretty {
            serde_json::to_string_pretty(&output)?
        } else {
            serde_json::to_string(&output)?
        };
        println!("{formatted}");
    } else {
        log!("resolve"; "resolved {}", plural_count(report.matched, "file"));
    }

    if report.unmatched_errors > 0 {
        bail!(
            "{} with no matching rule",
            plural_count(report.unmatched_errors, "file")
        );
    }
    Ok(())
}

/// Outcome of resolving a batch of paths, before any printing.
struct BatchReport {
    entries: Vec<JsonValue>,
    matched: usize,
    unmatched_errors: usize,
}

/// Resolve each path against the table, applying the unmatched policy.
fn resolve_batch(args: &ResolveArgs, table: &RuleTable, paths: &[PathBuf]) -> Result<BatchReport> {
    let policy = table.on_unmatched();

    let mut report = BatchReport {
        entries: Vec::with_capacity(paths.len()),
        matched: 0,
        unmatched_errors: 0,
    };

    for path in paths {
        // Patterns are defined over `/`-separated paths
        let path = path.to_string_lossy().replace('\\', "/");

        let resolution = if args.content {
            let bytes = fs::read(&path).with_context(|| format!("Failed to read '{path}'"))?;
            table.resolve_with_content(&path, &bytes)?
        } else {
            table.resolve(&path)?
        };

        match &resolution {
            Resolution::Matched(result) => {
                report.matched += 1;
                report_match(args, &path, result, &mut report.entries);
            }
            Resolution::NoMatch => match policy {
                UnmatchedPolicy::Passthrough => match args.format {
                    ResolveFormat::Text => log!("resolve"; "{path} (passthrough)"),
                    ResolveFormat::Json => {
                        report.entries.push(json!({ "path": path, "matched": false }));
                    }
                },
                UnmatchedPolicy::Skip => {
                    debug!("resolve"; "{path} skipped (no rule)");
                }
                UnmatchedPolicy::Error => {
                    log!("error"; "no rule matches '{path}'");
                    report.unmatched_errors += 1;
                }
            },
        }
    }

    Ok(report)
}

/// Record one matched path in the requested format.
fn report_match(
    args: &ResolveArgs,
    path: &str,
    result: &ResolutionResult<'_>,
    entries: &mut Vec<JsonValue>,
) {
    match args.format {
        ResolveFormat::Text => {
            let chain: Vec<&str> = result.steps.iter().map(|s| s.name.as_str()).collect();
            log!(
                "resolve";
                "{path} -> {} ({})",
                result.output_path.display(),
                chain.join(", ")
            );
        }
        ResolveFormat::Json => entries.push(resolution_to_json(path, result)),
    }
}

/// JSON shape for one matched path.
fn resolution_to_json(path: &str, result: &ResolutionResult<'_>) -> JsonValue {
    json!({
        "path": path,
        "matched": true,
        "rule": result.rule.index,
        "test": result.rule.pattern.source(),
        "steps": result.steps,
        "output": result.output_path,
    })
}

/// Collect input paths, reading from stdin when `-` is passed.
fn collect_input_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    if paths.len() == 1 && paths[0].as_os_str() == "-" {
        return read_paths_from_stdin();
    }
    Ok(paths.to_vec())
}

/// Read paths from stdin, one per line, skipping blanks.
fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let stdin = io::stdin();
    let mut paths = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }
    Ok(paths)
}

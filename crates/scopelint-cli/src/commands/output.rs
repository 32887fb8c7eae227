//! Shared output formatting for lint results.

use anyhow::Result;
use miette::{GraphicalReportHandler, GraphicalTheme};
use scopelint_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Where the source text behind violations can be found.
#[derive(Debug)]
pub enum Sources {
    /// Files on disk; violation paths are relative to this directory.
    Files(PathBuf),
    /// A single text blob read from stdin.
    Stdin(String),
}

impl Sources {
    fn load(&self, file: &Path) -> Option<String> {
        match self {
            Self::Files(base) => std::fs::read_to_string(base.join(file)).ok(),
            Self::Stdin(content) => Some(content.clone()),
        }
    }
}

/// Renders lint results in the specified format.
///
/// # Errors
///
/// Returns an error if JSON serialization or diagnostic rendering fails.
pub fn render(result: &LintResult, format: OutputFormat, sources: &Sources) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(result)?)),
        OutputFormat::Compact => Ok(render_compact(result)),
        OutputFormat::Pretty => {
            let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode());
            render_pretty(result, sources, &handler)
        }
    }
}

fn render_text(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let mut out = String::new();

    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        let _ = writeln!(
            out,
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        let _ = writeln!(out, "  {}: {}", severity_indicator, violation.message);
        if let Some(suggestion) = &violation.suggestion {
            let _ = writeln!(out, "  = help: {}", suggestion.message);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{}", summary_line(errors, warnings, infos, result.files_checked));
    out
}

fn summary_line(errors: usize, warnings: usize, infos: usize, files: usize) -> String {
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    format!(
        "{summary_color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {files} file(s)\x1b[0m"
    )
}

fn render_compact(result: &LintResult) -> String {
    result
        .violations
        .iter()
        .map(|v| format!("{}\n", v.compact()))
        .collect()
}

fn render_pretty(
    result: &LintResult,
    sources: &Sources,
    handler: &GraphicalReportHandler,
) -> Result<String> {
    let mut cache: HashMap<&Path, Option<String>> = HashMap::new();
    let mut out = String::new();

    for violation in &result.violations {
        let file = violation.location.file.as_path();
        let content = cache.entry(file).or_insert_with(|| sources.load(file));

        match content {
            Some(content) => render_diagnostic(violation, content, handler, &mut out)?,
            None => {
                tracing::debug!("No source for {}, using plain output", file.display());
                out.push_str(&violation.format());
            }
        }
    }

    let (errors, warnings, infos) = result.count_by_severity();
    let _ = writeln!(out, "{}", summary_line(errors, warnings, infos, result.files_checked));
    Ok(out)
}

fn render_diagnostic(
    violation: &Violation,
    content: &str,
    handler: &GraphicalReportHandler,
    out: &mut String,
) -> Result<()> {
    let diagnostic = ViolationDiagnostic::new(violation, content);
    handler
        .render_report(out, &diagnostic)
        .map_err(|e| anyhow::anyhow!("Failed to render diagnostic: {e}"))?;
    out.push('\n');
    Ok(())
}

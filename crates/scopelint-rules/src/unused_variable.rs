//! Rule to detect local variables that are assigned but never read.
//!
//! # Detected Patterns
//!
//! Inside a `def` (or `async def`) body:
//!
//! - `name = value` / `name: T = value` where `name` is never referenced
//! - `except E as name:` / `with f() as name:` where `name` is never referenced
//!
//! References anywhere in the function body count, including nested
//! functions and f-string substitutions. Assignments inside nested function
//! or class bodies belong to those scopes and are checked on their own.
//!
//! # Skipped
//!
//! - Names starting with `_`
//! - Names declared `global` or `nonlocal`
//! - Functions that call `locals()`
//! - Tuple unpacking (`a, b = pair`) and augmented assignment

use scopelint_core::syntax::python::{fstring_names, is_fstring, logical_lines, LogicalLine};
use scopelint_core::{FileContext, Language, Rule, Severity, Suggestion, Token, TokenKind, Violation};
use std::collections::HashSet;

/// Rule code for unused-variable.
pub const CODE: &str = "SL103";

/// Rule name for unused-variable.
pub const NAME: &str = "unused-variable";

/// Detects local variables that are assigned and never used.
#[derive(Debug, Clone)]
pub struct UnusedVariable {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for UnusedVariable {
    fn default() -> Self {
        Self::new()
    }
}

impl UnusedVariable {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for UnusedVariable {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Detects local variables that are assigned but never used"
    }

    fn languages(&self) -> &'static [Language] {
        &[Language::Python]
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        let lines = logical_lines(&ctx.tokens);
        let mut violations = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if !is_def(line) {
                continue;
            }
            let body = block_after(&lines, i);

            for target in unused_assignments(body) {
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location_of(&target),
                        format!(
                            "Local variable `{}` is assigned to but never used",
                            target.text
                        ),
                    )
                    .with_suggestion(Suggestion::new(format!(
                        "Remove the assignment, or rename it to `_{}` if it is intentional",
                        target.text
                    ))),
                );
            }
        }

        violations.sort_by_key(|v| (v.location.line, v.location.column));
        violations
    }
}

fn is_def(line: &LogicalLine<'_, '_>) -> bool {
    line.starts_with("def")
        || (line.starts_with("async") && line.tokens.get(1).is_some_and(|t| t.is_ident("def")))
}

/// The logical lines indented under the statement at `header`.
fn block_after<'l, 't, 'a>(
    lines: &'l [LogicalLine<'t, 'a>],
    header: usize,
) -> &'l [LogicalLine<'t, 'a>] {
    let indent = lines[header].indent;
    let start = header + 1;
    let len = lines[start..]
        .iter()
        .take_while(|l| l.indent > indent)
        .count();
    &lines[start..start + len]
}

/// Assignment targets in a function body that are never referenced.
fn unused_assignments<'a>(body: &[LogicalLine<'_, 'a>]) -> Vec<Token<'a>> {
    let mut targets: Vec<Token<'a>> = Vec::new();
    let mut declared_outer: HashSet<&str> = HashSet::new();
    let mut nested_indent: Option<usize> = None;

    for line in body {
        if let Some(indent) = nested_indent {
            if line.indent > indent {
                continue;
            }
            nested_indent = None;
        }
        if line.starts_with("global") || line.starts_with("nonlocal") {
            declared_outer.extend(
                line.tokens[1..]
                    .iter()
                    .filter(|t| t.kind == TokenKind::Ident)
                    .map(|t| t.text),
            );
            continue;
        }
        if is_def(line) || line.starts_with("class") {
            nested_indent = Some(line.indent);
            continue;
        }
        targets.extend(assignment_target(line));
    }

    let calls_locals = body.iter().any(|l| {
        l.tokens
            .windows(2)
            .any(|w| w[0].is_ident("locals") && w[1].is_punct("("))
    });
    if calls_locals {
        return Vec::new();
    }

    let target_offsets: HashSet<usize> = targets.iter().map(|t| t.offset).collect();
    let mut used: HashSet<&str> = HashSet::new();
    for token in body.iter().flat_map(|l| l.tokens.iter()) {
        match token.kind {
            TokenKind::Ident if !target_offsets.contains(&token.offset) => {
                used.insert(token.text);
            }
            TokenKind::Str if is_fstring(token) => used.extend(fstring_names(token)),
            _ => {}
        }
    }

    targets
        .into_iter()
        .filter(|t| !t.text.starts_with('_'))
        .filter(|t| !declared_outer.contains(t.text))
        .filter(|t| !used.contains(t.text))
        .collect()
}

/// The name bound by a simple assignment, annotated assignment, or an
/// `except ... as` / `with ... as` clause.
fn assignment_target<'a>(line: &LogicalLine<'_, 'a>) -> Option<Token<'a>> {
    let tokens = line.tokens;
    let first = *tokens.first()?;

    if line.starts_with("except") || line.starts_with("with") {
        // Only a single `as` binding; tuple targets are skipped.
        let pos = tokens.iter().position(|t| t.is_ident("as"))?;
        let name = *tokens.get(pos + 1)?;
        let closes = tokens.get(pos + 2).is_some_and(|t| t.is_punct(":"));
        return (name.kind == TokenKind::Ident && closes).then_some(name);
    }

    if first.kind != TokenKind::Ident || is_keyword(first.text) {
        return None;
    }
    let second = tokens.get(1)?;
    if second.is_punct("=") {
        return Some(first);
    }
    if second.is_punct(":") {
        // `name: T = value`; a bare annotation binds nothing.
        let has_value = tokens[2..].iter().any(|t| t.is_punct("="));
        return has_value.then_some(first);
    }
    None
}

fn is_keyword(text: &str) -> bool {
    matches!(
        text,
        "if" | "elif"
            | "else"
            | "for"
            | "while"
            | "try"
            | "finally"
            | "return"
            | "yield"
            | "lambda"
            | "assert"
            | "del"
            | "pass"
            | "raise"
            | "import"
            | "from"
            | "match"
            | "case"
    )
}

//! Rule to detect Python imports that are never referenced.
//!
//! # Detected Patterns
//!
//! - `import os` where `os` is never used
//! - `import os.path` where `os` is never used
//! - `import numpy as np` / `from m import x as y` where the alias is never used
//! - `from m import (a, b)` with one entry per unused name
//!
//! A name counts as used when it appears as an identifier anywhere outside
//! the import statements, inside an f-string substitution, or as a string in
//! an `__all__` assignment. Star imports and `from __future__` are ignored.
//!
//! # Configuration
//!
//! - `allowed`: Qualified module names never reported, for imports kept for
//!   their side effects (default: empty)

use scopelint_core::syntax::python::{fstring_names, is_fstring, logical_lines, LogicalLine};
use scopelint_core::{
    FileContext, Language, Rule, RuleConfig, Severity, Suggestion, Token, TokenKind, Violation,
};
use std::collections::HashSet;

/// Rule code for unused-import.
pub const CODE: &str = "SL101";

/// Rule name for unused-import.
pub const NAME: &str = "unused-import";

/// Detects imports whose bound name is never used.
#[derive(Debug, Clone)]
pub struct UnusedImport {
    /// Qualified names that may stay unused.
    pub allowed: Vec<String>,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for UnusedImport {
    fn default() -> Self {
        Self::new()
    }
}

impl UnusedImport {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allowed: Vec::new(),
            severity: Severity::Warning,
        }
    }

    /// Creates the rule with options from a config block.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let rule = Self::new();
        match config {
            Some(c) => rule.allowed(c.get_str_array("allowed")),
            None => rule,
        }
    }

    /// Sets the qualified names that are never reported.
    #[must_use]
    pub fn allowed(mut self, allowed: Vec<String>) -> Self {
        self.allowed = allowed;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// One name bound by an import statement.
#[derive(Debug)]
struct Import<'a> {
    /// Name the import binds in the module namespace.
    binding: &'a str,
    /// Fully qualified name shown in the message.
    qualified: String,
    /// Token the violation points at.
    token: Token<'a>,
}

impl Rule for UnusedImport {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Detects imported modules and names that are never used"
    }

    fn languages(&self) -> &'static [Language] {
        &[Language::Python]
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        let lines = logical_lines(&ctx.tokens);
        let mut imports = Vec::new();
        let mut used: HashSet<&str> = HashSet::new();

        for line in &lines {
            if line.starts_with("import") {
                imports.extend(parse_import(line));
                continue;
            }
            if line.starts_with("from") && has_import_keyword(line) {
                imports.extend(parse_from_import(line));
                continue;
            }
            collect_usages(line, &mut used);
        }

        imports
            .into_iter()
            .filter(|import| !used.contains(import.binding))
            .filter(|import| !self.allowed.iter().any(|a| *a == import.qualified))
            .map(|import| {
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location_of(&import.token),
                    format!("`{}` imported but unused", import.qualified),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Remove the import, or add `{}` to `allowed` if it is needed for side effects",
                    import.qualified
                )))
            })
            .collect()
    }
}

fn has_import_keyword(line: &LogicalLine<'_, '_>) -> bool {
    line.tokens.iter().any(|t| t.is_ident("import"))
}

/// Parses `import a.b as c, d`.
fn parse_import<'a>(line: &LogicalLine<'_, 'a>) -> Vec<Import<'a>> {
    line.tokens[1..]
        .split(|t| t.is_punct(","))
        .filter_map(|clause| {
            let first = *clause.first()?;
            if first.kind != TokenKind::Ident {
                return None;
            }
            let (path, alias) = split_alias(clause);
            let qualified: String = path.iter().map(|t| t.text).collect();
            Some(match alias {
                Some(alias) => Import {
                    binding: alias.text,
                    qualified,
                    token: first,
                },
                None => Import {
                    binding: first.text,
                    qualified,
                    token: first,
                },
            })
        })
        .collect()
}

/// Parses `from m import x, y as z` and the parenthesised form.
fn parse_from_import<'a>(line: &LogicalLine<'_, 'a>) -> Vec<Import<'a>> {
    let Some(split) = line.tokens.iter().position(|t| t.is_ident("import")) else {
        return Vec::new();
    };
    let module: String = line.tokens[1..split].iter().map(|t| t.text).collect();
    if module == "__future__" {
        return Vec::new();
    }

    line.tokens[split + 1..]
        .split(|t| t.is_punct(","))
        .filter_map(|clause| {
            let clause: Vec<Token<'a>> = clause
                .iter()
                .copied()
                .filter(|t| !t.is_punct("(") && !t.is_punct(")"))
                .collect();
            let name = *clause.first()?;
            if name.kind != TokenKind::Ident {
                return None;
            }
            let (_, alias) = split_alias(&clause);
            let qualified = if module.ends_with('.') {
                format!("{module}{}", name.text)
            } else {
                format!("{module}.{}", name.text)
            };
            Some(Import {
                binding: alias.map_or(name.text, |a| a.text),
                qualified,
                token: name,
            })
        })
        .collect()
}

/// Splits `path as alias` into the dotted path tokens and the alias.
fn split_alias<'t, 'a>(clause: &'t [Token<'a>]) -> (&'t [Token<'a>], Option<Token<'a>>) {
    match clause.iter().position(|t| t.is_ident("as")) {
        Some(pos) => (&clause[..pos], clause.get(pos + 1).copied()),
        None => (clause, None),
    }
}

fn collect_usages<'a>(line: &LogicalLine<'_, 'a>, used: &mut HashSet<&'a str>) {
    let exports = line.starts_with("__all__");

    for token in line.tokens {
        match token.kind {
            TokenKind::Ident => {
                used.insert(token.text);
            }
            TokenKind::Str if exports => {
                used.insert(token.text.trim_matches(|c| c == '"' || c == '\''));
            }
            TokenKind::Str if is_fstring(token) => used.extend(fstring_names(token)),
            _ => {}
        }
    }
}

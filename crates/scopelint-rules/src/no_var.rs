//! Rule to forbid `var` declarations.
//!
//! # Rationale
//!
//! `var` bindings are function-scoped and hoisted, so they leak out of the
//! block that declares them and invite accidental shadowing. `let` and
//! `const` are block-scoped.
//!
//! Every `var` keyword that introduces a binding is reported once,
//! regardless of how the binding is used afterwards.
//!
//! # Suppression
//!
//! - `// scopelint: allow(no-var) reason="..."` comment

use scopelint_core::{
    FileContext, Language, Replacement, Rule, Severity, Suggestion, Token, TokenKind, Violation,
};

/// Rule code for no-var.
pub const CODE: &str = "SL001";

/// Rule name for no-var.
pub const NAME: &str = "no-var";

/// Forbids `var` declarations in favour of `let` / `const`.
#[derive(Debug, Clone)]
pub struct NoVar {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoVar {
    fn default() -> Self {
        Self::new()
    }
}

impl NoVar {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoVar {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids function-scoped var declarations; use let or const"
    }

    fn languages(&self) -> &'static [Language] {
        Language::ECMASCRIPT
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        let tokens = &ctx.tokens;

        tokens
            .iter()
            .enumerate()
            .filter(|(i, t)| t.is_ident("var") && introduces_binding(tokens, *i))
            .map(|(_, t)| {
                let location = ctx.location_of(t);
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    location.clone(),
                    "Unexpected var, use let or const instead",
                )
                .with_suggestion(Suggestion::with_fix(
                    "Replace `var` with `let`, or `const` if it is never reassigned",
                    Replacement::new(location, "let"),
                ))
            })
            .collect()
    }
}

/// A `var` keyword declares when it is not a property name and is followed
/// by a binding name or pattern.
fn introduces_binding(tokens: &[Token<'_>], i: usize) -> bool {
    let after_dot = i
        .checked_sub(1)
        .and_then(|p| tokens.get(p))
        .is_some_and(|prev| prev.is_punct(".") || prev.is_punct("?."));
    if after_dot {
        return false;
    }

    tokens.get(i + 1).is_some_and(|next| {
        next.kind == TokenKind::Ident || next.is_punct("{") || next.is_punct("[")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<Violation> {
        let ctx = FileContext::new(Path::new("test.js"), code, Path::new(""), Language::JavaScript);
        NoVar::new().check(&ctx)
    }

    #[test]
    fn test_detects_var() {
        let violations = check_code("var x = 1;");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!(violations[0].location.line, 1);
        assert_eq!(violations[0].location.column, 1);
    }

    #[test]
    fn one_violation_per_declaration_regardless_of_usage() {
        let violations = check_code("var a = 1, b = 2;\na = 3;\nconsole.log(a, b);");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn detects_destructuring_and_loop_heads() {
        let violations = check_code("var {a, b} = o;\nfor (var i = 0; i < 3; i++) {}");
        let lines: Vec<usize> = violations.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn ignores_let_const_and_property_access() {
        let violations = check_code("let x = 1;\nconst y = o.var;\nvariable = 2;\nconst v = obj?.var;");
        assert!(violations.is_empty());
    }

    #[test]
    fn ignores_strings_and_comments() {
        let violations = check_code("// var x = 1;\nconst s = 'var y = 2';\n/* var z */");
        assert!(violations.is_empty());
    }

    #[test]
    fn suggestion_replaces_keyword() {
        let violations = check_code("  var x = 1;");
        let fix = violations[0]
            .suggestion
            .as_ref()
            .and_then(|s| s.replacement.as_ref())
            .unwrap();
        assert_eq!(fix.new_text, "let");
        assert_eq!(fix.location.column, 3);
        assert_eq!(fix.location.length, 3);
    }
}

//! Rule to require strict equality operators.
//!
//! # Rationale
//!
//! `==` and `!=` coerce their operands before comparing, so `1 == "1"` and
//! `0 == ""` are both true. `===` and `!==` compare type and value together.
//!
//! # Configuration
//!
//! - `allow_null`: Allow `== null` / `!= null`, which matches both `null`
//!   and `undefined` (default: false)

use scopelint_core::{
    FileContext, Language, Replacement, Rule, RuleConfig, Severity, Suggestion, TokenKind,
    Violation,
};

/// Rule code for eqeqeq.
pub const CODE: &str = "SL003";

/// Rule name for eqeqeq.
pub const NAME: &str = "eqeqeq";

/// Requires `===` / `!==` instead of `==` / `!=`.
#[derive(Debug, Clone)]
pub struct Eqeqeq {
    /// Allow comparisons against a `null` literal.
    pub allow_null: bool,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for Eqeqeq {
    fn default() -> Self {
        Self::new()
    }
}

impl Eqeqeq {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allow_null: false,
            severity: Severity::Error,
        }
    }

    /// Creates the rule with options from a config block.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let rule = Self::new();
        match config {
            Some(c) => rule.allow_null(c.get_bool("allow_null", false)),
            None => rule,
        }
    }

    /// Sets whether `== null` is allowed.
    #[must_use]
    pub fn allow_null(mut self, allow: bool) -> Self {
        self.allow_null = allow;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for Eqeqeq {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires === and !== instead of coercing == and !="
    }

    fn languages(&self) -> &'static [Language] {
        Language::ECMASCRIPT
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        let tokens = &ctx.tokens;
        let mut violations = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            if token.kind != TokenKind::Punct {
                continue;
            }
            let strict = match token.text {
                "==" => "===",
                "!=" => "!==",
                _ => continue,
            };

            if self.allow_null {
                let prev_null = i
                    .checked_sub(1)
                    .and_then(|p| tokens.get(p))
                    .is_some_and(|t| t.is_ident("null"));
                let next_null = tokens.get(i + 1).is_some_and(|t| t.is_ident("null"));
                if prev_null || next_null {
                    continue;
                }
            }

            let location = ctx.location_of(token);
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    location.clone(),
                    format!("Expected '{strict}' and instead saw '{}'", token.text),
                )
                .with_suggestion(Suggestion::with_fix(
                    format!("Use '{strict}' to compare without type coercion"),
                    Replacement::new(location, strict),
                )),
            );
        }

        violations
    }
}

//! Rule to limit the length of source lines.
//!
//! Length is counted in characters, not bytes. A line whose content is a
//! single unbroken word, such as a long URL in a comment, is never
//! reported since it cannot be wrapped.
//!
//! # Configuration
//!
//! - `max_line_length`: Maximum allowed characters per line (default: 100)

use scopelint_core::{FileContext, Location, Rule, RuleConfig, Severity, Suggestion, Violation};

/// Rule code for line-too-long.
pub const CODE: &str = "SL102";

/// Rule name for line-too-long.
pub const NAME: &str = "line-too-long";

/// Default maximum line length.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 100;

/// Reports lines longer than a configured limit.
#[derive(Debug, Clone)]
pub struct LineTooLong {
    /// Maximum characters per line.
    pub max_line_length: usize,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for LineTooLong {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTooLong {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            severity: Severity::Warning,
        }
    }

    /// Creates the rule with options from a config block.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let rule = Self::new();
        match config {
            Some(c) => {
                let default = i64::try_from(DEFAULT_MAX_LINE_LENGTH).unwrap_or(i64::MAX);
                let max = c.get_int("max_line_length", default);
                rule.max_line_length(usize::try_from(max).unwrap_or(DEFAULT_MAX_LINE_LENGTH))
            }
            None => rule,
        }
    }

    /// Sets the maximum line length.
    #[must_use]
    pub fn max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for LineTooLong {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of characters per line"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext) -> Vec<Violation> {
        let marker = ctx.language.comment_marker();
        let max = self.max_line_length;

        ctx.lines
            .iter()
            .filter(|line| line.width() > max && !is_single_word(line.text, marker))
            .map(|line| {
                let start = ctx.offset_for(line.number, max + 1);
                let end = ctx.offset_for(line.number, line.width() + 1);
                let location = Location::new(ctx.relative_path.clone(), line.number, max + 1)
                    .with_span(start, end.saturating_sub(start));

                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    location,
                    format!("Line too long ({} > {max})", line.width()),
                )
                .with_suggestion(Suggestion::new(format!(
                    "Wrap the line to at most {max} characters"
                )))
            })
            .collect()
    }
}

/// True when the line, minus indentation and a leading comment marker, has
/// no whitespace to break at.
fn is_single_word(text: &str, comment_marker: &str) -> bool {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix(comment_marker)
        .unwrap_or(trimmed)
        .trim_start();
    !body.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopelint_core::{Config, Language};
    use std::path::Path;

    fn check_with(rule: &LineTooLong, language: Language, code: &str) -> Vec<Violation> {
        let path = match language {
            Language::Python => "test.py",
            _ => "test.js",
        };
        let ctx = FileContext::new(Path::new(path), code, Path::new(""), language);
        rule.check(&ctx)
    }

    #[test]
    fn test_detects_long_line() {
        let long = format!("x = \"{}\"", "a b ".repeat(40));
        let code = format!("short = 1\n{long}\n");
        let violations = check_with(&LineTooLong::new(), Language::Python, &code);

        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!(v.location.line, 2);
        assert_eq!(v.location.column, 101);
        assert_eq!(v.message, format!("Line too long ({} > 100)", long.len()));
        assert_eq!(v.location.offset, 10 + 100);
        assert_eq!(v.location.length, long.len() - 100);
    }

    #[test]
    fn exact_limit_is_fine() {
        let code = format!("// {}", "word ".repeat(40))[..100].to_string();
        assert!(check_with(&LineTooLong::new(), Language::JavaScript, &code).is_empty());
    }

    #[test]
    fn counts_characters_not_bytes() {
        let code = format!("s = '{} '", "é".repeat(90));
        assert_eq!(code.chars().count(), 97);
        assert!(check_with(&LineTooLong::new(), Language::Python, &code).is_empty());
    }

    #[test]
    fn single_word_lines_are_skipped() {
        let url = format!("    # https://example.com/{}", "x".repeat(120));
        let token = "y".repeat(150);
        let code = format!("{url}\n{token}\n");
        assert!(check_with(&LineTooLong::new(), Language::Python, &code).is_empty());
    }

    #[test]
    fn applies_to_every_language() {
        let code = format!("const s = \"{}\";", "a b ".repeat(30));
        let rule = LineTooLong::new().max_line_length(80);
        assert_eq!(
            check_with(&rule, Language::JavaScript, &code)[0].message,
            format!("Line too long ({} > 80)", code.len())
        );
        assert_eq!(rule.languages(), Language::ALL);
    }

    #[test]
    fn from_config_reads_limit() {
        let config = Config::parse("[rules.line-too-long]\nmax_line_length = 120").unwrap();
        assert_eq!(
            LineTooLong::from_config(config.rule(NAME)).max_line_length,
            120
        );
        assert_eq!(
            LineTooLong::from_config(None).max_line_length,
            DEFAULT_MAX_LINE_LENGTH
        );
    }
}

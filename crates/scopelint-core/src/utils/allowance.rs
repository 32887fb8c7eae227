//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // scopelint: allow(eqeqeq) reason="comparing against legacy API output"
//! # scopelint: allow(unused-import) reason="re-exported"
//! ```
//!
//! A directive applies to its own line (trailing comment) and to the line
//! directly below it.

use std::collections::HashSet;

const DIRECTIVE: &str = "scopelint:";

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

/// Checks source lines for an allowance comment, returning its reason.
///
/// # Arguments
///
/// * `lines` - Source lines of the file
/// * `line` - Line number to check (1-indexed)
/// * `rule_name` - Name of the rule to check for
///
/// Looks at the line itself and the line before it.
#[must_use]
pub fn check_allow_with_reason(lines: &[&str], line: usize, rule_name: &str) -> AllowCheck {
    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.rules.contains(rule_name) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a line containing a comment.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let at = line.find(DIRECTIVE)?;
    let before = line[..at].trim_end();
    if !(before.ends_with("//") || before.ends_with('#')) {
        return None;
    }

    let directive = line[at + DIRECTIVE.len()..].trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// scopelint: allow(no-var)").unwrap();
        assert!(directive.rules.contains("no-var"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive =
            parse_allow_directive("# scopelint: allow(unused-import) reason=\"re-exported\"")
                .unwrap();
        assert!(directive.rules.contains("unused-import"));
        assert_eq!(directive.reason, Some("re-exported".to_string()));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let directive = parse_allow_directive("// scopelint: allow(no-var, eqeqeq)").unwrap();
        assert!(directive.rules.contains("no-var"));
        assert!(directive.rules.contains("eqeqeq"));
    }

    #[test]
    fn trailing_comment_is_a_directive() {
        let directive =
            parse_allow_directive("if (a == b) {} // scopelint: allow(eqeqeq) reason=\"legacy\"");
        assert!(directive.is_some());
    }

    #[test]
    fn directive_text_in_string_is_ignored() {
        assert!(parse_allow_directive("s = 'scopelint: allow(eqeqeq)'").is_none());
        assert!(parse_allow_directive("// scopelint: allow()").is_none());
    }

    #[test]
    fn directive_covers_next_line_only() {
        let lines = ["function f() {", "  // scopelint: allow(no-var)", "  var x = 1;", "}"];

        assert!(check_allow_with_reason(&lines, 3, "no-var").is_allowed());
        assert_eq!(check_allow_with_reason(&lines, 3, "eqeqeq"), AllowCheck::Denied);
        assert_eq!(check_allow_with_reason(&lines, 4, "no-var"), AllowCheck::Denied);
    }

    #[test]
    fn allow_all_matches_any_rule() {
        let lines = ["x == y // scopelint: allow(all) reason=\"fixture\""];
        let result = check_allow_with_reason(&lines, 1, "eqeqeq");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("fixture"));
    }

    #[test]
    fn test_check_allow_denied() {
        let lines = ["var x = 1;"];
        let result = check_allow_with_reason(&lines, 1, "no-var");
        assert!(!result.is_allowed());
        assert_eq!(result.reason(), None);
    }
}

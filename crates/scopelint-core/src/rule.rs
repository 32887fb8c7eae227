//! Rule trait for defining lint rules.

use crate::context::FileContext;
use crate::language::Language;
use crate::types::{Severity, Violation};

/// A per-file lint rule over the token stream and lines of a source file.
///
/// Rules receive a [`FileContext`] holding the file's lines and tokens.
/// They never fail: input they do not understand simply yields no
/// violations.
///
/// # Example
///
/// ```ignore
/// use scopelint_core::{FileContext, Language, Rule, Violation};
///
/// pub struct NoDebugger;
///
/// impl Rule for NoDebugger {
///     fn name(&self) -> &'static str { "no-debugger" }
///     fn code(&self) -> &'static str { "SL900" }
///     fn languages(&self) -> &'static [Language] { Language::ECMASCRIPT }
///
///     fn check(&self, ctx: &FileContext) -> Vec<Violation> {
///         ctx.tokens
///             .iter()
///             .filter(|t| t.is_ident("debugger"))
///             .map(|t| Violation::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 ctx.location_of(t),
///                 "Unexpected 'debugger' statement",
///             ))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-var").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "SL001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Languages this rule applies to.
    fn languages(&self) -> &'static [Language] {
        Language::ALL
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Returns true if this rule should run on files of `language`.
    fn applies_to(&self, language: Language) -> bool {
        self.languages().contains(&language)
    }

    /// Checks a single file and returns any violations found, in source order.
    fn check(&self, ctx: &FileContext) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

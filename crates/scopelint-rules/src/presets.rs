//! Rule presets and name-based rule selection.

use crate::{
    eqeqeq, line_too_long, no_var, prefer_const, unused_import, unused_variable, Eqeqeq,
    LineTooLong, NoVar, PreferConst, UnusedImport, UnusedVariable,
};
use scopelint_core::{Config, RuleBox};
use std::str::FromStr;
use tracing::warn;

/// Preset configurations for scopelint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every rule with its default options.
    #[default]
    Recommended,
    /// Every rule, with an 80 character line limit.
    Strict,
    /// Only `no-var` and `eqeqeq`, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::Strict => strict_rules(),
            Self::Minimal => minimal_rules(),
        }
    }

    /// Returns the rules for this preset with options read from `config`.
    ///
    /// Options set in a `[rules.<name>]` table win over the preset's own.
    #[must_use]
    pub fn rules_with_config(self, config: &Config) -> Vec<RuleBox> {
        let line_too_long = match (self, config.rule(line_too_long::NAME)) {
            (Self::Strict, None) => LineTooLong::new().max_line_length(80),
            (_, options) => LineTooLong::from_config(options),
        };
        let eqeqeq = Eqeqeq::from_config(config.rule(eqeqeq::NAME));

        match self {
            Self::Minimal => vec![Box::new(NoVar::new()), Box::new(eqeqeq)],
            Self::Recommended | Self::Strict => vec![
                Box::new(NoVar::new()),
                Box::new(PreferConst::new()),
                Box::new(eqeqeq),
                Box::new(UnusedImport::from_config(config.rule(unused_import::NAME))),
                Box::new(line_too_long),
                Box::new(UnusedVariable::new()),
            ],
        }
    }

    /// Name of the preset as written in config files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            other => Err(format!(
                "unknown preset '{other}' (expected recommended, strict or minimal)"
            )),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes, in check order:
/// - `no-var` (SL001)
/// - `prefer-const` (SL002)
/// - `eqeqeq` (SL003)
/// - `unused-import` (SL101)
/// - `line-too-long` (SL102), 100 characters
/// - `unused-variable` (SL103)
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules_with_config(&Config::default())
}

/// Returns the strict set of rules.
///
/// Same rules as recommended with `line-too-long` at 80 characters.
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    Preset::Strict.rules_with_config(&Config::default())
}

/// Returns the minimal set of rules.
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    Preset::Minimal.rules_with_config(&Config::default())
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    recommended_rules()
}

/// Alternative names accepted when selecting rules.
const ALIASES: &[(&str, &str)] = &[
    ("unscoped-declaration", no_var::NAME),
    ("unnecessary-reassignable", prefer_const::NAME),
    ("loose-equality", eqeqeq::NAME),
];

/// Resolves a rule name, code (`SL001`), or alias to the canonical name.
#[must_use]
pub fn resolve_rule_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    let known = [
        (no_var::CODE, no_var::NAME),
        (prefer_const::CODE, prefer_const::NAME),
        (eqeqeq::CODE, eqeqeq::NAME),
        (unused_import::CODE, unused_import::NAME),
        (line_too_long::CODE, line_too_long::NAME),
        (unused_variable::CODE, unused_variable::NAME),
    ];

    known
        .iter()
        .find(|(code, canonical)| code.eq_ignore_ascii_case(name) || *canonical == name)
        .map(|(_, canonical)| *canonical)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == name)
                .map(|(_, canonical)| *canonical)
        })
}

/// Keeps only the rules named in `selection`, preserving check order.
///
/// Unknown names are logged and ignored.
#[must_use]
pub fn select_rules<S: AsRef<str>>(rules: Vec<RuleBox>, selection: &[S]) -> Vec<RuleBox> {
    let wanted: Vec<&str> = selection
        .iter()
        .filter_map(|name| {
            let resolved = resolve_rule_name(name.as_ref());
            if resolved.is_none() {
                warn!(rule = name.as_ref(), "Ignoring unknown rule name");
            }
            resolved
        })
        .collect();

    rules
        .into_iter()
        .filter(|rule| wanted.contains(&rule.name()))
        .collect()
}

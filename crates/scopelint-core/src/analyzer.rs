//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::FileContext;
use crate::language::Language;
use crate::rule::{Rule, RuleBox};
use crate::types::{LintResult, Severity, Suggestion, Violation};
use crate::utils::allowance::check_allow_with_reason;

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Directories that are never worth linting.
const DEFAULT_EXCLUDES: &[&str] = &[
    "**/node_modules/**",
    "**/dist/**",
    "**/.venv/**",
    "**/__pycache__/**",
];

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A source file could not be read (missing, unreadable, or not UTF-8).
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Walking the root directory failed.
    #[error("Failed to walk {root}: {source}")]
    Walk {
        /// Root being walked.
        root: PathBuf,
        /// Underlying walk error.
        source: ignore::Error,
    },

    /// The root path does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Current directory could not be determined.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root to analyze: a directory or a single file.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is not a valid glob or the
    /// current directory cannot be read.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.analyzer.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        if let Some(ref config) = self.config {
            exclude_patterns.extend(config.analyzer.exclude.clone());
        }
        exclude_patterns.extend(DEFAULT_EXCLUDES.iter().map(|p| (*p).to_string()));

        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude_patterns,
            excludes,
            config: self.config.unwrap_or_default(),
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    excludes: Vec<glob::Pattern>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that violation paths are relative to.
    ///
    /// The root itself for a directory, its parent for a single file.
    #[must_use]
    pub fn base(&self) -> &Path {
        if self.root.is_file() {
            self.root.parent().unwrap_or(&self.root)
        } else {
            &self.root
        }
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes every supported file under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing, the walk fails, or any file
    /// cannot be read. No partial result is returned in that case.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let mut result = LintResult::new();
        for (path, language) in &files {
            result.violations.extend(self.analyze_file(path, *language)?);
            result.files_checked += 1;
        }

        sort_violations(&mut result.violations);

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Reads and checks a single file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Read`] if the file cannot be read as UTF-8 text.
    pub fn analyze_file(
        &self,
        path: &Path,
        language: Language,
    ) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {} as {}", path.display(), language);

        let content = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(self.check_source(path, language, &content))
    }

    /// Checks in-memory source text.
    ///
    /// This is the infallible core of the analyzer: every line either
    /// matches a rule or it does not. Violations come back ordered by line,
    /// and by rule registration order within a line.
    #[must_use]
    pub fn check_source(&self, path: &Path, language: Language, content: &str) -> Vec<Violation> {
        let ctx = FileContext::new(path, content, self.base(), language);
        let lines: Vec<&str> = ctx.lines.iter().map(|l| l.text).collect();
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !rule.applies_to(language) {
                continue;
            }
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let found = rule.check(&ctx);
            let found = apply_allowances(rule.as_ref(), &lines, found);
            violations.extend(self.apply_severity_override(rule.name(), found));
        }

        sort_violations(&mut violations);
        violations
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers all supported source files under the root.
    fn discover_files(&self) -> Result<Vec<(PathBuf, Language)>, AnalyzerError> {
        if !self.root.exists() {
            return Err(AnalyzerError::NotFound(self.root.clone()));
        }

        if self.root.is_file() {
            // An explicitly named file is checked even if it would be excluded.
            return Ok(Language::from_path(&self.root)
                .map(|lang| vec![(self.root.clone(), lang)])
                .unwrap_or_default());
        }

        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry.map_err(|source| AnalyzerError::Walk {
                root: self.root.clone(),
                source,
            })?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }
            let Some(language) = Language::from_path(path) else {
                continue;
            };
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push((path.to_path_buf(), language));
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }

    /// Checks if a path should be excluded.
    ///
    /// Patterns match the path relative to the root, so directories above
    /// the root never exclude anything.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();

        if self.excludes.iter().any(|p| p.matches(&path_str)) {
            return true;
        }

        // Also check as substring for patterns like "**/dist/**"
        let anchored = format!("/{}", path_str.trim_start_matches('/'));
        self.exclude_patterns.iter().any(|pattern| {
            let normalized = pattern.replace("**", "");
            normalized.len() > 1 && anchored.contains(&normalized)
        })
    }
}

/// Drops violations covered by an allow directive.
///
/// An allow directive without a reason on a rule that requires one still
/// suppresses the violation, but yields a warning about the missing reason.
fn apply_allowances(rule: &dyn Rule, lines: &[&str], violations: Vec<Violation>) -> Vec<Violation> {
    let mut kept = Vec::with_capacity(violations.len());

    for violation in violations {
        let allow = check_allow_with_reason(lines, violation.location.line, rule.name());
        if !allow.is_allowed() {
            kept.push(violation);
            continue;
        }

        if rule.requires_allow_reason() && allow.reason().is_none() {
            let name = rule.name();
            kept.push(
                Violation::new(
                    rule.code(),
                    name,
                    Severity::Warning,
                    violation.location,
                    format!("Allow directive for '{name}' is missing required reason"),
                )
                .with_suggestion(Suggestion::new(
                    "Add reason=\"...\" to explain why this exception is necessary",
                )),
            );
        }
    }

    kept
}

/// Orders by file, then line. The sort is stable so violations on the same
/// line keep rule registration order.
fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
    });
}

//! Check command implementation.

use anyhow::{Context, Result};
use scopelint_core::{Analyzer, Config, Language, LintResult, Severity};
use scopelint_rules::{select_rules, Preset};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::output::{self, Sources};
use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Path used in violations for source read from stdin.
pub const STDIN_NAME: &str = "<stdin>";

/// Arguments of the check command.
#[derive(Debug)]
pub struct CheckArgs {
    /// File or directory to analyze, or `-` for stdin.
    pub path: PathBuf,
    /// Output format.
    pub format: OutputFormat,
    /// Rule names, codes or aliases to run; empty runs the whole preset.
    pub rules: Vec<String>,
    /// Extra exclude globs.
    pub exclude: Vec<String>,
    /// Preset overriding the config file's.
    pub preset: Option<Preset>,
    /// Language of stdin input.
    pub language: Language,
    /// Failure threshold overriding the config file's.
    pub fail_on: Option<Severity>,
}

impl CheckArgs {
    fn reads_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

/// Directory searched for a project config file.
#[must_use]
pub fn project_dir(path: &Path) -> PathBuf {
    if path.as_os_str() == "-" {
        PathBuf::from(".")
    } else if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    } else {
        path.to_path_buf()
    }
}

/// Runs the check command.
///
/// Returns exit code 1 when any violation reaches the failure threshold.
pub fn run(args: &CheckArgs, source: &ConfigSource) -> Result<ExitCode> {
    let config = load_config(source)?;
    let (result, sources) = lint(args, config.clone())?;

    let rendered = output::render(&result, args.format, &sources)?;
    print!("{rendered}");

    let threshold = match args.fail_on {
        Some(severity) => severity,
        None => config.fail_on_severity().context("Invalid config")?,
    };

    if result.has_violations_at(threshold) {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Builds the analyzer for `args` and runs it over the path or stdin.
pub fn lint(args: &CheckArgs, config: Config) -> Result<(LintResult, Sources)> {
    let preset = match (args.preset, config.preset.as_deref()) {
        (Some(preset), _) => preset,
        (None, Some(name)) => name
            .parse::<Preset>()
            .map_err(anyhow::Error::msg)
            .context("Invalid preset in config")?,
        (None, None) => Preset::default(),
    };

    let mut rules = preset.rules_with_config(&config);
    if !args.rules.is_empty() {
        rules = select_rules(rules, &args.rules);
    }

    // Without an explicit path the config's `[analyzer] root` applies.
    let mut builder = Analyzer::builder().config(config);
    if !args.reads_stdin() && args.path.as_os_str() != "." {
        builder = builder.root(&args.path);
    }
    for pattern in &args.exclude {
        builder = builder.exclude(pattern.as_str());
    }
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} as {} with {} rules",
        args.path.display(),
        preset.as_str(),
        analyzer.rule_count()
    );

    if args.reads_stdin() {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        let result = check_text(&analyzer, args.language, &content);
        return Ok((result, Sources::Stdin(content)));
    }

    let result = analyzer.analyze().context("Analysis failed")?;
    Ok((result, Sources::Files(analyzer.base().to_path_buf())))
}

/// Checks a text blob as one file named [`STDIN_NAME`].
#[must_use]
pub fn check_text(analyzer: &Analyzer, language: Language, content: &str) -> LintResult {
    let mut result = LintResult::new();
    result.violations = analyzer.check_source(Path::new(STDIN_NAME), language, content);
    result.files_checked = 1;
    result
}

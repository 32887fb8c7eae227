//! scopelint CLI tool.
//!
//! Usage:
//! ```bash
//! scopelint check [OPTIONS] [PATH]
//! scopelint check --language typescript -   # read source from stdin
//! scopelint list-rules
//! scopelint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use scopelint_core::{Language, Severity};
use scopelint_rules::Preset;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Exit status when the run itself failed (unreadable input, bad config).
const EXIT_FAILURE: u8 = 2;

/// Declaration-scope and style linter for JavaScript, TypeScript and Python
#[derive(Parser)]
#[command(name = "scopelint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check {
        /// File or directory to analyze, or `-` to read from stdin
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules, by name, code or alias (comma-separated)
        #[arg(long, env = "SCOPELINT_RULES", value_delimiter = ',')]
        rules: Vec<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Rule preset: recommended, strict or minimal
        #[arg(long)]
        preset: Option<Preset>,

        /// Language of stdin input
        #[arg(long, default_value = "javascript")]
        language: Language,

        /// Lowest severity that makes the run fail: info, warning or error
        #[arg(long)]
        fail_on: Option<Severity>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Graphical diagnostics with source snippets.
    Pretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
            preset,
            language,
            fail_on,
        } => {
            let project_dir = commands::check::project_dir(&path);
            let source = config_resolver::resolve(&project_dir, cli.config.as_deref());
            let args = commands::check::CheckArgs {
                path,
                format,
                rules,
                exclude,
                preset,
                language,
                fail_on,
            };
            commands::check::run(&args, &source)
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force } => {
            commands::init::run(force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

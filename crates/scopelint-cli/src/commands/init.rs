//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// File name written by `scopelint init`.
pub const CONFIG_FILE_NAME: &str = "scopelint.toml";

const DEFAULT_CONFIG: &str = r#"# scopelint configuration

# Rule preset: "recommended" (default), "strict" or "minimal"
preset = "recommended"

# Lowest severity that makes `scopelint check` exit with status 1
# fail_on = "warning"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/coverage/**",
    "**/*.min.js",
]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.no-var]
enabled = true

[rules.prefer-const]
enabled = true
# severity = "warning"  # Override default severity

[rules.eqeqeq]
enabled = true
allow_null = false

[rules.unused-import]
enabled = true
# Imports kept for their side effects
allowed = []

[rules.line-too-long]
max_line_length = 100

# [rules.unused-variable]
# enabled = false
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    let config_path = write_config(Path::new("."), force)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to configure rules");
    println!("  2. Run: scopelint check");

    Ok(())
}

/// Writes the default configuration into `dir`.
fn write_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopelint_core::{Config, Severity};
    use tempfile::TempDir;

    #[test]
    fn template_is_a_valid_config() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(config.fail_on_severity().unwrap(), Severity::Warning);
        assert!(config.analyzer.respect_gitignore);
        assert_eq!(
            config.rule("line-too-long").map(|r| r.get_int("max_line_length", 0)),
            Some(100)
        );
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "# mine").unwrap();

        assert!(write_config(tmp.path(), false).is_err());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join(CONFIG_FILE_NAME)).unwrap(),
            "# mine"
        );

        let path = write_config(tmp.path(), true).unwrap();
        assert!(std::fs::read_to_string(path)
            .unwrap()
            .contains("[rules.eqeqeq]"));
    }
}

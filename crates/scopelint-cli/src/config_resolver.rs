//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path in this order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `scopelint.toml` or `.scopelint.toml` in the project directory or the
//!    nearest ancestor that has one
//! 3. `$SCOPELINT_CONFIG_DIR/config.toml` or `~/.scopelint/config.toml`
//! 4. No config found → defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory or one of its ancestors.
    Project(PathBuf),
    /// Loaded from the global config directory.
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Project-level config file names, checked in order within each directory.
const PROJECT_CONFIG_NAMES: &[&str] = &["scopelint.toml", ".scopelint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file for a lint run rooted at `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let global_dir = global_config_dir(std::env::var_os("SCOPELINT_CONFIG_DIR"), home::home_dir());
    resolve_with(project_dir, explicit, global_dir.as_deref())
}

fn resolve_with(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(p) = explicit {
        // Trusted as-is; a missing file is reported when it is loaded.
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_project_config(project_dir) {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, |candidate| {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        })
}

/// Nearest config file in `start` or its ancestors.
fn find_project_config(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// The global config directory: the override if set, else `~/.scopelint`.
fn global_config_dir(override_dir: Option<std::ffi::OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    match override_dir {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home.map(|h| h.join(".scopelint")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_takes_priority_over_project() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();
        fs::write(tmp.path().join("scopelint.toml"), "").unwrap();

        let result = resolve_with(tmp.path(), Some(&explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn explicit_does_not_check_existence() {
        let result = resolve_with(Path::new("/tmp"), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".scopelint.toml"), "").unwrap();
        let dir = tmp.path().canonicalize().unwrap();

        assert_eq!(
            resolve_with(tmp.path(), None, None),
            ConfigSource::Project(dir.join(".scopelint.toml"))
        );

        fs::write(tmp.path().join("scopelint.toml"), "").unwrap();
        assert_eq!(
            resolve_with(tmp.path(), None, None),
            ConfigSource::Project(dir.join("scopelint.toml"))
        );
    }

    #[test]
    fn nearest_ancestor_config_is_used() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("packages/web/src");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("scopelint.toml"), "").unwrap();
        fs::write(tmp.path().join("packages/web/scopelint.toml"), "").unwrap();

        let result = resolve_with(&nested, None, None);
        let expected = tmp.path().canonicalize().unwrap().join("packages/web/scopelint.toml");
        assert_eq!(result, ConfigSource::Project(expected));
    }

    #[test]
    fn global_fallback_when_no_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_with(project.path(), None, Some(global.path()));
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );
        assert!(result.is_global());
    }

    #[test]
    fn global_skipped_when_project_config_exists() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("scopelint.toml"), "").unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_with(project.path(), None, Some(global.path()));
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn no_config_anywhere_returns_default() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_with(project.path(), None, Some(global.path()));
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
    }

    #[test]
    fn global_dir_prefers_override() {
        let home = Some(PathBuf::from("/home/dev"));
        assert_eq!(
            global_config_dir(Some("/etc/scopelint".into()), home.clone()),
            Some(PathBuf::from("/etc/scopelint"))
        );
        assert_eq!(
            global_config_dir(Some("".into()), home.clone()),
            Some(PathBuf::from("/home/dev/.scopelint"))
        );
        assert_eq!(global_config_dir(None, None), None);
    }
}

//! Configuration file resolution with monorepo-root and global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `share-lint.toml` or `.share-lint.toml` in the checked directory or
//!    the nearest ancestor that has one
//! 3. `~/.share-lint/config.toml` (global fallback)
//! 4. No config found → defaults

use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the checked directory or one of its ancestors.
    Project(PathBuf),
    /// Loaded from the global config directory (`~/.share-lint/`).
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

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["share-lint.toml", ".share-lint.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file for checking `target`.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    let start = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| target.to_path_buf(), |cwd| cwd.join(target))
    };
    let start = if start.is_file() {
        start.parent().map_or_else(|| start.clone(), Path::to_path_buf)
    } else {
        start
    };

    resolve_inner(&start, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    // 1. Explicit path from --config flag
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    // 2. Project-level config, nearest directory first
    for dir in project_dir.ancestors() {
        for name in PROJECT_CONFIG_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                tracing::debug!("Found project config: {}", candidate.display());
                return ConfigSource::Project(candidate);
            }
        }
    }

    // 3. Global fallback
    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// Returns the global config directory path.
///
/// Resolution: `$SHARE_LINT_CONFIG_DIR` > `~/.share-lint/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("SHARE_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".share-lint"))
}

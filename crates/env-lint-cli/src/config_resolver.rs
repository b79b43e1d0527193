//! Configuration file resolution with global fallback.
//!
//! The first match wins:
//!
//! 1. `--config` flag (explicit path, trusted as given)
//! 2. `env-lint.toml` or `.env-lint.toml` in the package root of the checked
//!    path (nearest ancestor with a `package.json`, else the path itself)
//! 3. `~/.env-lint/config.toml`, or `$ENV_LINT_CONFIG_DIR/config.toml`
//! 4. built-in defaults

use std::path::{Path, PathBuf};

use env_lint_core::{Config, ConfigError};

use crate::project_root::find_package_root;

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the package root.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
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

    /// Reads the configuration this source points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match self.path() {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                Config::from_file(path)
            }
            None => Ok(Config::default()),
        }
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["env-lint.toml", ".env-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration for a check of `target`.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    let project_dir = find_package_root(target).unwrap_or_else(|| target.to_path_buf());
    resolve_in(&project_dir, explicit, global_config_dir())
}

/// Resolution with the project and global directories given; keeps tests
/// independent of `$HOME` and the environment.
fn resolve_in(project_dir: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

/// Returns the global config directory: `$ENV_LINT_CONFIG_DIR`, else
/// `~/.env-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("ENV_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".env-lint"))
}

//! Locating the `.cdematch.toml` files that apply to a working directory.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::{ConfigError, parse::is_root_config};

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".cdematch.toml";

/// Config files that apply to one working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    /// Project files, closest to the working directory first. The last one may carry
    /// `root = true`.
    pub project: Vec<PathBuf>,
    /// `~/.cdematch.toml`, when it exists and no project file set `root = true`.
    pub global: Option<PathBuf>,
}

impl ConfigSources {
    /// Finds the config files for `cwd`.
    ///
    /// Every ancestor of `cwd` is checked for a `.cdematch.toml`, stopping at the first
    /// file with `root = true`. The global file is consulted only if no root was hit.
    pub fn discover(cwd: &Path) -> Self {
        let global = global_config_path().ok();
        Self::discover_with_global(cwd, global.as_deref())
    }

    /// Like [`Self::discover`], with an explicit global file location.
    pub fn discover_with_global(cwd: &Path, global: Option<&Path>) -> Self {
        let mut project = Vec::new();
        let mut rooted = false;
        for candidate in cwd.ancestors().map(|dir| dir.join(CONFIG_FILENAME)) {
            if !candidate.is_file() {
                continue;
            }
            rooted = is_root_config(&candidate);
            project.push(candidate);
            if rooted {
                break;
            }
        }

        // A home directory inside the project tree is already in `project`.
        let global = global
            .filter(|g| !rooted && g.is_file() && !project.iter().any(|p| p == g))
            .map(Path::to_path_buf);

        Self { project, global }
    }

    /// Returns every file in precedence order: closest first, global last.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.project
            .iter()
            .chain(self.global.iter())
            .map(PathBuf::as_path)
    }

    /// Returns true if no config file applies.
    pub fn is_empty(&self) -> bool {
        self.project.is_empty() && self.global.is_none()
    }
}

/// Returns the location of the global config file, whether or not it exists.
pub fn global_config_path() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(CONFIG_FILENAME))
}

/// Returns the current user's home directory.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}

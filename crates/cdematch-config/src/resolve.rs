//! Path resolution for corpus locations.
//!
//! Resolves relative and tilde-prefixed corpus paths to absolute paths.

use std::path::{Path, PathBuf};

use crate::{ConfigError, sources::home_dir};

/// Resolves a corpus path.
///
/// Handles three cases:
/// - Tilde paths (`~/data/q.jsonl`) - expanded to home directory
/// - Relative paths (`./q.jsonl`, `../shared/q.jsonl`) - resolved relative to `config_dir`
/// - Absolute paths - returned as-is
///
/// The file is not required to exist; [`crate::Config::validate`] reports missing corpora.
pub fn resolve_corpus_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(config_dir.join(expanded))
    }
}

/// Expands a tilde prefix to the home directory.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }

    if let Some(rest) = path.strip_prefix("~/") {
        let home = home_dir()?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use directories::BaseDirs;

    #[test]
    fn test_relative_path_joins_config_dir() {
        let resolved = resolve_corpus_path("./q.jsonl", Path::new("/cfg")).unwrap();
        assert_eq!(resolved, PathBuf::from("/cfg/./q.jsonl"));
    }

    #[test]
    fn test_absolute_path_unchanged() {
        let resolved = resolve_corpus_path("/data/q.jsonl", Path::new("/cfg")).unwrap();
        assert_eq!(resolved, PathBuf::from("/data/q.jsonl"));
    }

    #[test]
    fn test_tilde_expands_to_home() {
        let Some(dirs) = BaseDirs::new() else {
            return;
        };
        let resolved = resolve_corpus_path("~/q.jsonl", Path::new("/cfg")).unwrap();
        assert_eq!(resolved, dirs.home_dir().join("q.jsonl"));
    }
}

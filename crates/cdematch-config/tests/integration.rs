//! Integration tests for cdematch-config.
//!
//! Tests the full configuration loading pipeline: sources -> parse -> resolve -> merge.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::fs;

use cdematch_config::{
    Config, ConfigError, ConfigSources, ConfigWarning, RarityTransform, StopwordPreset,
};
use tempfile::TempDir;

/// Writes each `(relative path, contents)` pair under a fresh temporary directory.
fn tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, contents) in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
    }
    dir
}

#[test]
fn test_load_from_no_files_returns_default() {
    let config = Config::load_from_files(&[]).unwrap();

    assert!(config.corpus.path.is_none());
    assert!(config.config_root.is_none());
    assert_eq!(config.matching.limit, 10);
    assert_eq!(config.tags.stopwords, StopwordPreset::Default);
}

#[test]
fn test_load_nested_configs_with_root() {
    let dir = tree(&[
        (
            ".cdematch.toml",
            r#"
root = true

[corpus]
path = "corpus/questions.jsonl"

[match]
limit = 40
rarity = "tangent"

[tags]
exclude = ["patient"]
"#,
        ),
        (
            "study/.cdematch.toml",
            r#"
[match]
limit = 5

[tags]
exclude = "participant"
"#,
        ),
        ("corpus/questions.jsonl", ""),
    ]);

    let config = Config::load(&dir.path().join("study")).unwrap();

    assert_eq!(config.matching.limit, 5);
    assert_eq!(config.matching.rarity, RarityTransform::Tangent);
    assert_eq!(config.tags.exclude, vec!["participant", "patient"]);
    assert_eq!(
        config.corpus.path,
        Some(dir.path().join("corpus/questions.jsonl"))
    );
    assert_eq!(config.config_root, Some(dir.path().join("study")));
    assert!(config.validate().is_empty());
}

#[test]
fn test_global_file_has_lowest_precedence() {
    let dir = tree(&[
        (
            "home/.cdematch.toml",
            "[match]\nlimit = 3\nrarity = \"tangent\"\n",
        ),
        ("study/.cdematch.toml", "[match]\nlimit = 7\n"),
    ]);
    let global = dir.path().join("home/.cdematch.toml");

    let sources = ConfigSources::discover_with_global(&dir.path().join("study"), Some(&global));
    let config = Config::load_sources(&sources).unwrap();

    assert_eq!(config.matching.limit, 7);
    assert_eq!(config.matching.rarity, RarityTransform::Tangent);
    assert_eq!(config.config_root, Some(dir.path().join("study")));
}

#[test]
fn test_missing_corpus_is_a_warning_not_an_error() {
    let dir = tree(&[(
        ".cdematch.toml",
        "root = true\n[corpus]\npath = \"nowhere.jsonl\"\n",
    )]);

    let config = Config::load(dir.path()).unwrap();
    let warnings = config.validate();

    assert!(matches!(
        warnings[..],
        [ConfigWarning::CorpusPathMissing { .. }]
    ));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let dir = tree(&[(".cdematch.toml", "root = true\n[match\n")]);

    let err = Config::load_from_files(&[dir.path().join(".cdematch.toml")]).unwrap_err();
    assert!(matches!(err, ConfigError::ParseToml { .. }));
}

#[test]
fn test_unreadable_file_is_read_error() {
    let dir = tree(&[]);
    let err = Config::load_from_files(&[dir.path().join("absent.toml")]).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_effective_settings_round_trip() {
    let dir = tree(&[(
        ".cdematch.toml",
        "root = true\n[tags]\nstopwords = \"iso\"\n[index]\nmax_age_secs = 90\n",
    )]);

    let config = Config::load(dir.path()).unwrap();
    let rendered = config.settings_to_toml().unwrap();

    assert!(rendered.contains("stopwords = \"iso\""));
    assert!(rendered.contains("max_age_secs = 90"));
}

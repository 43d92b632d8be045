//! CLI integration tests for cdematch commands.
//!
//! These tests focus on exit codes and basic behavioral verification,
//! not specific output formatting which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a cdematch command.
fn cdematch() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("cdematch").unwrap()
}

/// Helper to run `cdematch` with HOME isolated to the provided directory.
fn cdematch_with_home(home: &Path) -> Command {
    let mut cmd = cdematch();
    cmd.env("HOME", home);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// The three-document corpus used throughout the matching tests.
const CORPUS: &str = r#"{"_id": "question:A", "question": "Pain scale 0 to 10", "tags": ["pain", "scale", "0 to 10"], "source": "cadsr"}
{"_id": "question:B", "question": "Pain intensity", "tags": ["pain", "intensity"], "source": "cadsr"}
{"_id": "question:C", "question": "Scale weight", "tags": ["scale", "weight"], "source": "loinc"}
"#;

/// Creates a directory with a corpus file and a config pointing at it.
fn setup_corpus_dir() -> tempfile::TempDir {
    let dir = temp_dir();
    fs::write(dir.path().join("questions.jsonl"), CORPUS).unwrap();
    fs::write(
        dir.path().join(".cdematch.toml"),
        "root = true\n\n[corpus]\npath = \"questions.jsonl\"\n",
    )
    .unwrap();
    dir
}

/// Parses stdout as JSON.
fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let home = temp_dir();
        let dir = temp_dir();

        cdematch_with_home(home.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join(".cdematch.toml")).unwrap();
        assert!(contents.contains("# [corpus]"));
        assert!(!home.path().join(".cdematch.toml").exists());
    }

    #[test]
    fn global_flag_writes_home_config() {
        let home = temp_dir();
        let dir = temp_dir();

        cdematch_with_home(home.path())
            .current_dir(dir.path())
            .args(["init", "--global"])
            .assert()
            .success();

        let contents = fs::read_to_string(home.path().join(".cdematch.toml")).unwrap();
        assert!(contents.contains("# [match]"));
        assert!(!dir.path().join(".cdematch.toml").exists());
    }

    #[test]
    fn corpus_flag_writes_live_corpus_path() {
        let home = temp_dir();
        let dir = temp_dir();
        fs::write(dir.path().join("questions.jsonl"), CORPUS).unwrap();

        cdematch_with_home(home.path())
            .current_dir(dir.path())
            .args(["init", "--corpus", "questions.jsonl"])
            .assert()
            .success();

        cdematch_with_home(home.path())
            .current_dir(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("[ok]"));

        cdematch_with_home(home.path())
            .current_dir(dir.path())
            .args(["index", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"documents\": 3"));
    }

    #[test]
    fn corpus_flag_conflicts_with_global() {
        let home = temp_dir();

        cdematch_with_home(home.path())
            .current_dir(home.path())
            .args(["init", "--global", "--corpus", "q.jsonl"])
            .assert()
            .failure();
        assert!(!home.path().join(".cdematch.toml").exists());
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join(".cdematch.toml"), "existing").unwrap();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn force_overwrites_invalid_config() {
        let dir = temp_dir();
        fs::write(dir.path().join(".cdematch.toml"), "not [valid toml").unwrap();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();
    }
}

mod config {
    use super::*;

    #[test]
    fn prints_effective_settings() {
        let dir = setup_corpus_dir();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("[match]"))
            .stdout(predicate::str::contains("rarity = \"linear\""));
    }

    #[test]
    fn invalid_config_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join(".cdematch.toml"), "[match\nlimit = 3").unwrap();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load configuration"));
    }
}

mod check {
    use super::*;

    #[test]
    fn no_config_is_ok() {
        let dir = temp_dir();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No configuration files found"));
    }

    #[test]
    fn valid_config_has_no_issues() {
        let dir = setup_corpus_dir();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No issues found"));
    }

    #[test]
    fn missing_corpus_is_a_warning() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".cdematch.toml"),
            "[corpus]\npath = \"missing.jsonl\"\n",
        )
        .unwrap();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .arg("check")
            .assert()
            .failure()
            .stdout(predicate::str::contains("corpus path does not exist"));
    }
}

mod tags {
    use super::*;

    #[test]
    fn prints_sorted_tags() {
        let dir = temp_dir();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["tags", "Rate your pain on a scale of 0 to 10"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "0\n0 to 10\n10\non a\npain\nrate\nscale\n",
            ));
    }

    #[test]
    fn json_output() {
        let dir = temp_dir();

        let output = cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["tags", "--json", "Body", "weight"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output.stdout);
        assert_eq!(json["text"], "Body weight");
        assert_eq!(json["tags"], serde_json::json!(["body", "weight"]));
    }

    #[test]
    fn configured_exclusions_apply() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(".cdematch.toml"),
            "[tags]\nexclude = \"body\"\n\n[tags.abbreviations]\nwt = \"weight\"\n",
        )
        .unwrap();

        let output = cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["tags", "--json", "Body wt"])
            .output()
            .unwrap();
        let json = stdout_json(&output.stdout);
        assert_eq!(json["tags"], serde_json::json!(["weight"]));
    }
}

mod index {
    use super::*;

    #[test]
    fn summarizes_corpus() {
        let dir = setup_corpus_dir();

        let output = cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["index", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output.stdout);
        assert_eq!(json["documents"], 3);
        assert_eq!(json["tags"], 5);
        assert_eq!(json["min_frequency"], 1);
        assert_eq!(json["max_frequency"], 2);
        assert_eq!(json["most_common"][0]["tag"], "pain");
    }

    #[test]
    fn partition_limits_documents() {
        let dir = setup_corpus_dir();

        let output = cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["index", "--json", "--partition", "loinc"])
            .output()
            .unwrap();
        let json = stdout_json(&output.stdout);
        assert_eq!(json["documents"], 1);
        assert_eq!(json["partition"], "loinc");
    }

    #[test]
    fn no_corpus_fails() {
        let dir = temp_dir();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .arg("index")
            .assert()
            .failure()
            .stderr(predicate::str::contains("no corpus configured"));
    }

    #[test]
    fn missing_corpus_file_fails() {
        let dir = temp_dir();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["index", "--corpus", "nope.jsonl"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("corpus unavailable"));
    }
}

mod matching {
    use super::*;

    #[test]
    fn ranks_rare_overlap_first() {
        let dir = setup_corpus_dir();

        let output = cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["match", "--json", "Rate your pain on a scale of 0 to 10"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output.stdout);
        let matches = json["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0]["id"], "A");
        assert_eq!(matches[0]["score"], 1.0);
        assert_eq!(matches[1]["score"], 0.0);
        assert_eq!(matches[2]["score"], 0.0);
    }

    #[test]
    fn limit_and_min_score() {
        let dir = setup_corpus_dir();

        let output = cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args([
                "match",
                "--json",
                "--min-score",
                "0.5",
                "-n",
                "5",
                "Rate your pain on a scale of 0 to 10",
            ])
            .output()
            .unwrap();
        let json = stdout_json(&output.stdout);
        assert_eq!(json["matches"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn symbol_only_query_has_no_matches() {
        let dir = setup_corpus_dir();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["match", "!!!"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No tags extracted"));
    }

    #[test]
    fn table_output_strips_storage_prefix() {
        let dir = setup_corpus_dir();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["match", "pain scale 0 to 10"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Pain scale 0 to 10"))
            .stdout(predicate::str::contains("question:A").not());
    }

    #[test]
    fn malformed_corpus_is_an_error() {
        let dir = setup_corpus_dir();
        fs::write(dir.path().join("questions.jsonl"), "{broken\n").unwrap();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["match", "pain scale"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("malformed document"));
    }
}

mod crf {
    use super::*;

    const FORM: &str = r#"{
        "designations": [{"designation": "Pain Form"}],
        "formElements": [
            {"label": "Rate your pain on a scale of 0 to 10"},
            {"label": "!!!"}
        ]
    }"#;

    #[test]
    fn matches_every_form_element() {
        let dir = setup_corpus_dir();
        fs::create_dir_all(dir.path().join("forms/nested")).unwrap();
        fs::write(dir.path().join("forms/nested/pain.json"), FORM).unwrap();
        fs::write(dir.path().join("forms/readme.txt"), "ignored").unwrap();

        let output = cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["crf", "--json", "forms"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = stdout_json(&output.stdout);
        assert_eq!(json["total_elements"], 2);
        assert_eq!(json["skipped_files"], 0);
        let form = &json["forms"][0];
        assert_eq!(form["form"], "Pain Form");
        assert_eq!(form["elements"][0]["matches"][0]["id"], "A");
        assert!(form["elements"][1]["matches"].as_array().unwrap().is_empty());
    }

    #[test]
    fn skips_unreadable_forms() {
        let dir = setup_corpus_dir();
        fs::create_dir_all(dir.path().join("forms")).unwrap();
        fs::write(dir.path().join("forms/bad.json"), "not json").unwrap();
        fs::write(dir.path().join("forms/good.json"), FORM).unwrap();

        let output = cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["crf", "--json", "forms"])
            .output()
            .unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("skipping"));

        let json = stdout_json(&output.stdout);
        assert_eq!(json["skipped_files"], 1);
        assert_eq!(json["forms"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn missing_directory_fails() {
        let dir = setup_corpus_dir();

        cdematch_with_home(dir.path())
            .current_dir(dir.path())
            .args(["crf", "nowhere"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not a directory"));
    }
}

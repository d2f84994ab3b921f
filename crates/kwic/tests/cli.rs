//! Integration tests for the kwic CLI.

// Binary integration tests have no enclosing cfg(test) module.
#![allow(clippy::tests_outside_test_module)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Keywords used by most tests: a plain word and a fuzzy one.
const KEYWORDS: &str = r#"
[[keyword]]
word = "fox"
category = "animal"

[[keyword]]
word = "color"
category = "style"
fuzzy_match = true
fuzzy_threshold = 0.8
"#;

fn temp_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn kwic() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("kwic").unwrap()
}

/// A directory holding the standard keywords file and two documents with
/// four matches between them: fox twice in b, fox once and "colour" once
/// in a.
fn corpus() -> TempDir {
    let dir = temp_dir();
    fs::write(dir.path().join("keywords.toml"), KEYWORDS).unwrap();
    fs::write(
        dir.path().join("a.txt"),
        "The quick brown fox jumps over the lazy dog. A colour sample.",
    )
    .unwrap();
    fs::write(dir.path().join("b.md"), "A fox met another fox near the den").unwrap();
    dir
}

mod analyze {
    use super::*;

    #[test]
    fn counts_matches_per_document_and_keyword() {
        let dir = corpus();
        kwic()
            .current_dir(dir.path())
            .args(["analyze", "."])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("2 documents, 2 keywords, 4 matches")
                    .and(predicate::str::contains("animal"))
                    .and(predicate::str::contains("fox")),
            );
    }

    #[test]
    fn json_report_is_parseable() {
        let dir = corpus();
        let output = kwic()
            .current_dir(dir.path())
            .args(["analyze", ".", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(v["complete"], true);
        assert_eq!(v["keywords"].as_array().unwrap().len(), 2);

        let documents = v["documents"].as_array().unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0]["document_name"], "a");

        // Results are keyed by the 16 digit hex configuration ids.
        for key in documents[0]["keywords"].as_object().unwrap().keys() {
            assert_eq!(key.len(), 16);
            assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        }

        let total: u64 = documents
            .iter()
            .flat_map(|doc| doc["keywords"].as_object().unwrap().values())
            .map(|result| result["count"].as_u64().unwrap())
            .sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn matches_flag_prints_context_lines() {
        let dir = corpus();
        kwic()
            .current_dir(dir.path())
            .args(["analyze", "a.txt", "--matches"])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("The quick brown [fox] jumps over the lazy dog.")
                    .and(predicate::str::contains("[colour]")),
            );
    }

    #[test]
    fn sequential_and_parallel_agree() {
        let dir = corpus();
        let parallel = kwic()
            .current_dir(dir.path())
            .args(["analyze", ".", "--json"])
            .output()
            .unwrap();
        let sequential = kwic()
            .current_dir(dir.path())
            .args(["analyze", ".", "--json", "--sequential"])
            .output()
            .unwrap();
        assert!(parallel.status.success());
        assert!(sequential.status.success());
        assert_eq!(parallel.stdout, sequential.stdout);
    }

    #[test]
    fn missing_keywords_file_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join("a.txt"), "some text").unwrap();
        kwic()
            .current_dir(dir.path())
            .args(["analyze", "a.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read keywords file"));
    }

    #[test]
    fn empty_keyword_set_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join("keywords.toml"), "[settings]\nnormalize = true\n").unwrap();
        fs::write(dir.path().join("a.txt"), "some text").unwrap();
        kwic()
            .current_dir(dir.path())
            .args(["analyze", "a.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no keywords defined"));
    }

    #[test]
    fn dropped_entries_warn_but_run() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("keywords.toml"),
            "[[keyword]]\nword = \"\"\n\n[[keyword]]\nword = \"fox\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("a.txt"), "a fox").unwrap();
        kwic()
            .current_dir(dir.path())
            .args(["analyze", "a.txt"])
            .assert()
            .success()
            .stderr(predicate::str::contains("was skipped"))
            .stdout(predicate::str::contains("1 documents, 1 keywords, 1 matches"));
    }

    #[test]
    fn unreadable_documents_warn_but_run() {
        let dir = corpus();
        kwic()
            .current_dir(dir.path())
            .args(["analyze", "a.txt", "missing.txt"])
            .assert()
            .success()
            .stderr(predicate::str::contains("failed to read"));
    }

    #[test]
    fn no_readable_documents_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join("keywords.toml"), KEYWORDS).unwrap();
        kwic()
            .current_dir(dir.path())
            .args(["analyze", "missing.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no readable documents"));
    }
}

mod tree {
    use super::*;

    /// Two matches whose before-windows share the words "the quick".
    fn tree_corpus() -> TempDir {
        let dir = temp_dir();
        fs::write(dir.path().join("keywords.toml"), KEYWORDS).unwrap();
        fs::write(
            dir.path().join("c.txt"),
            "the quick fox runs. the quick fox sleeps",
        )
        .unwrap();
        dir
    }

    #[test]
    fn folds_shared_branches() {
        let dir = tree_corpus();
        kwic()
            .current_dir(dir.path())
            .args(["tree", "fox", "."])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("2 matches")
                    .and(predicate::str::contains("quick (2)"))
                    .and(predicate::str::contains("the (2)"))
                    .and(predicate::str::contains("sleeps (1)")),
            );
    }

    #[test]
    fn json_tree_lists_branches() {
        let dir = tree_corpus();
        let output = kwic()
            .current_dir(dir.path())
            .args(["tree", "fox", ".", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let tree = &v.as_array().unwrap()[0];
        assert_eq!(tree["keyword"], "fox");
        assert_eq!(tree["match_count"], 2);
        assert_eq!(tree["before"][0]["word"], "quick");
        assert_eq!(tree["before"][0]["count"], 2);
    }

    #[test]
    fn window_flag_limits_depth() {
        let dir = tree_corpus();
        kwic()
            .current_dir(dir.path())
            .args(["tree", "fox", ".", "--window", "1"])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("quick (2)")
                    .and(predicate::str::contains("the (2)").not()),
            );
    }

    #[test]
    fn document_filter_restricts_matches() {
        let dir = tree_corpus();
        fs::write(dir.path().join("d.txt"), "a fox").unwrap();
        kwic()
            .current_dir(dir.path())
            .args(["tree", "fox", ".", "--document", "./d.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 match"));
    }

    #[test]
    fn unknown_keyword_fails() {
        let dir = tree_corpus();
        kwic()
            .current_dir(dir.path())
            .args(["tree", "owl", "."])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no keyword entry for 'owl'"));
    }

    #[test]
    fn unknown_document_filter_fails() {
        let dir = tree_corpus();
        kwic()
            .current_dir(dir.path())
            .args(["tree", "fox", ".", "--document", "nope.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no document with id"));
    }
}

mod inspect {
    use super::*;

    #[test]
    fn reports_name_and_word_count() {
        let dir = corpus();
        kwic()
            .current_dir(dir.path())
            .args(["inspect", "a.txt"])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("Document: a")
                    .and(predicate::str::contains("12 words")),
            );
    }

    #[test]
    fn applies_settings_from_keywords_file() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("keywords.toml"),
            "[settings]\nnormalize = true\n\n[[keyword]]\nword = \"fox\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("menu.txt"), "CAF\u{c9} Menu").unwrap();
        kwic()
            .current_dir(dir.path())
            .args(["inspect", "menu.txt"])
            .assert()
            .success()
            .stdout(
                predicate::str::contains("normalize=true")
                    .and(predicate::str::contains("cafe menu")),
            );
    }

    #[test]
    fn missing_file_fails() {
        let dir = temp_dir();
        kwic()
            .current_dir(dir.path())
            .args(["inspect", "missing.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read"));
    }

    #[test]
    fn unsupported_type_fails() {
        let dir = temp_dir();
        fs::write(dir.path().join("data.json"), "{}").unwrap();
        kwic()
            .current_dir(dir.path())
            .args(["inspect", "data.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unsupported file type"));
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_keywords_file() {
        let dir = temp_dir();
        kwic()
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let contents = fs::read_to_string(dir.path().join("keywords.toml")).unwrap();
        assert!(contents.contains("[[keyword]]"));
    }

    #[test]
    fn template_analyzes_out_of_the_box() {
        let dir = temp_dir();
        kwic().current_dir(dir.path()).arg("init").assert().success();
        fs::write(dir.path().join("doc.txt"), "an example document").unwrap();
        kwic()
            .current_dir(dir.path())
            .args(["analyze", "doc.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("1 documents, 1 keywords, 1 matches"));
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = temp_dir();
        kwic().current_dir(dir.path()).arg("init").assert().success();
        kwic()
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }

    #[test]
    fn force_overwrites() {
        let dir = temp_dir();
        fs::write(dir.path().join("keywords.toml"), "old contents").unwrap();
        kwic()
            .current_dir(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join("keywords.toml")).unwrap();
        assert!(contents.contains("[[keyword]]"));
    }
}

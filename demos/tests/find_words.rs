use golden_fixture::discover::fixture_glob;
use golden_fixture::{golden_assert, GoldenTest, LogCapture, TeardownReport};
use golden_fixture_demos::{find_words, longest_word};
use std::path::{Path, PathBuf};

fn fixtures(pattern: &str) -> Vec<(String, PathBuf)> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests");
    let files = fixture_glob(&dir, pattern).unwrap();
    assert!(!files.is_empty(), "no fixtures match {}", pattern);
    files
}

/// Fail on any usage warning, which would otherwise only reach `tracing`.
fn check_warnings(id: &str, report: &TeardownReport) {
    let warnings: Vec<String> = report.warnings.iter().map(ToString::to_string).collect();
    assert!(warnings.is_empty(), "{}:\n{}", id, warnings.join("\n"));
}

#[test]
fn test_find_words() {
    for (id, path) in fixtures("find_words/*.toml") {
        let report = GoldenTest::from_env()
            .named(format!("test_find_words[{}]", id))
            .run(&path, |golden| {
                let input: String = golden.input("input").unwrap();
                golden_assert!(golden, golden.out("output") == find_words(&input));
            })
            .unwrap();
        check_warnings(&id, &report);
    }
}

#[test]
fn test_longest_word() {
    for (id, path) in fixtures("longest_word/*.toml") {
        let report = GoldenTest::from_env()
            .named(format!("test_longest_word[{}]", id))
            .run(&path, |golden| {
                let input: String = golden.input("input").unwrap();
                let longest = golden.may_raise(|| longest_word(&input));
                golden_assert!(golden, golden.out_opt("output") == longest);
            })
            .unwrap();
        check_warnings(&id, &report);
    }
}

#[test]
fn test_find_words_logs() {
    for (id, path) in fixtures("logged.toml") {
        let report = GoldenTest::from_env()
            .named("test_find_words_logs")
            .run(&path, |golden| {
                let input: String = golden.input("input").unwrap();
                let words = golden.capture_logs(LogCapture::new(["golden_fixture_demos"]), || {
                    find_words(&input)
                });
                golden_assert!(golden, golden.out("count") == words.len());
            })
            .unwrap();
        check_warnings(&id, &report);
    }
}

//! Tests for the query functions.

use super::*;
use chrono::{DateTime, Utc};

fn modified() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

fn file(relative_path: &str, size: u64) -> RemoteEntry {
    let name = relative_path.rsplit('/').next().unwrap();
    RemoteEntry::new(name, relative_path, false, size, modified(), format!("smb://h/s/{relative_path}"))
}

fn dir(relative_path: &str) -> RemoteEntry {
    let name = relative_path.rsplit('/').next().unwrap();
    RemoteEntry::new(name, relative_path, true, 0, modified(), format!("smb://h/s/{relative_path}/"))
}

fn mixed() -> Vec<RemoteEntry> {
    vec![
        dir("docs"),
        file("docs/notes.txt", 12),
        file("docs/todo.TXT", 3),
        dir("docs/logs"),
        file("docs/logs/app.log", 400),
        file("readme.txt", 1),
        dir("empty.txt"),
    ]
}

fn paths<'a>(entries: &[&'a RemoteEntry]) -> Vec<&'a str> {
    entries.iter().map(|entry| entry.relative_path()).collect()
}

#[test]
fn test_files_only_preserves_order() {
    let entries = mixed();
    assert_eq!(
        paths(&files_only(&entries)),
        vec!["docs/notes.txt", "docs/todo.TXT", "docs/logs/app.log", "readme.txt"]
    );
}

#[test]
fn test_directories_only_preserves_order() {
    let entries = mixed();
    assert_eq!(paths(&directories_only(&entries)), vec!["docs", "docs/logs", "empty.txt"]);
}

#[test]
fn test_files_and_directories_partition_entries() {
    let entries = mixed();
    let files = files_only(&entries);
    let dirs = directories_only(&entries);

    assert_eq!(files.len() + dirs.len(), entries.len());
    for entry in &entries {
        let in_files = files.iter().any(|f| *f == entry);
        let in_dirs = dirs.iter().any(|d| *d == entry);
        assert!(in_files ^ in_dirs, "{} must be in exactly one view", entry.relative_path());
    }
}

#[test]
fn test_views_of_empty_set_are_empty() {
    assert!(files_only(&[]).is_empty());
    assert!(directories_only(&[]).is_empty());
    assert!(search(&[], ".*").unwrap().is_empty());
}

#[test]
fn test_search_is_full_match_not_substring() {
    let entries = mixed();
    assert!(search(&entries, "notes").unwrap().is_empty());
    assert_eq!(paths(&search(&entries, "notes\\.txt").unwrap()), vec!["docs/notes.txt"]);
}

#[test]
fn test_search_matches_name_not_path() {
    let entries = mixed();
    assert!(search(&entries, "docs/.*").unwrap().is_empty());
    assert_eq!(paths(&search(&entries, "app\\..*").unwrap()), vec!["docs/logs/app.log"]);
}

#[test]
fn test_search_is_case_sensitive_by_default() {
    let entries = mixed();
    assert_eq!(
        paths(&search(&entries, r".*\.txt$").unwrap()),
        vec!["docs/notes.txt", "readme.txt"]
    );
    assert_eq!(paths(&search(&entries, r"(?i).*\.txt").unwrap()).len(), 3);
}

#[test]
fn test_search_skips_directories() {
    let entries = mixed();
    // `empty.txt` is a directory and must not match.
    let found = search(&entries, r"empty\.txt").unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_search_over_directories_only_is_empty() {
    let entries = vec![dir("a"), dir("a/b"), dir("c")];
    for pattern in [".*", "a", "b", "[a-z]+"] {
        assert!(search(&entries, pattern).unwrap().is_empty(), "pattern {pattern}");
    }
}

#[test]
fn test_match_all_returns_every_file() {
    let entries = vec![file("x.bin", 1), file("y/z.dat", 2), file("w", 0)];
    assert_eq!(search(&entries, ".*").unwrap().len(), entries.len());
}

#[test]
fn test_search_is_idempotent() {
    let entries = mixed();
    let first = search(&entries, r".*\.(txt|log)").unwrap();
    let second = search(&entries, r".*\.(txt|log)").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_alternation_is_anchored_as_a_whole() {
    let entries = vec![file("a.txt", 1), file("xb", 1), file("bx", 1)];
    // Anchoring without a group, `^a\.txt|b$`, would also match `xb`.
    assert_eq!(paths(&search(&entries, "a\\.txt|b").unwrap()), vec!["a.txt"]);
}

#[test]
fn test_invalid_pattern_is_an_error() {
    let entries = mixed();
    for pattern in ["(", "[a-", "a)(b", "*.txt"] {
        match search(&entries, pattern) {
            Err(InventoryError::PatternSyntaxError(_)) => {}
            other => panic!("expected PatternSyntaxError for {pattern:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_invalid_pattern_fails_even_with_no_entries() {
    assert!(matches!(search(&[], "("), Err(InventoryError::PatternSyntaxError(_))));
}

#[test]
fn test_name_pattern_reuse() {
    let pattern = NamePattern::new(r".*\.log").unwrap();
    assert_eq!(pattern.as_str(), r".*\.log");
    assert!(pattern.matches("app.log"));
    assert!(!pattern.matches("app.log.gz"));
    assert_eq!(pattern.filter(&mixed()).len(), 1);
    assert_eq!(pattern.filter(&[file("other.log", 9)]).len(), 1);
}

//! The display name survives restarts through local storage

use crate::common::harness::{HarnessOptions, TermfolioTestHarness};
use termfolio::services::storage::{LocalStorage, MemoryNameStore, USER_NAME_KEY};
use tempfile::TempDir;

fn harness_with_storage(path: &std::path::Path) -> TermfolioTestHarness {
    let options = HarnessOptions {
        names: Box::new(LocalStorage::open(path).unwrap()),
        ..HarnessOptions::default()
    };
    let mut harness = TermfolioTestHarness::with_options(120, 40, options).unwrap();
    harness.finish_intro();
    harness
}

#[test]
fn test_setname_is_remembered_across_runs() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("local_storage.json");

    {
        let mut harness = harness_with_storage(&path);
        harness.submit("SETNAME ada");
        assert_eq!(harness.app().session().user_name(), "ada");
    }

    let stored = LocalStorage::open(&path).unwrap();
    assert_eq!(stored.get(USER_NAME_KEY), Some("ada"));

    let mut harness = harness_with_storage(&path);
    assert_eq!(harness.app().session().user_name(), "ada");
    harness.submit("whoami");
    assert_eq!(harness.last_output().as_deref(), Some("Current user: ada"));
}

#[test]
fn test_stored_name_appears_in_intro_echo() {
    let options = HarnessOptions {
        names: Box::new(MemoryNameStore::with_name("grace")),
        ..HarnessOptions::default()
    };
    let harness = TermfolioTestHarness::with_options(120, 40, options).unwrap();

    let texts = harness.transcript_texts();
    assert_eq!(texts[0], "grace@-jake-:~$ cat introduction.txt");
}

#[test]
fn test_other_storage_keys_are_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("local_storage.json");
    std::fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

    let mut harness = harness_with_storage(&path);
    harness.submit("SETNAME Bob");

    let stored = LocalStorage::open(&path).unwrap();
    assert_eq!(stored.get("theme"), Some("dark"));
    assert_eq!(stored.get(USER_NAME_KEY), Some("Bob"));
}

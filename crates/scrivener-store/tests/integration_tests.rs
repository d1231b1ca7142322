//! Integration tests for scrivener-store
//!
//! These tests exercise the full persistence cycle against a real
//! temporary directory.

use scrivener_domain::{NewNote, NoteId, NoteUpdate};
use scrivener_store::{FileStore, StoreError};
use std::fs;
use tempfile::TempDir;

fn note(title: &str, content: &str, tags: &[&str], auto_tagged: bool) -> NewNote {
    NewNote {
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        auto_tagged,
    }
}

#[test]
fn test_open_creates_missing_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("notes");

    let (store, report) = FileStore::open(&root).unwrap();

    assert!(root.is_dir());
    assert!(store.is_empty());
    assert_eq!(report.loaded, 0);
    assert!(report.skipped.is_empty());
}

#[test]
fn test_open_fails_when_path_is_a_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("occupied");
    fs::write(&file, b"not a directory").unwrap();

    let result = FileStore::open(&file);
    assert!(matches!(result, Err(StoreError::Directory { .. })));
}

#[test]
fn test_create_then_get_round_trip() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();

    let created = store
        .create(note("Hello", "Hi there, just saying hello", &["Greeting"], true))
        .unwrap();

    let fetched = store.get(&created.id).unwrap();
    assert_eq!(fetched, &created);
    assert_eq!(created.created_at, created.updated_at);
    assert!(store.record_path(&created.id).is_file());
}

#[test]
fn test_notes_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let created = {
        let (mut store, _) = FileStore::open(dir.path()).unwrap();
        store
            .create(note("Budget Plan", "Tracking my monthly budget", &["Finance"], true))
            .unwrap()
    };

    let (store, report) = FileStore::open(dir.path()).unwrap();
    assert_eq!(report.loaded, 1);
    assert_eq!(store.get(&created.id).unwrap(), &created);
}

#[test]
fn test_persisted_format_is_readable_json() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    let created = store.create(note("Notes", "body", &["Custom"], false)).unwrap();

    let text = fs::read_to_string(store.record_path(&created.id)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["id"], created.id.as_str());
    assert_eq!(json["title"], "Notes");
    assert_eq!(json["tags"], serde_json::json!(["Custom"]));
    assert_eq!(json["auto_tagged"], false);
    assert!(json["created_at"].is_string());
    assert!(text.contains('\n'), "records are pretty-printed");
}

#[test]
fn test_corrupted_records_are_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let good = {
        let (mut store, _) = FileStore::open(dir.path()).unwrap();
        store.create(note("Keep me", "", &[], false)).unwrap()
    };

    fs::write(dir.path().join("20200101_000000_000.json"), b"{\"id\": \"trunc").unwrap();
    fs::write(dir.path().join("garbage.json"), b"not json at all").unwrap();
    fs::write(dir.path().join("readme.txt"), b"ignored").unwrap();

    let (store, report) = FileStore::open(dir.path()).unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped.len(), 2);
    assert!(report.skipped.iter().all(|s| s.reason.contains("parse failed")));
    assert_eq!(store.get(&good.id).unwrap(), &good);
}

#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_file_name_is_reported_as_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(OsStr::from_bytes(b"\xff\xfe.json")), b"{}").unwrap();

    let (store, report) = FileStore::open(dir.path()).unwrap();

    assert!(store.is_empty());
    assert_eq!(report.loaded, 0);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].reason.contains("UTF-8"));
}

#[test]
fn test_record_with_mismatched_id_is_skipped() {
    let dir = TempDir::new().unwrap();
    let created = {
        let (mut store, _) = FileStore::open(dir.path()).unwrap();
        store.create(note("Original", "", &[], false)).unwrap()
    };
    let source = dir.path().join(format!("{}.json", created.id));
    fs::rename(&source, dir.path().join("renamed.json")).unwrap();

    let (store, report) = FileStore::open(dir.path()).unwrap();
    assert!(store.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].reason.contains("does not match"));
}

#[test]
fn test_stale_temp_files_are_removed_at_load() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("20240101_000000_000.json.tmp"), b"{half").unwrap();

    let (store, report) = FileStore::open(dir.path()).unwrap();

    assert!(store.is_empty());
    assert_eq!(report.removed_temp_files, 1);
    assert!(report.skipped.is_empty());
    assert!(!dir.path().join("20240101_000000_000.json.tmp").exists());
}

#[test]
fn test_update_merges_only_supplied_fields() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    let created = store
        .create(note("Budget Plan", "old text", &["Finance"], true))
        .unwrap();

    let updated = store
        .update(
            &created.id,
            NoteUpdate {
                content: Some("new text".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.content, "new text");
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.tags, created.tags);
    assert!(updated.auto_tagged);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    let (reopened, _) = FileStore::open(dir.path()).unwrap();
    assert_eq!(reopened.get(&created.id).unwrap(), &updated);
}

#[test]
fn test_update_with_tags_marks_manual() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    let created = store.create(note("Hello", "", &["Greeting"], true)).unwrap();

    let updated = store
        .update(
            &created.id,
            NoteUpdate {
                tags: Some(vec!["Custom".to_string()]),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(updated.tags, vec!["Custom"]);
    assert!(!updated.auto_tagged);
}

#[test]
fn test_retag_marks_auto() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    let created = store.create(note("Hello", "", &["Custom"], false)).unwrap();

    let retagged = store
        .retag(&created.id, vec!["Greeting".to_string()])
        .unwrap();

    assert_eq!(retagged.tags, vec!["Greeting"]);
    assert!(retagged.auto_tagged);
    assert!(retagged.updated_at > created.updated_at);
}

#[test]
fn test_update_missing_note_is_not_found() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    let id = NoteId::parse("20240101_000000_000").unwrap();

    let result = store.update(&id, NoteUpdate::default());
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[test]
fn test_failed_update_write_leaves_previous_version_intact() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    let created = store.create(note("Stable", "version one", &[], false)).unwrap();

    // Occupy the temp path so every write attempt fails
    let record = store.record_path(&created.id);
    let tmp = record.with_file_name(format!("{}.json.tmp", created.id));
    fs::create_dir(&tmp).unwrap();

    let result = store.update(
        &created.id,
        NoteUpdate {
            content: Some("version two".to_string()),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(StoreError::Io(_))));

    // Memory and disk both still hold version one
    assert_eq!(store.get(&created.id).unwrap().content, "version one");
    fs::remove_dir(&tmp).unwrap();
    let (reopened, report) = FileStore::open(dir.path()).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(reopened.get(&created.id).unwrap(), &created);
}

#[test]
fn test_delete_twice_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    let created = store.create(note("Doomed", "", &[], false)).unwrap();

    let removed = store.delete(&created.id).unwrap();
    assert_eq!(removed.id, created.id);
    assert!(!store.record_path(&created.id).exists());

    let again = store.delete(&created.id);
    assert!(matches!(again, Err(StoreError::NotFound(_))));
    assert!(store.get(&created.id).is_err());
}

#[test]
fn test_search_scenarios() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    let hello = store
        .create(note("Hello", "Hi there, just saying hello", &["Greeting"], true))
        .unwrap();
    let budget = store
        .create(note("Budget Plan", "Tracking my monthly budget and savings", &["Finance"], true))
        .unwrap();

    let found = store.search("budget");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, budget.id);

    // Tag-only match
    let by_tag_text = store.search("greet");
    assert_eq!(by_tag_text.len(), 1);
    assert_eq!(by_tag_text[0].id, hello.id);

    assert!(store.search("nothing matches this").is_empty());
}

#[test]
fn test_search_by_tag_is_exact_and_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    store.create(note("a", "", &["Finance"], true)).unwrap();
    store.create(note("b", "", &["Coding", "Finance"], true)).unwrap();
    store.create(note("c", "", &["Coding"], true)).unwrap();

    assert_eq!(store.search_by_tag("finance").len(), 2);
    assert_eq!(store.search_by_tag("Fin").len(), 0);
    assert_eq!(store.search_by_tag("CODING").len(), 2);
}

#[test]
fn test_results_are_most_recently_updated_first() {
    let dir = TempDir::new().unwrap();
    let (mut store, _) = FileStore::open(dir.path()).unwrap();
    let first = store.create(note("first", "shared", &[], false)).unwrap();
    let second = store.create(note("second", "shared", &[], false)).unwrap();

    store
        .update(
            &first.id,
            NoteUpdate {
                title: Some("first, edited".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let ids: Vec<_> = store.search("shared").into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

//! Integration tests for PublishCoordinator
//!
//! Drives the coordinator end to end against a file-backed store in a
//! temporary directory.

use std::sync::Arc;

use libblogwiz::config::Config;
use libblogwiz::files::LocalFiles;
use libblogwiz::service::events::Event;
use libblogwiz::service::PublishCoordinator;
use libblogwiz::storage::{FileStore, KeyValueStoreExt, ARCHIVE_KEY};
use libblogwiz::{ArchiveFile, PostEdit, PostStatus};
use tempfile::TempDir;

/// Setup a coordinator whose store lives in a temporary directory
fn setup_test_coordinator() -> (PublishCoordinator, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.path = temp_dir.path().join("store").to_string_lossy().into_owned();
    config.defaults.export_dir = Some(temp_dir.path().join("exports").to_string_lossy().into_owned());

    let coordinator = PublishCoordinator::from_config(&config);
    (coordinator, temp_dir)
}

fn write(coordinator: &mut PublishCoordinator, title: &str, content: &str) {
    coordinator.new_post();
    coordinator
        .edit_current(&PostEdit {
            title: Some(title.to_string()),
            content: Some(content.to_string()),
            add_tags: vec!["rust".to_string(), "blog".to_string()],
            ..PostEdit::default()
        })
        .unwrap();
}

#[test]
fn test_draft_to_publish_workflow() {
    let (mut coordinator, temp_dir) = setup_test_coordinator();

    // Step 1: write and save a draft
    write(&mut coordinator, "First", "<p>Hello <b>world</b></p>");
    let draft = coordinator.save_current().unwrap();
    assert_eq!(draft.status, PostStatus::Draft);
    assert_eq!(draft.excerpt, "Hello world");
    assert!(draft.published_at.is_none());

    // Step 2: publish it
    let published = coordinator.publish_current().unwrap();
    assert_eq!(published.id, draft.id);
    assert_eq!(published.status, PostStatus::Published);
    assert!(published.published_at.is_some());
    assert_eq!(published.created_at, draft.created_at);

    // Step 3: history holds both snapshots, newest first
    let statuses: Vec<PostStatus> = coordinator
        .history()
        .list(None)
        .iter()
        .map(|e| e.status)
        .collect();
    assert_eq!(statuses, vec![PostStatus::Published, PostStatus::Draft]);

    // Step 4: the store on disk matches
    let store = FileStore::new(temp_dir.path().join("store"));
    let persisted: ArchiveFile = store.get(ARCHIVE_KEY, ArchiveFile::default());
    assert_eq!(persisted.posts, vec![published]);
    assert_eq!(persisted.history.len(), 2);
}

#[test]
fn test_republish_keeps_first_publish_date() {
    let (mut coordinator, _temp_dir) = setup_test_coordinator();
    write(&mut coordinator, "Twice", "<p>x</p>");

    let first = coordinator.publish_current().unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = coordinator.publish_current().unwrap();

    assert_eq!(second.published_at, first.published_at);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(coordinator.history().len(), 2);
}

#[test]
fn test_history_capacity_through_coordinator() {
    let (mut coordinator, _temp_dir) = setup_test_coordinator();
    write(&mut coordinator, "Busy", "<p>x</p>");

    for _ in 0..105 {
        coordinator.save_current().unwrap();
    }
    assert_eq!(coordinator.history().len(), 100);
}

#[test]
fn test_restore_then_save_creates_separate_post() {
    let (mut coordinator, _temp_dir) = setup_test_coordinator();
    write(&mut coordinator, "Original", "<p>v1</p>");
    let original = coordinator.save_current().unwrap();
    let entry_id = coordinator.history().list(None)[0].id.clone();

    coordinator.restore(&entry_id).unwrap();
    coordinator
        .edit_current(&PostEdit {
            content: Some("<p>v2</p>".to_string()),
            ..PostEdit::default()
        })
        .unwrap();
    let restored = coordinator.save_current().unwrap();

    assert_ne!(restored.id, original.id);
    let entry = coordinator.history().get(&entry_id).unwrap();
    assert_eq!(entry.content, "<p>v1</p>");
    assert_eq!(entry.post_id, original.id);
}

#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.storage.path = temp_dir.path().to_string_lossy().into_owned();

    let saved = {
        let mut coordinator = PublishCoordinator::from_config(&config);
        write(&mut coordinator, "Persist", "<p>body</p>");
        coordinator.save_current().unwrap()
    };

    let reopened = PublishCoordinator::from_config(&config);
    assert_eq!(reopened.current(), Some(&saved));
    assert_eq!(reopened.history().len(), 1);
}

#[test]
fn test_events_follow_lifecycle() {
    let (mut coordinator, _temp_dir) = setup_test_coordinator();
    let mut events = coordinator.subscribe();

    write(&mut coordinator, "Evented", "<p>x</p>");
    coordinator.save_current().unwrap();
    coordinator.publish_current().unwrap();
    let entry_id = coordinator.history().list(None)[0].id.clone();
    coordinator.delete(&entry_id).unwrap();

    let kinds: Vec<&'static str> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|event| match event {
            Event::PostCreated { .. } => "created",
            Event::PostSaved { .. } => "saved",
            Event::PostPublished { .. } => "published",
            Event::HistoryEntryDeleted { .. } => "deleted",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["created", "saved", "published", "deleted"]);
}

#[test]
fn test_unwritable_store_reports_error_but_keeps_memory_state() {
    let temp_dir = TempDir::new().unwrap();
    // a regular file where the store directory should be
    let blocker = temp_dir.path().join("blocked");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut coordinator = PublishCoordinator::new(
        Arc::new(FileStore::new(&blocker)),
        Arc::new(LocalFiles::new(temp_dir.path())),
        ARCHIVE_KEY,
    );
    write(&mut coordinator, "Unsaved", "<p>x</p>");

    let err = coordinator.save_current().unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert_eq!(coordinator.history().len(), 1);
    assert_eq!(coordinator.current().unwrap().excerpt, "x");
}

//! The on-disk store as another process (or an older release) would see it.

use std::fs;

use lodestone::io::folder_store::{FOLDERS_KEY, get_folders};
use lodestone::io::store::{FileStore, KeyValueStore};
use lodestone::io::todo_store::{TODOS_KEY, get_todos};
use lodestone::model::config::AppConfig;
use lodestone::ops::{folder_ops, todo_ops};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn legacy_folder_icons_are_migrated_on_disk() {
    let tmp = TempDir::new().unwrap();
    // Older releases stored a rendered component object instead of an icon name
    fs::write(
        tmp.path().join("folders.json"),
        r#"[{"id":"inbox","name":"Inbox","icon":{"type":{},"props":{}}},
            {"id":"work","name":"work","icon":{}},
            {"id":"garden-1","name":"Garden","icon":null}]"#,
    )
    .unwrap();

    let mut store = FileStore::new(tmp.path());
    let folders = get_folders(&mut store);
    assert_eq!(folders[0].icon.as_deref(), Some("InboxArrowDownIcon"));
    assert_eq!(folders[1].icon.as_deref(), Some("BriefcaseIcon"));
    assert_eq!(folders[2].icon, None);

    let raw = store.get(FOLDERS_KEY).unwrap().unwrap();
    assert!(raw.contains(r#""icon": "BriefcaseIcon""#));
    assert!(!raw.contains("props"));
}

#[test]
fn todos_written_by_one_store_are_read_by_another() {
    let tmp = TempDir::new().unwrap();
    let mut writer = FileStore::new(tmp.path());
    let folders = get_folders(&mut writer);
    let todo = todo_ops::create_todo(
        &mut writer,
        &folders,
        "Buy milk",
        "inbox",
        &["errands".to_string()],
    )
    .unwrap();

    let reader = FileStore::new(tmp.path());
    let todos = get_todos(&reader);
    assert_eq!(todos, vec![todo]);

    let raw = reader.get(TODOS_KEY).unwrap().unwrap();
    assert!(raw.contains("folderId"));
}

#[test]
fn deleting_a_folder_removes_its_todos_from_disk() {
    let tmp = TempDir::new().unwrap();
    let mut store = FileStore::new(tmp.path());
    let folders = get_folders(&mut store);
    todo_ops::create_todo(&mut store, &folders, "Essay", "school", &[]).unwrap();
    todo_ops::create_todo(&mut store, &folders, "Milk", "inbox", &[]).unwrap();

    let config = AppConfig::default();
    let deleted = folder_ops::delete_folder(&mut store, &config.permanent_folders, "school").unwrap();
    assert_eq!(deleted.todos_removed, 1);

    let mut fresh = FileStore::new(tmp.path());
    assert!(get_folders(&mut fresh).iter().all(|f| f.id != "school"));
    let texts: Vec<String> = get_todos(&fresh).into_iter().map(|t| t.text).collect();
    assert_eq!(texts, vec!["Milk".to_string()]);
}

#[test]
fn corrupt_files_fall_back_without_being_overwritten() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("folders.json"), "{not json").unwrap();
    fs::write(tmp.path().join("todos.json"), "[{").unwrap();

    let mut store = FileStore::new(tmp.path());
    assert_eq!(get_folders(&mut store).len(), 9);
    assert!(get_todos(&store).is_empty());
    assert_eq!(
        fs::read_to_string(tmp.path().join("folders.json")).unwrap(),
        "{not json"
    );
}

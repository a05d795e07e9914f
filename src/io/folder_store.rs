use serde::Deserialize;

use crate::io::store::{KeyValueStore, StoreError, put_json};
use crate::model::folder::{Folder, default_folders, default_icon_for};

pub const FOLDERS_KEY: &str = "folders";

/// Stored shape, lenient about the icon so older lists can be migrated. A
/// missing or null name falls back to the id.
#[derive(Deserialize)]
struct StoredFolder {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    icon: serde_json::Value,
}

impl StoredFolder {
    fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.clone())
    }
}

/// Load the folder list.
///
/// First run seeds and persists the defaults. A list written before icons
/// were stored by name is migrated and written back. Unreadable data yields
/// the defaults without touching the store.
pub fn get_folders<S: KeyValueStore + ?Sized>(store: &mut S) -> Vec<Folder> {
    let text = match store.get(FOLDERS_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => {
            let folders = default_folders();
            if let Err(e) = put_json(store, FOLDERS_KEY, &folders) {
                tracing::warn!(error = %e, "could not persist default folders");
            }
            return folders;
        }
        Err(e) => {
            tracing::warn!(error = %e, "folder read failed, using defaults");
            return default_folders();
        }
    };

    let entries: Vec<serde_json::Value> = match serde_json::from_str(&text) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "folder list unreadable, using defaults");
            return default_folders();
        }
    };
    let stored: Vec<StoredFolder> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(folder) => Some(folder),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping unreadable folder");
                None
            }
        })
        .collect();

    let legacy = stored.first().is_some_and(|f| !f.icon.is_string());
    if legacy {
        tracing::info!(count = stored.len(), "migrating folder icons to names");
        let migrated: Vec<Folder> = stored
            .into_iter()
            .map(|f| {
                let name = f.name();
                Folder::new(f.id, &name, default_icon_for(&name))
            })
            .collect();
        if let Err(e) = put_json(store, FOLDERS_KEY, &migrated) {
            tracing::warn!(error = %e, "could not persist migrated folders");
        }
        return migrated;
    }

    stored
        .into_iter()
        .map(|f| Folder {
            name: f.name(),
            icon: f.icon.as_str().map(str::to_string),
            id: f.id,
        })
        .collect()
}

pub fn save_folders<S: KeyValueStore + ?Sized>(
    store: &mut S,
    folders: &[Folder],
) -> Result<(), StoreError> {
    put_json(store, FOLDERS_KEY, folders)
}

/// `Work Stuff` at millis 1700000000000 → `work-stuff-1700000000000`
pub fn folder_id_for(name: &str, millis: i64) -> String {
    let mut slug = String::new();
    let mut in_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.push(c);
            in_space = false;
        }
    }
    format!("{}-{}", slug, millis)
}

/// Append a folder. An exact name collision leaves the list unchanged.
pub fn add_folder<S: KeyValueStore + ?Sized>(
    store: &mut S,
    name: &str,
    icon: Option<&str>,
) -> Result<Vec<Folder>, StoreError> {
    add_folder_at(store, name, icon, chrono::Utc::now().timestamp_millis())
}

pub fn add_folder_at<S: KeyValueStore + ?Sized>(
    store: &mut S,
    name: &str,
    icon: Option<&str>,
    millis: i64,
) -> Result<Vec<Folder>, StoreError> {
    let mut folders = get_folders(store);
    if folders.iter().any(|f| f.name == name) {
        tracing::warn!(name, "folder name already exists");
        return Ok(folders);
    }
    folders.push(Folder::new(folder_id_for(name, millis), name, icon));
    save_folders(store, &folders)?;
    Ok(folders)
}

/// Remove a folder by id. Unknown ids leave the list unchanged.
pub fn delete_folder<S: KeyValueStore + ?Sized>(
    store: &mut S,
    id: &str,
) -> Result<Vec<Folder>, StoreError> {
    let mut folders = get_folders(store);
    let before = folders.len();
    folders.retain(|f| f.id != id);
    if folders.len() != before {
        save_folders(store, &folders)?;
    }
    Ok(folders)
}

pub fn rename_folder<S: KeyValueStore + ?Sized>(
    store: &mut S,
    id: &str,
    name: &str,
) -> Result<Vec<Folder>, StoreError> {
    let mut folders = get_folders(store);
    if let Some(folder) = folders.iter_mut().find(|f| f.id == id) {
        folder.name = name.to_string();
        save_folders(store, &folders)?;
    }
    Ok(folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_read_seeds_and_persists_defaults() {
        let mut store = MemoryStore::new();
        let folders = get_folders(&mut store);
        assert_eq!(folders, default_folders());
        assert!(store.raw(FOLDERS_KEY).is_some());
    }

    #[test]
    fn legacy_icons_are_migrated_and_persisted() {
        let mut store = MemoryStore::new().with(
            FOLDERS_KEY,
            r#"[{"id":"inbox","name":"Inbox","icon":{"type":"svg"}},{"id":"x","name":"Misc","icon":{}}]"#,
        );
        let folders = get_folders(&mut store);
        assert_eq!(
            folders,
            vec![
                Folder::new("inbox", "Inbox", Some("InboxArrowDownIcon")),
                Folder::new("x", "Misc", None),
            ]
        );
        let persisted: Vec<Folder> = serde_json::from_str(store.raw(FOLDERS_KEY).unwrap()).unwrap();
        assert_eq!(persisted, folders);
    }

    #[test]
    fn malformed_list_degrades_to_defaults_without_writing() {
        let mut store = MemoryStore::new().with(FOLDERS_KEY, "{not json");
        assert_eq!(get_folders(&mut store), default_folders());
        assert_eq!(store.raw(FOLDERS_KEY), Some("{not json"));
    }

    #[test]
    fn damaged_entries_do_not_cost_the_rest_of_the_list() {
        let mut store = MemoryStore::new().with(
            FOLDERS_KEY,
            r#"[{"id":"inbox","name":"Inbox","icon":"StarIcon"},
                {"id":"garden","icon":"HomeIcon"},
                {"name":"no id"},
                {"id":"trips","name":null,"icon":"StarIcon"}]"#,
        );
        let folders = get_folders(&mut store);
        let names: Vec<&str> = folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Inbox", "garden", "trips"]);

        let after = add_folder_at(&mut store, "Reading", None, 9).unwrap();
        let ids: Vec<&str> = after.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["inbox", "garden", "trips", "reading-9"]);
    }

    #[test]
    fn missing_icon_reads_as_none() {
        let mut store = MemoryStore::new().with(
            FOLDERS_KEY,
            r#"[{"id":"inbox","name":"Inbox","icon":"StarIcon"},{"id":"a","name":"A"}]"#,
        );
        let folders = get_folders(&mut store);
        assert_eq!(folders[1].icon, None);
    }

    #[test]
    fn add_folder_slugs_the_name() {
        let mut store = MemoryStore::new();
        let folders = add_folder_at(&mut store, "Side  Projects", None, 1_700_000_000_000).unwrap();
        let added = folders.last().unwrap();
        assert_eq!(added.id, "side-projects-1700000000000");
        assert_eq!(added.name, "Side  Projects");
    }

    #[test]
    fn add_folder_rejects_exact_name_collision() {
        let mut store = MemoryStore::new();
        let before = get_folders(&mut store);
        let after = add_folder_at(&mut store, "work", None, 1).unwrap();
        assert_eq!(before, after);
        // Case differs, so not a collision
        let after = add_folder_at(&mut store, "Work", None, 2).unwrap();
        assert_eq!(after.len(), before.len() + 1);
    }

    #[test]
    fn add_folder_surfaces_write_failure() {
        let mut store = MemoryStore::new()
            .with(FOLDERS_KEY, "[]")
            .reject_writes();
        assert!(add_folder_at(&mut store, "New", None, 1).is_err());
    }

    #[test]
    fn delete_and_rename() {
        let mut store = MemoryStore::new();
        get_folders(&mut store);
        let folders = rename_folder(&mut store, "work", "Job").unwrap();
        assert!(folders.iter().any(|f| f.id == "work" && f.name == "Job"));
        let folders = delete_folder(&mut store, "work").unwrap();
        assert!(!folders.iter().any(|f| f.id == "work"));
        assert_eq!(get_folders(&mut store).len(), 8);
    }
}

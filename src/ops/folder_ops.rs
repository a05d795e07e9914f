use crate::io::folder_store::{self, get_folders};
use crate::io::store::{KeyValueStore, StoreError};
use crate::io::todo_store::{get_todos, save_todos};
use crate::model::folder::{Folder, SidebarSection};

/// Error type for folder operations
#[derive(Debug, thiserror::Error)]
pub enum FolderError {
    #[error("folder not found: {0}")]
    NotFound(String),
    #[error("folder {0} is permanent and cannot be deleted")]
    Permanent(String),
    #[error("folder name cannot be empty")]
    EmptyName,
    #[error("a folder named {0:?} already exists")]
    NameTaken(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Find a folder by id, falling back to a case-insensitive name match.
pub fn resolve<'a>(folders: &'a [Folder], query: &str) -> Option<&'a Folder> {
    folders
        .iter()
        .find(|f| f.id == query)
        .or_else(|| folders.iter().find(|f| f.name.eq_ignore_ascii_case(query)))
}

pub fn create_folder<S: KeyValueStore + ?Sized>(
    store: &mut S,
    name: &str,
    icon: Option<&str>,
) -> Result<Folder, FolderError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FolderError::EmptyName);
    }
    let before = get_folders(store).len();
    let folders = folder_store::add_folder(store, name, icon)?;
    if folders.len() == before {
        return Err(FolderError::NameTaken(name.to_string()));
    }
    let created = folders
        .last()
        .cloned()
        .ok_or_else(|| FolderError::NotFound(name.to_string()))?;
    tracing::info!(id = %created.id, "folder added");
    Ok(created)
}

pub fn rename_folder<S: KeyValueStore + ?Sized>(
    store: &mut S,
    id: &str,
    name: &str,
) -> Result<Folder, FolderError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(FolderError::EmptyName);
    }
    let folders = get_folders(store);
    if !folders.iter().any(|f| f.id == id) {
        return Err(FolderError::NotFound(id.to_string()));
    }
    if folders.iter().any(|f| f.id != id && f.name == name) {
        return Err(FolderError::NameTaken(name.to_string()));
    }
    folder_store::rename_folder(store, id, name)?
        .into_iter()
        .find(|f| f.id == id)
        .ok_or_else(|| FolderError::NotFound(id.to_string()))
}

/// Result of a confirmed row delete
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedFolder {
    pub folder: Folder,
    pub todos_removed: usize,
}

/// Delete a folder together with every todo filed in it.
pub fn delete_folder<S: KeyValueStore + ?Sized>(
    store: &mut S,
    permanent: &[String],
    id: &str,
) -> Result<DeletedFolder, FolderError> {
    if permanent.iter().any(|p| p == id) {
        return Err(FolderError::Permanent(id.to_string()));
    }
    let previous = get_folders(store);
    let folder = previous
        .iter()
        .find(|f| f.id == id)
        .cloned()
        .ok_or_else(|| FolderError::NotFound(id.to_string()))?;

    // Folder goes first and is put back if the todo write fails
    folder_store::delete_folder(store, id)?;

    let mut todos = get_todos(store);
    let before = todos.len();
    todos.retain(|t| t.folder_id != id);
    let todos_removed = before - todos.len();
    if todos_removed > 0
        && let Err(e) = save_todos(store, &todos)
    {
        if let Err(restore) = folder_store::save_folders(store, &previous) {
            tracing::error!(id, error = %restore, "could not restore folder after failed delete");
        }
        return Err(e.into());
    }

    tracing::info!(id, todos_removed, "folder deleted");
    Ok(DeletedFolder {
        folder,
        todos_removed,
    })
}

/// Group folders into sidebar sections, keeping stored order within each.
/// Empty sections are omitted.
pub fn sidebar_sections(folders: &[Folder]) -> Vec<(SidebarSection, Vec<&Folder>)> {
    [SidebarSection::Main, SidebarSection::Areas, SidebarSection::Other]
        .into_iter()
        .map(|section| {
            let members: Vec<&Folder> = folders
                .iter()
                .filter(|f| SidebarSection::of(&f.id) == section)
                .collect();
            (section, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

use crate::io::store::{KeyValueStore, StoreError};
use crate::io::todo_store::{self, get_todos, save_todos};
use crate::model::folder::Folder;
use crate::model::todo::Todo;

/// Error type for todo operations
#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("todo not found: {0}")]
    NotFound(u64),
    #[error("todo text cannot be empty")]
    EmptyText,
    #[error("tag cannot be empty")]
    EmptyTag,
    #[error("folder not found: {0}")]
    UnknownFolder(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// `  #Errands ` → `Errands`. Empty after stripping → None.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw.trim();
    let tag = tag.strip_prefix('#').unwrap_or(tag).trim();
    (!tag.is_empty()).then(|| tag.to_string())
}

fn require_folder(folders: &[Folder], folder_id: &str) -> Result<(), TodoError> {
    if folders.iter().any(|f| f.id == folder_id) {
        Ok(())
    } else {
        Err(TodoError::UnknownFolder(folder_id.to_string()))
    }
}

/// Load, change one todo in place, save. Returns the changed todo.
fn modify<S, F>(store: &mut S, id: u64, change: F) -> Result<Todo, TodoError>
where
    S: KeyValueStore + ?Sized,
    F: FnOnce(&mut Todo) -> Result<(), TodoError>,
{
    let mut todos = get_todos(store);
    let todo = todos
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(TodoError::NotFound(id))?;
    change(todo)?;
    let changed = todo.clone();
    save_todos(store, &todos)?;
    Ok(changed)
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

pub fn create_todo<S: KeyValueStore + ?Sized>(
    store: &mut S,
    folders: &[Folder],
    text: &str,
    folder_id: &str,
    tags: &[String],
) -> Result<Todo, TodoError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TodoError::EmptyText);
    }
    if !folder_id.is_empty() {
        require_folder(folders, folder_id)?;
    }
    let mut todo = todo_store::add_todo(store, text, folder_id)?;
    let tags: Vec<String> = tags.iter().filter_map(|t| normalize_tag(t)).collect();
    if !tags.is_empty() {
        todo = modify(store, todo.id, |t| {
            for tag in tags {
                push_tag(t, tag);
            }
            Ok(())
        })?;
    }
    tracing::info!(id = todo.id, folder = %todo.folder_id, "todo added");
    Ok(todo)
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

pub fn toggle_todo<S: KeyValueStore + ?Sized>(store: &mut S, id: u64) -> Result<Todo, TodoError> {
    modify(store, id, |t| {
        t.completed = !t.completed;
        Ok(())
    })
}

pub fn edit_text<S: KeyValueStore + ?Sized>(store: &mut S, id: u64, text: &str) -> Result<Todo, TodoError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(TodoError::EmptyText);
    }
    modify(store, id, |t| {
        t.text = text.to_string();
        Ok(())
    })
}

fn push_tag(todo: &mut Todo, tag: String) {
    if !todo.has_tag(&tag) {
        todo.tags.push(tag);
    }
}

/// Add a tag; a tag the todo already carries is ignored.
pub fn add_tag<S: KeyValueStore + ?Sized>(store: &mut S, id: u64, raw: &str) -> Result<Todo, TodoError> {
    let tag = normalize_tag(raw).ok_or(TodoError::EmptyTag)?;
    modify(store, id, |t| {
        push_tag(t, tag);
        Ok(())
    })
}

pub fn remove_tag<S: KeyValueStore + ?Sized>(store: &mut S, id: u64, raw: &str) -> Result<Todo, TodoError> {
    let tag = normalize_tag(raw).ok_or(TodoError::EmptyTag)?;
    modify(store, id, |t| {
        t.tags.retain(|existing| !existing.eq_ignore_ascii_case(&tag));
        Ok(())
    })
}

pub fn move_todo<S: KeyValueStore + ?Sized>(
    store: &mut S,
    folders: &[Folder],
    id: u64,
    folder_id: &str,
) -> Result<Todo, TodoError> {
    require_folder(folders, folder_id)?;
    modify(store, id, |t| {
        t.folder_id = folder_id.to_string();
        Ok(())
    })
}

pub fn delete_todo<S: KeyValueStore + ?Sized>(store: &mut S, id: u64) -> Result<Todo, TodoError> {
    let removed = todo_store::delete_todo(store, id)?.ok_or(TodoError::NotFound(id))?;
    tracing::info!(id, "todo deleted");
    Ok(removed)
}

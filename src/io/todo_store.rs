use serde::Deserialize;

use crate::io::store::{KeyValueStore, StoreError, put_json};
use crate::model::folder::INBOX_ID;
use crate::model::todo::Todo;

pub const TODOS_KEY: &str = "todos";

/// Stored shape. Everything but `id` and `text` may be missing or null and
/// is back-filled.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTodo {
    id: u64,
    text: String,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    tags: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    folder_id: Option<String>,
}

impl From<StoredTodo> for Todo {
    fn from(stored: StoredTodo) -> Self {
        let folder_id = stored
            .folder_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| INBOX_ID.to_string());
        Todo {
            id: stored.id,
            text: stored.text,
            completed: stored.completed.unwrap_or(false),
            tags: stored
                .tags
                .unwrap_or_default()
                .into_iter()
                .filter_map(|tag| tag.as_str().map(str::to_string))
                .collect(),
            folder_id,
        }
    }
}

/// Load every todo.
///
/// Missing or null fields are back-filled. An entry without a usable id or
/// text is skipped on its own; only a document that is not a JSON array
/// reads as empty.
pub fn get_todos<S: KeyValueStore + ?Sized>(store: &S) -> Vec<Todo> {
    let text = match store.get(TODOS_KEY) {
        Ok(Some(text)) => text,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "todo read failed");
            return Vec::new();
        }
    };
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&text) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "todo list unreadable");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<StoredTodo>(entry) {
            Ok(stored) => Some(Todo::from(stored)),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping unreadable todo");
                None
            }
        })
        .collect()
}

pub fn save_todos<S: KeyValueStore + ?Sized>(store: &mut S, todos: &[Todo]) -> Result<(), StoreError> {
    put_json(store, TODOS_KEY, todos)
}

/// Create and persist a todo. An empty folder id files it in the inbox.
pub fn add_todo<S: KeyValueStore + ?Sized>(
    store: &mut S,
    text: &str,
    folder_id: &str,
) -> Result<Todo, StoreError> {
    add_todo_at(store, text, folder_id, chrono::Utc::now().timestamp_millis())
}

pub fn add_todo_at<S: KeyValueStore + ?Sized>(
    store: &mut S,
    text: &str,
    folder_id: &str,
    millis: i64,
) -> Result<Todo, StoreError> {
    let mut todos = get_todos(store);
    let folder_id = if folder_id.is_empty() { INBOX_ID } else { folder_id };
    let todo = Todo::new(next_id(&todos, millis), text, folder_id);
    todos.push(todo.clone());
    save_todos(store, &todos)?;
    Ok(todo)
}

/// Timestamp ids, bumped past the current maximum so two adds in the same
/// millisecond stay distinct.
fn next_id(todos: &[Todo], millis: i64) -> u64 {
    let now = u64::try_from(millis).unwrap_or(0);
    let max = todos.iter().map(|t| t.id).max().unwrap_or(0);
    now.max(max + 1)
}

/// Replace the stored todo with the same id. Returns false when none matched.
pub fn update_todo<S: KeyValueStore + ?Sized>(store: &mut S, todo: &Todo) -> Result<bool, StoreError> {
    let mut todos = get_todos(store);
    let Some(slot) = todos.iter_mut().find(|t| t.id == todo.id) else {
        return Ok(false);
    };
    *slot = todo.clone();
    save_todos(store, &todos)?;
    Ok(true)
}

pub fn delete_todo<S: KeyValueStore + ?Sized>(store: &mut S, id: u64) -> Result<Option<Todo>, StoreError> {
    let mut todos = get_todos(store);
    let Some(pos) = todos.iter().position(|t| t.id == id) else {
        return Ok(None);
    };
    let removed = todos.remove(pos);
    save_todos(store, &todos)?;
    Ok(Some(removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_store_has_no_todos() {
        assert!(get_todos(&MemoryStore::new()).is_empty());
    }

    #[test]
    fn backfills_on_read() {
        let store = MemoryStore::new().with(
            TODOS_KEY,
            r#"[{"id":1,"text":"a"},{"id":2,"text":"b","folderId":"","completed":true,"isExpanded":false}]"#,
        );
        let todos = get_todos(&store);
        assert_eq!(todos[0], Todo::new(1, "a", "inbox"));
        assert_eq!(todos[1].folder_id, "inbox");
        assert!(todos[1].completed);
        assert!(todos[1].tags.is_empty());
    }

    #[test]
    fn null_fields_are_backfilled_and_survive_the_next_write() {
        let mut store = MemoryStore::new().with(
            TODOS_KEY,
            r#"[{"id":1,"text":"keep me","tags":null,"folderId":"work"},
                {"id":2,"text":"me too","tags":["x",null],"folderId":null,"completed":null}]"#,
        );
        let todos = get_todos(&store);
        assert_eq!(todos.len(), 2);
        assert!(todos[0].tags.is_empty());
        assert_eq!(todos[1].tags, vec!["x".to_string()]);
        assert_eq!(todos[1].folder_id, "inbox");
        assert!(!todos[1].completed);

        add_todo_at(&mut store, "new", "inbox", 5).unwrap();
        let texts: Vec<String> = get_todos(&store).into_iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["keep me", "me too", "new"]);
    }

    #[test]
    fn broken_entry_is_skipped_alone() {
        let store = MemoryStore::new().with(
            TODOS_KEY,
            r#"[{"id":1,"text":"fine"},{"text":"no id"},"junk",{"id":3,"text":null}]"#,
        );
        let todos = get_todos(&store);
        assert_eq!(todos, vec![Todo::new(1, "fine", "inbox")]);
    }

    #[test]
    fn malformed_json_reads_as_empty() {
        let store = MemoryStore::new().with(TODOS_KEY, "[{");
        assert!(get_todos(&store).is_empty());
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut store = MemoryStore::new();
        let a = add_todo_at(&mut store, "a", "work", 1000).unwrap();
        let b = add_todo_at(&mut store, "b", "", 1000).unwrap();
        assert_eq!(a.id, 1000);
        assert_eq!(b.id, 1001);
        assert_eq!(b.folder_id, "inbox");
        assert_eq!(get_todos(&store).len(), 2);
    }

    #[test]
    fn update_and_delete() {
        let mut store = MemoryStore::new();
        let mut todo = add_todo_at(&mut store, "a", "inbox", 5).unwrap();
        todo.completed = true;
        assert!(update_todo(&mut store, &todo).unwrap());
        assert!(get_todos(&store)[0].completed);

        assert!(!update_todo(&mut store, &Todo::new(99, "x", "inbox")).unwrap());
        assert_eq!(delete_todo(&mut store, 5).unwrap(), Some(todo));
        assert_eq!(delete_todo(&mut store, 5).unwrap(), None);
        assert!(get_todos(&store).is_empty());
    }

    #[test]
    fn write_failure_surfaces() {
        let mut store = MemoryStore::new().reject_writes();
        assert!(add_todo_at(&mut store, "a", "inbox", 1).is_err());
    }
}

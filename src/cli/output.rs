use serde::Serialize;

use crate::model::folder::Folder;
use crate::model::todo::Todo;
use crate::ops::search::QuickFindResults;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct FolderJson {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub permanent: bool,
    pub todos: usize,
}

#[derive(Serialize)]
pub struct TodoJson {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub tags: Vec<String>,
    pub folder: String,
}

#[derive(Serialize)]
pub struct FindTodoJson {
    #[serde(flatten)]
    pub todo: TodoJson,
    pub folder_name: String,
}

#[derive(Serialize)]
pub struct FindJson {
    pub folders: Vec<FolderJson>,
    pub todos: Vec<FindTodoJson>,
}

pub fn folder_to_json(folder: &Folder, permanent: bool, todos: &[Todo]) -> FolderJson {
    FolderJson {
        id: folder.id.clone(),
        name: folder.name.clone(),
        icon: folder.icon.clone(),
        permanent,
        todos: todos.iter().filter(|t| t.folder_id == folder.id).count(),
    }
}

pub fn todo_to_json(todo: &Todo) -> TodoJson {
    TodoJson {
        id: todo.id,
        text: todo.text.clone(),
        completed: todo.completed,
        tags: todo.tags.clone(),
        folder: todo.folder_id.clone(),
    }
}

pub fn find_to_json<F>(results: &QuickFindResults<'_>, is_permanent: F, todos: &[Todo]) -> FindJson
where
    F: Fn(&str) -> bool,
{
    FindJson {
        folders: results
            .folders
            .iter()
            .map(|f| folder_to_json(f, is_permanent(&f.id), todos))
            .collect(),
        todos: results
            .todos
            .iter()
            .map(|hit| FindTodoJson {
                todo: todo_to_json(hit.todo),
                folder_name: hit.folder_name.to_string(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn tags_suffix(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!(
            " {}",
            tags.iter()
                .map(|t| format!("#{}", t))
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}

/// `[x] 1700000000000 Buy milk #errands`
pub fn format_todo_line(todo: &Todo) -> String {
    let check = if todo.completed { 'x' } else { ' ' };
    format!("[{}] {} {}{}", check, todo.id, todo.text, tags_suffix(&todo.tags))
}

/// Glyph, id, name and todo count; permanent folders get a trailing `*`
pub fn format_folder_line(folder: &Folder, permanent: bool, count: usize) -> String {
    let marker = if permanent { " *" } else { "" };
    format!(
        "{} {:<24} {} ({}){}",
        folder.glyph(),
        folder.id,
        folder.name,
        count,
        marker
    )
}

pub fn format_find_results(results: &QuickFindResults<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    if !results.folders.is_empty() {
        lines.push("Folders".to_string());
        for folder in &results.folders {
            lines.push(format!("  {} {} ({})", folder.glyph(), folder.name, folder.id));
        }
    }
    if !results.todos.is_empty() {
        lines.push("Todos".to_string());
        for hit in &results.todos {
            lines.push(format!("  {}  in {}", format_todo_line(hit.todo), hit.folder_name));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_line_shows_check_and_tags() {
        let mut todo = Todo::new(42, "Buy milk", "inbox");
        todo.completed = true;
        todo.tags = vec!["errands".into(), "home".into()];
        insta::assert_snapshot!(format_todo_line(&todo), @"[x] 42 Buy milk #errands #home");
    }

    #[test]
    fn folder_line_marks_permanent() {
        let folder = Folder::new("inbox", "Inbox", None);
        let line = format_folder_line(&folder, true, 3);
        assert!(line.starts_with("▸ inbox"));
        assert!(line.ends_with("Inbox (3) *"));
    }

    #[test]
    fn todo_json_uses_folder_key() {
        let json = serde_json::to_value(todo_to_json(&Todo::new(1, "a", "work"))).unwrap();
        assert_eq!(json["folder"], "work");
        assert_eq!(json["completed"], false);
    }
}

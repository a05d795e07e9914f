use serde::{Deserialize, Serialize};

use super::folder::INBOX_ID;

/// A single to-do item. Field names on disk are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_folder_id")]
    pub folder_id: String,
}

fn default_folder_id() -> String {
    INBOX_ID.to_string()
}

impl Todo {
    pub fn new(id: u64, text: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Todo {
            id,
            text: text.into(),
            completed: false,
            tags: Vec::new(),
            folder_id: folder_id.into(),
        }
    }

    /// Case-insensitive match on text or any tag. `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_are_backfilled() {
        let todo: Todo = serde_json::from_str(r#"{"id":1,"text":"milk","isEditing":true}"#).unwrap();
        assert_eq!(todo, Todo::new(1, "milk", "inbox"));
    }

    #[test]
    fn folder_id_is_camel_case_on_disk() {
        let json = serde_json::to_string(&Todo::new(7, "x", "work")).unwrap();
        assert!(json.contains(r#""folderId":"work""#));
    }

    #[test]
    fn matches_text_or_tag() {
        let mut todo = Todo::new(1, "Buy Milk", "inbox");
        todo.tags.push("Errands".into());
        assert!(todo.matches("milk"));
        assert!(todo.matches("errand"));
        assert!(!todo.matches("eggs"));
    }
}

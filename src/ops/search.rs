use std::ops::Range;

use regex::Regex;

use crate::model::folder::Folder;
use crate::model::todo::Todo;

pub const QUICK_FIND_FOLDER_LIMIT: usize = 5;
pub const QUICK_FIND_TODO_LIMIT: usize = 10;

/// Case-insensitive literal matcher for a search term. None for an empty term.
pub fn term_regex(term: &str) -> Option<Regex> {
    if term.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", regex::escape(term))).ok()
}

/// Collect all non-overlapping match byte-ranges for a regex in the given text.
pub fn find_matches(re: &Regex, text: &str) -> Vec<Range<usize>> {
    re.find_iter(text).map(|m| m.start()..m.end()).collect()
}

fn todo_matches(todo: &Todo, term: &str) -> bool {
    todo.matches(&term.to_lowercase())
}

/// What the main pane shows: the selected folder's todos, or matches from
/// every folder while a search term is set.
pub fn visible_todos<'a>(todos: &'a [Todo], selected_folder: &str, term: &str) -> Vec<&'a Todo> {
    if term.is_empty() {
        todos.iter().filter(|t| t.folder_id == selected_folder).collect()
    } else {
        todos.iter().filter(|t| todo_matches(t, term)).collect()
    }
}

/// Completion filter for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Done,
}

impl StatusFilter {
    fn admits(self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Open => !todo.completed,
            StatusFilter::Done => todo.completed,
        }
    }
}

/// Listing filter used by `lode list`.
pub fn filter_todos<'a>(
    todos: &'a [Todo],
    folder: Option<&str>,
    tag: Option<&str>,
    status: StatusFilter,
) -> Vec<&'a Todo> {
    todos
        .iter()
        .filter(|t| folder.is_none_or(|f| t.folder_id == f))
        .filter(|t| tag.is_none_or(|tag| t.has_tag(tag.trim_start_matches('#'))))
        .filter(|t| status.admits(t))
        .collect()
}

/// A todo found by quick find, with the name of the folder it lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoHit<'a> {
    pub todo: &'a Todo,
    pub folder_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuickFindResults<'a> {
    pub folders: Vec<&'a Folder>,
    pub todos: Vec<TodoHit<'a>>,
}

impl QuickFindResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.todos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.todos.len()
    }
}

/// Folders by name and todos by text or tag, capped per kind.
pub fn quick_find<'a>(folders: &'a [Folder], todos: &'a [Todo], term: &str) -> QuickFindResults<'a> {
    if term.is_empty() {
        return QuickFindResults::default();
    }
    let needle = term.to_lowercase();
    let folder_hits = folders
        .iter()
        .filter(|f| f.name.to_lowercase().contains(&needle))
        .take(QUICK_FIND_FOLDER_LIMIT)
        .collect();
    let todo_hits = todos
        .iter()
        .filter(|t| t.matches(&needle))
        .take(QUICK_FIND_TODO_LIMIT)
        .map(|todo| TodoHit {
            todo,
            folder_name: folders
                .iter()
                .find(|f| f.id == todo.folder_id)
                .map(|f| f.name.as_str())
                .unwrap_or("Unknown"),
        })
        .collect();
    QuickFindResults {
        folders: folder_hits,
        todos: todo_hits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::folder::default_folders;

    fn todos() -> Vec<Todo> {
        let mut milk = Todo::new(1, "Buy milk", "inbox");
        milk.tags.push("errands".into());
        let mut report = Todo::new(2, "Write report", "work");
        report.completed = true;
        let mut walk = Todo::new(3, "Walk", "life");
        walk.tags.push("Health".into());
        vec![milk, report, walk]
    }

    #[test]
    fn empty_term_shows_selected_folder() {
        let todos = todos();
        let visible = visible_todos(&todos, "work", "");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);
    }

    #[test]
    fn term_searches_every_folder() {
        let todos = todos();
        let ids: Vec<u64> = visible_todos(&todos, "work", "WAL").iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);
        let ids: Vec<u64> = visible_todos(&todos, "work", "health").iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn listing_filters_compose() {
        let todos = todos();
        assert_eq!(filter_todos(&todos, None, None, StatusFilter::Done).len(), 1);
        assert_eq!(filter_todos(&todos, None, Some("#errands"), StatusFilter::Open).len(), 1);
        assert_eq!(filter_todos(&todos, Some("life"), Some("errands"), StatusFilter::All).len(), 0);
    }

    #[test]
    fn quick_find_caps_and_annotates() {
        let folders = default_folders();
        let many: Vec<Todo> = (0..15).map(|i| Todo::new(i, format!("task {}", i), "today")).collect();
        let results = quick_find(&folders, &many, "task");
        assert_eq!(results.todos.len(), QUICK_FIND_TODO_LIMIT);
        assert_eq!(results.todos[0].folder_name, "Today");

        let results = quick_find(&folders, &many, "o");
        assert_eq!(results.folders.len(), QUICK_FIND_FOLDER_LIMIT);
        assert!(quick_find(&folders, &many, "").is_empty());
    }

    #[test]
    fn spans_are_case_insensitive_and_literal() {
        let re = term_regex("a.b").unwrap();
        assert_eq!(find_matches(&re, "xA.Bx axb"), vec![1..4]);
        assert!(term_regex("").is_none());
    }
}

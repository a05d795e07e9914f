use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, Focus, Mode};

use super::common::edit_text;

/// Live search: every edit re-filters the main pane.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        // Cancel search
        KeyCode::Esc => {
            app.search.clear();
            app.mode = Mode::Navigate;
        }
        // Keep the term and move into the results
        KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
            app.mode = Mode::Navigate;
            if app.is_searching() {
                app.focus = Focus::Todos;
            }
        }
        _ => {
            if edit_text(&mut app.search, key) {
                app.todo_cursor = 0;
                app.todo_scroll = 0;
            }
        }
    }
}

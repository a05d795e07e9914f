use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

use super::common::edit_text;

pub(super) fn handle_quick_find(app: &mut App, key: KeyEvent) {
    let count = app.quick_find_results().len();
    let Some(state) = app.quick_find.as_mut() else {
        return;
    };
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.close_quick_find(),
        (_, KeyCode::Enter) => app.quick_find_pick(),
        (_, KeyCode::Down) | (KeyModifiers::CONTROL, KeyCode::Char('n')) => {
            if state.cursor + 1 < count {
                state.cursor += 1;
            }
        }
        (_, KeyCode::Up) | (KeyModifiers::CONTROL, KeyCode::Char('p')) => {
            state.cursor = state.cursor.saturating_sub(1);
        }
        _ => {
            if edit_text(&mut state.input, key) {
                state.cursor = 0;
            }
        }
    }
}

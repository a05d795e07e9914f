use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::App;

use super::common::edit_text;

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => app.submit_input(),
        _ => {
            edit_text(&mut app.input, key);
        }
    }
}

mod common;
mod confirm;
mod mouse;
mod navigate;
mod prompt;
mod quick_find;
mod search;

use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};

use common::*;
use confirm::*;
use navigate::*;
use prompt::*;
use quick_find::*;
use search::*;

pub use mouse::handle_mouse;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.status_message = None;

    let key = normalize_key(key);
    match &app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Input(_) => handle_prompt(app, key),
        Mode::Confirm => handle_confirm(app, key),
        Mode::QuickFind => handle_quick_find(app, key),
    }
}

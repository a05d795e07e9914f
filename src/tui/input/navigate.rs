use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::motion::fab::FabAction;
use crate::tui::app::{App, Focus, InputKind, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    // Digits pick a menu action while the floating menu is open
    if app.interactions.fab().is_open()
        && let KeyCode::Char(c @ '1'..='3') = key.code
    {
        let action = FabAction::ALL[c as usize - '1' as usize];
        app.interactions.close_menu();
        app.run_fab_action(action);
        return;
    }

    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
            app.should_quit = true;
        }

        (KeyModifiers::CONTROL, KeyCode::Char('k')) => app.open_quick_find(),

        // Focus
        (_, KeyCode::Tab) => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Todos,
                Focus::Todos => Focus::Sidebar,
            };
        }
        (_, KeyCode::Char('h')) | (_, KeyCode::Left) => app.focus = Focus::Sidebar,
        (_, KeyCode::Char('l')) | (_, KeyCode::Right) => app.focus = Focus::Todos,

        // Cursor
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => move_cursor(app, 1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => move_cursor(app, -1),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => move_cursor(app, isize::MIN / 2),
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => move_cursor(app, isize::MAX / 2),

        (_, KeyCode::Enter) => match app.focus {
            Focus::Sidebar => app.focus = Focus::Todos,
            Focus::Todos => with_cursor_todo(app, |app, id| app.begin_input(InputKind::EditTodo(id))),
        },

        // Todo actions
        (_, KeyCode::Char(' ')) | (_, KeyCode::Char('x')) => {
            with_cursor_todo(app, |app, id| app.toggle_todo(id));
        }
        (_, KeyCode::Char('a')) | (_, KeyCode::Char('o')) => app.begin_input(InputKind::NewTodo),
        (_, KeyCode::Char('e')) => {
            with_cursor_todo(app, |app, id| app.begin_input(InputKind::EditTodo(id)));
        }
        (_, KeyCode::Char('t')) => {
            with_cursor_todo(app, |app, id| app.begin_input(InputKind::AddTag(id)));
        }
        (_, KeyCode::Char('T')) => {
            with_cursor_todo(app, |app, id| app.begin_input(InputKind::RemoveTag(id)));
        }
        (_, KeyCode::Char('m')) => {
            with_cursor_todo(app, |app, id| app.begin_input(InputKind::MoveTodo(id)));
        }

        // Folder actions
        (_, KeyCode::Char('N')) => app.begin_input(InputKind::NewFolder),
        (_, KeyCode::Char('r')) => {
            let id = app.selected_folder.clone();
            app.begin_input(InputKind::RenameFolder(id));
        }

        (_, KeyCode::Char('d')) => match app.focus {
            Focus::Sidebar => {
                let id = app.selected_folder.clone();
                app.request_delete_folder(&id);
            }
            Focus::Todos => with_cursor_todo(app, |app, id| app.request_delete_todo(id)),
        },

        // Search and menus
        (_, KeyCode::Char('/')) => app.mode = Mode::Search,
        (_, KeyCode::Char('f')) => app.open_quick_find(),
        (_, KeyCode::Char('+')) => app.interactions.toggle_menu(),

        // Sidebar width
        (_, KeyCode::Char('<')) => app.resize_sidebar(-1),
        (_, KeyCode::Char('>')) => app.resize_sidebar(1),

        (_, KeyCode::Esc) => {
            if app.interactions.fab().is_open() {
                app.interactions.close_menu();
            } else if app.interactions.close_swipe().is_none() {
                app.search.clear();
            }
        }
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    match app.focus {
        Focus::Sidebar => app.move_sidebar_cursor(delta),
        Focus::Todos => app.move_todo_cursor(delta),
    }
}

/// Run `f` on the todo under the cursor, if the todo pane has one.
fn with_cursor_todo(app: &mut App, f: impl FnOnce(&mut App, u64)) {
    if let Some(id) = app.cursor_todo_id() {
        f(app, id);
    }
}

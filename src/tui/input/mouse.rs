use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::motion::arbiter::Press;
use crate::tui::app::{App, Focus, Mode};

/// Feed a terminal mouse event through the interaction core.
///
/// Everything the sidebar and the floating menu react to goes through
/// [`Interactions`](crate::motion::arbiter::Interactions); only presses the
/// core does not claim fall through to the todo list.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Blocking popups ignore the pointer
    if matches!(app.mode, Mode::Confirm | Mode::QuickFind) {
        return;
    }
    let point = app.layout.pointer(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(intent) = app.interactions.pointer_moved(point, &app.layout) {
                app.apply_intent(intent);
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            match app.mode {
                Mode::Search => app.mode = Mode::Navigate,
                Mode::Input(_) => app.cancel_input(),
                _ => {}
            }
            let press = app.interactions.pointer_down(point, &app.layout);
            if press.is_consumed() {
                return;
            }
            if let Press::Target(None) = press
                && let Some((id, on_checkbox)) = app.layout.todo_at(mouse.column, mouse.row)
            {
                app.focus = Focus::Todos;
                if let Some(pos) = app.visible_todos().iter().position(|t| t.id == id) {
                    app.todo_cursor = pos;
                }
                if on_checkbox {
                    app.toggle_todo(id);
                }
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let release = app.interactions.pointer_up(point, &app.layout);
            if let Some(swipe) = &release.swipe {
                tracing::debug!(row = %swipe.row, state = ?swipe.state, "swipe settled");
            }
            for intent in release.intents {
                app.apply_intent(intent);
            }
        }
        MouseEventKind::ScrollDown => app.move_todo_cursor(1),
        MouseEventKind::ScrollUp => app.move_todo_cursor(-1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    use crate::io::store::MemoryStore;
    use crate::io::todo_store::add_todo_at;
    use crate::model::config::AppConfig;
    use crate::motion::fab::FabAction;
    use crate::tui::app::{App, InputKind, Mode};
    use crate::tui::input::{handle_key, handle_mouse};
    use crate::tui::render::test_helpers::draw_app;

    fn mouse(app: &mut App, kind: MouseEventKind, column: u16, row: u16) {
        handle_mouse(
            app,
            MouseEvent {
                kind,
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    fn click(app: &mut App, column: u16, row: u16) {
        mouse(app, MouseEventKind::Down(MouseButton::Left), column, row);
        mouse(app, MouseEventKind::Up(MouseButton::Left), column, row);
    }

    fn app() -> App {
        let mut store = MemoryStore::new();
        add_todo_at(&mut store, "Buy milk", "inbox", 1).unwrap();
        add_todo_at(&mut store, "Write report", "work", 2).unwrap();
        let mut app = App::new(Box::new(store), AppConfig::default(), None);
        draw_app(&mut app);
        app
    }

    /// Drag the row at `row` from column 20 to column 8 and let go.
    fn swipe_open(app: &mut App, row: u16) {
        mouse(app, MouseEventKind::Down(MouseButton::Left), 20, row);
        mouse(app, MouseEventKind::Drag(MouseButton::Left), 14, row);
        mouse(app, MouseEventKind::Drag(MouseButton::Left), 8, row);
        mouse(app, MouseEventKind::Up(MouseButton::Left), 8, row);
        draw_app(app);
    }

    fn row_of(app: &App, id: &str) -> u16 {
        app.layout.folder_row(id).unwrap().y
    }

    #[test]
    fn clicking_a_row_selects_it() {
        let mut app = app();
        let work = row_of(&app, "work");
        click(&mut app, 5, work);
        assert_eq!(app.selected_folder, "work");
        assert_eq!(app.visible_todos().len(), 1);
    }

    #[test]
    fn swipe_reveals_delete_without_selecting() {
        let mut app = app();
        let work = row_of(&app, "work");
        swipe_open(&mut app, work);
        assert_eq!(app.selected_folder, "inbox");
        assert_eq!(app.interactions.swipe().open_row().map(String::as_str), Some("work"));
        assert!(app.layout.delete_panel("work").is_some());
    }

    #[test]
    fn delete_panel_asks_then_deletes() {
        let mut app = app();
        let work = row_of(&app, "work");
        swipe_open(&mut app, work);
        let panel = app.layout.delete_panel("work").unwrap();
        click(&mut app, panel.x + 1, work);
        assert_eq!(app.mode, Mode::Confirm);

        handle_key(&mut app, KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE));
        assert!(app.folder("work").is_none());
        assert!(app.interactions.swipe().open_row().is_none());
        assert_eq!(app.todos.len(), 1);
    }

    #[test]
    fn declining_leaves_row_open() {
        let mut app = app();
        let work = row_of(&app, "work");
        swipe_open(&mut app, work);
        let panel = app.layout.delete_panel("work").unwrap();
        click(&mut app, panel.x + 1, work);
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE));
        assert!(app.folder("work").is_some());
        assert_eq!(app.interactions.swipe().open_row().map(String::as_str), Some("work"));
    }

    #[test]
    fn permanent_rows_do_not_swipe() {
        let mut app = app();
        let inbox = row_of(&app, "inbox");
        swipe_open(&mut app, inbox);
        assert!(app.interactions.swipe().open_row().is_none());
        assert!(app.layout.delete_panels.is_empty());
    }

    #[test]
    fn clicking_elsewhere_closes_open_row() {
        let mut app = app();
        let work = row_of(&app, "work");
        swipe_open(&mut app, work);
        click(&mut app, 50, 3);
        assert!(app.interactions.swipe().open_row().is_none());
    }

    #[test]
    fn fab_opens_and_runs_action() {
        let mut app = app();
        let button = app.layout.fab_button;
        click(&mut app, button.x + 1, button.y + 1);
        assert!(app.interactions.fab().is_open());
        draw_app(&mut app);

        let (_, rect) = app
            .layout
            .fab_actions
            .iter()
            .find(|(a, _)| *a == FabAction::NewTodo)
            .copied()
            .unwrap();
        click(&mut app, rect.x + 2, rect.y);
        assert!(!app.interactions.fab().is_open());
        assert_eq!(app.mode, Mode::Input(InputKind::NewTodo));
    }

    #[test]
    fn divider_drag_resizes_sidebar() {
        let mut app = app();
        let divider = app.layout.divider;
        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), divider.x, 3);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), divider.x + 6, 3);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), divider.x + 6, 3);
        assert_eq!(app.sidebar_columns(), 32);
        draw_app(&mut app);
        assert_eq!(app.layout.divider.x, 32);
    }

    #[test]
    fn checkbox_click_toggles_todo() {
        let mut app = app();
        let (_, rect) = app.layout.todo_rows[0];
        click(&mut app, rect.x + 2, rect.y);
        assert!(app.todos.iter().find(|t| t.id == 1).unwrap().completed);
    }

    #[test]
    fn search_box_click_focuses_search() {
        let mut app = app();
        let search = app.layout.search_box;
        click(&mut app, search.x + 3, search.y + 1);
        assert_eq!(app.mode, Mode::Search);
    }

    #[test]
    fn leaving_a_row_engages_its_magnet() {
        let mut app = app();
        let work = row_of(&app, "work");
        mouse(&mut app, MouseEventKind::Moved, 4, work);
        mouse(&mut app, MouseEventKind::Moved, 4, work + 1);
        assert!(app.interactions.is_animating());
        app.interactions.frame_tick(&app.layout);
        assert!(!app.interactions.folder_offset("work").is_zero());

        // Out of range: the pull fades to nothing
        mouse(&mut app, MouseEventKind::Moved, 60, 20);
        app.interactions.frame_tick(&app.layout);
        assert!(app.interactions.folder_offset("work").is_zero());
    }
}

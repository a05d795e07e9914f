use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::io::todo_store::add_todo_at;
use crate::model::config::AppConfig;
use crate::ops::todo_ops;
use crate::tui::app::App;
use crate::tui::input::handle_mouse;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Draw the whole screen at the standard test size. Also refreshes
/// `app.layout`, which mouse handling reads.
pub fn draw_app(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _| super::render(frame, app))
}

/// Seeded folders plus a few todos:
/// inbox "Buy milk" #errands, work "Write report" #q3 and a completed
/// "Plan offsite", life "Walk the dog".
pub fn sample_app() -> App {
    let mut store = MemoryStore::new();
    add_todo_at(&mut store, "Buy milk", "inbox", 1).unwrap();
    add_todo_at(&mut store, "Write report", "work", 2).unwrap();
    add_todo_at(&mut store, "Plan offsite", "work", 3).unwrap();
    add_todo_at(&mut store, "Walk the dog", "life", 4).unwrap();
    todo_ops::add_tag(&mut store, 1, "errands").unwrap();
    todo_ops::add_tag(&mut store, 2, "q3").unwrap();
    todo_ops::toggle_todo(&mut store, 3).unwrap();
    App::new(Box::new(store), AppConfig::default(), None)
}

/// Swipe a folder row open with the pointer, then redraw.
pub fn open_row(app: &mut App, id: &str) {
    draw_app(app);
    let row = app.layout.folder_row(id).unwrap().y;
    let events = [
        (MouseEventKind::Down(MouseButton::Left), 20),
        (MouseEventKind::Drag(MouseButton::Left), 14),
        (MouseEventKind::Drag(MouseButton::Left), 8),
        (MouseEventKind::Up(MouseButton::Left), 8),
    ];
    for (kind, column) in events {
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
    draw_app(app);
}

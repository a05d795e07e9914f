use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Focus, Mode};
use crate::util::unicode::display_width;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    if area.area() == 0 {
        return;
    }
    let bg = app.theme.background;
    let width = area.width as usize;

    let (mut spans, hint) = match &app.mode {
        Mode::Input(kind) => {
            let prompt = format!(" {}: ", kind.prompt());
            let cursor_x = area.x + (display_width(&prompt) + app.input.cursor_col()) as u16;
            if cursor_x < area.right() {
                frame.set_cursor_position((cursor_x, area.y));
            }
            (
                vec![
                    Span::styled(prompt, Style::default().fg(app.theme.highlight).bg(bg)),
                    Span::styled(
                        app.input.buffer.clone(),
                        Style::default().fg(app.theme.text_bright).bg(bg),
                    ),
                ],
                "Enter save  Esc cancel",
            )
        }
        Mode::Search => (Vec::new(), "Enter keep  Esc clear"),
        Mode::Confirm => (Vec::new(), "y confirm  n cancel"),
        Mode::QuickFind => (Vec::new(), "↑↓ choose  Enter go  Esc close"),
        Mode::Navigate => {
            let hint = if !app.config.ui.show_key_hints {
                ""
            } else if app.interactions.fab().is_open() {
                "1-3 run action  Esc close"
            } else {
                match app.focus {
                    Focus::Sidebar => "a add  N new list  r rename  d delete  / search  f find",
                    Focus::Todos => "a add  x toggle  e edit  t tag  m move  d delete",
                }
            };
            (Vec::new(), hint)
        }
    };

    // A flash message replaces whatever the mode would show on the left
    if let Some(message) = &app.status_message
        && !matches!(app.mode, Mode::Input(_))
    {
        spans = vec![Span::styled(
            format!(" {}", message),
            Style::default().fg(app.theme.yellow).bg(bg),
        )];
    }

    let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let hint_width = display_width(hint) + 1;
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(
            format!("{} ", hint),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::motion::arbiter::Target;
use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::nudge;

/// The floating action button and, while open, its stacked actions
pub fn render_fab(frame: &mut Frame, app: &App) {
    let layout = &app.layout;
    if layout.fab_button.width < 3 || layout.fab_button.height < 3 {
        return;
    }
    let fab = app.interactions.fab();
    let bg = app.theme.background;

    for (action, slot) in &layout.fab_actions {
        let rect = nudge(*slot, fab.action_offset(*action), &layout.cells, layout.main);
        let active = fab.active_action() == Some(*action);
        let style = if active {
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text_bright).bg(app.theme.selection_bg)
        };
        let label = format!(" {} {}", action.glyph(), action.label());
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(truncate_to_width(&label, rect.width as usize)).style(style),
            rect,
        );
    }

    let button = nudge(layout.fab_button, fab.container_offset(), &layout.cells, layout.main);
    let hovered = app.interactions.hovered() == Some(&Target::FabButton);
    let border = if fab.is_open() || hovered {
        app.theme.highlight
    } else {
        app.theme.text
    };
    frame.render_widget(Clear, button);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border).bg(bg))
            .style(Style::default().bg(bg)),
        button,
    );

    // The toggle glyph moves inside the button on its own magnet
    let inner = Rect::new(button.x + 1, button.y + 1, button.width.saturating_sub(2), 1);
    let center = Rect::new(button.x + button.width / 2, button.y + button.height / 2, 1, 1);
    let glyph_cell = nudge(center, fab.toggle_offset(), &layout.cells, inner);
    let glyph = if fab.is_open() { "×" } else { "+" };
    frame.render_widget(
        Paragraph::new(glyph).style(
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        glyph_cell,
    );
}

#[cfg(test)]
mod tests {
    use crate::tui::render::test_helpers::*;

    #[test]
    fn closed_button_shows_plus() {
        let mut app = sample_app();
        let out = draw_app(&mut app);
        let row = app.layout.fab_button.y as usize + 1;
        assert!(out.lines().nth(row).unwrap().trim_end().ends_with("│ + │"));
        assert!(!out.contains("New to-do"));
    }

    #[test]
    fn open_menu_lists_actions() {
        let mut app = sample_app();
        app.interactions.open_menu();
        let out = draw_app(&mut app);
        assert!(out.contains("New to-do"));
        assert!(out.contains("New list"));
        assert!(out.contains("Quick find"));
        let row = app.layout.fab_button.y as usize + 1;
        assert!(out.lines().nth(row).unwrap().contains("│ × │"));
    }
}

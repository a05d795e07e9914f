use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::motion::arbiter::Target;
use crate::tui::app::{App, Focus, Mode};
use crate::util::unicode::{display_col_to_byte_offset, display_width, truncate_to_width};

use super::nudge;

/// Header, search box, folder rows and their delete panels
pub fn render_sidebar(frame: &mut Frame, app: &App) {
    let sidebar = app.layout.sidebar;
    if sidebar.width < 4 || sidebar.height == 0 {
        return;
    }
    let bg = app.theme.background;

    let title = Line::from(vec![
        Span::styled(" ◆ ", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            "lodestone",
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), Rect::new(sidebar.x, sidebar.y, sidebar.width, 1));

    render_search_box(frame, app);

    for rule in &app.layout.rules {
        let text = "─".repeat(rule.width as usize);
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(app.theme.dim).bg(bg)),
            *rule,
        );
    }

    for slot in &app.layout.folder_rows {
        render_folder_row(frame, app, &slot.id, slot.rect);
    }
}

fn render_search_box(frame: &mut Frame, app: &App) {
    let layout = &app.layout;
    if layout.search_box.area() == 0 {
        return;
    }
    let rect = nudge(
        layout.search_box,
        app.interactions.search_offset(),
        &layout.cells,
        layout.sidebar,
    );
    let bg = app.theme.background;
    let focused = app.mode == Mode::Search;
    let hovered = app.interactions.hovered() == Some(&Target::SearchBox);
    let border = if focused {
        app.theme.highlight
    } else if hovered {
        app.theme.text
    } else {
        app.theme.dim
    };

    let inner_w = rect.width.saturating_sub(4) as usize;
    let content = if app.search.buffer.is_empty() && !focused {
        Span::styled(
            truncate_to_width("Search…", inner_w),
            Style::default().fg(app.theme.dim).bg(bg),
        )
    } else {
        Span::styled(
            truncate_to_width(&app.search.buffer, inner_w),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )
    };
    let line = Line::from(vec![
        Span::styled("⌕ ", Style::default().fg(border).bg(bg)),
        content,
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(line).block(block), rect);

    if focused {
        let col = app.search.cursor_col().min(inner_w) as u16;
        frame.set_cursor_position((rect.x + 3 + col, rect.y + 1));
    }
}

fn render_folder_row(frame: &mut Frame, app: &App, id: &str, slot: Rect) {
    let Some(folder) = app.folder(id) else {
        return;
    };
    let layout = &app.layout;
    let bg = app.theme.background;
    let selected = app.selected_folder == id && !app.is_searching();
    let hovered = app.interactions.hovered().and_then(Target::row_id).map(String::as_str) == Some(id);

    let row_bg = if selected { app.theme.selection_bg } else { bg };
    let fg = if selected || hovered {
        app.theme.text_bright
    } else {
        app.theme.text
    };
    let mut style = Style::default().fg(fg).bg(row_bg);
    if selected && app.focus == Focus::Sidebar {
        style = style.add_modifier(Modifier::BOLD);
    }

    // Full-width content: glyph and name on the left, open count on the right
    let width = slot.width as usize;
    let count = app.todo_count(id);
    let right = if count > 0 { format!("{} ", count) } else { String::new() };
    let left = truncate_to_width(
        &format!(" {} {}", folder.glyph(), folder.name),
        width.saturating_sub(display_width(&right)),
    );
    let pad = width.saturating_sub(display_width(&left) + display_width(&right));
    let content = format!("{}{}{}", left, " ".repeat(pad), right);

    // Swiped rows slide left; the panel fills the space they leave behind
    let revealed = layout.delete_panel(id).map_or(0, |r| r.width);
    let rect = nudge(slot, app.interactions.folder_offset(id), &layout.cells, layout.sidebar);
    let visible_w = rect.width.saturating_sub(revealed);
    let shown = &content[display_col_to_byte_offset(&content, revealed as usize)..];
    frame.render_widget(
        Paragraph::new(truncate_to_width(shown, visible_w as usize)).style(style),
        Rect::new(rect.x, rect.y, visible_w, 1),
    );

    if let Some(panel) = layout.delete_panel(id) {
        let label = if panel.width >= 8 { " Delete" } else { " ✕" };
        frame.render_widget(
            Paragraph::new(truncate_to_width(label, panel.width as usize)).style(
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.delete_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            panel,
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::tui::render::test_helpers::*;

    #[test]
    fn sidebar_lists_sections_with_counts() {
        let mut app = sample_app();
        let out = draw_app(&mut app);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].contains("◆ lodestone"));
        assert!(lines[2].contains("⌕ Search…"));
        assert!(lines[5].contains("Inbox"));
        assert!(lines[5][..lines[5].find('│').unwrap()].trim_end().ends_with('1'));
        assert!(lines[10].contains("────"));
        assert!(lines[14].contains("work"));
    }

    #[test]
    fn open_row_shows_delete_panel() {
        let mut app = sample_app();
        draw_app(&mut app);
        open_row(&mut app, "work");
        let out = draw_app(&mut app);
        let work_line = out.lines().nth(14).unwrap();
        assert!(work_line.contains("Delete"));
    }
}

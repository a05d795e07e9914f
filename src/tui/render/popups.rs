use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

/// Blocking yes/no question over the whole screen
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(confirm) = &app.confirm else {
        return;
    };
    let popup_w: u16 = 44.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);

    let mut lines = vec![
        Line::from(Span::styled(format!(" {}", confirm.title), header_style)),
        Line::from(""),
    ];
    for s in wrap_text(" ", &confirm.message, inner_w) {
        lines.push(Line::from(Span::styled(s, text_style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" y", Style::default().fg(app.theme.red).bg(bg).add_modifier(Modifier::BOLD)),
        Span::styled(" delete   ", text_style),
        Span::styled("n", Style::default().fg(app.theme.text_bright).bg(bg).add_modifier(Modifier::BOLD)),
        Span::styled(" cancel", text_style),
    ]));

    // Dynamic height from content + 2 for borders
    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);
}

/// Folders and todos matching the quick-find term
pub fn render_quick_find(frame: &mut Frame, app: &App, area: Rect) {
    let Some(state) = &app.quick_find else {
        return;
    };
    let popup_w: u16 = 56.min(area.width.saturating_sub(2));
    let inner_w = popup_w.saturating_sub(2) as usize;
    let bg = app.theme.background;
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);
    let section_style = Style::default()
        .fg(app.theme.highlight)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let selected_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(app.theme.selection_bg);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" ⌕ ", Style::default().fg(app.theme.highlight).bg(bg)),
            Span::styled(
                state.input.buffer.clone(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
        ]),
        Line::from(Span::styled("─".repeat(inner_w), dim_style)),
    ];

    let results = app.quick_find_results();
    if state.input.buffer.is_empty() {
        lines.push(Line::from(Span::styled(
            " Type to search lists, to-dos and #tags",
            dim_style,
        )));
    } else if results.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate_to_width(
                &format!(" No results for \u{201c}{}\u{201d}", state.input.buffer),
                inner_w,
            ),
            dim_style,
        )));
    } else {
        let mut index = 0;
        if !results.folders.is_empty() {
            lines.push(Line::from(Span::styled(" Lists", section_style)));
            for folder in &results.folders {
                let label = format!("   {} {}", folder.glyph(), folder.name);
                let style = if index == state.cursor { selected_style } else { text_style };
                lines.push(Line::from(Span::styled(pad_to(&label, inner_w), style)));
                index += 1;
            }
        }
        if !results.todos.is_empty() {
            lines.push(Line::from(Span::styled(" To-dos", section_style)));
            for hit in &results.todos {
                let check = if hit.todo.completed { "[x]" } else { "[ ]" };
                let label = format!("   {} {}  · {}", check, hit.todo.text, hit.folder_name);
                let style = if index == state.cursor { selected_style } else { text_style };
                lines.push(Line::from(Span::styled(pad_to(&label, inner_w), style)));
                index += 1;
            }
        }
    }

    let popup_h = ((lines.len() as u16) + 2).min(area.height.saturating_sub(2));
    let mut overlay_area = centered_rect_fixed(popup_w, popup_h, area);
    // Anchor near the top so the box does not jump while results change
    overlay_area.y = area.y + area.height.saturating_sub(popup_h).min(3);
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(" Quick find ", section_style))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), overlay_area);

    let col = state.input.cursor_col() as u16;
    let cursor_x = overlay_area.x + 4 + col;
    if cursor_x < overlay_area.right().saturating_sub(1) {
        frame.set_cursor_position((cursor_x, overlay_area.y + 1));
    }
}

fn pad_to(text: &str, width: usize) -> String {
    let text = truncate_to_width(text, width);
    let pad = width.saturating_sub(crate::util::unicode::display_width(&text));
    format!("{}{}", text, " ".repeat(pad))
}

/// Word-wrap `text` into lines of at most `max_width` columns.
/// Every line (including the first) is prefixed with `indent`.
fn wrap_text(indent: &str, text: &str, max_width: usize) -> Vec<String> {
    let indent_len = indent.len();
    let mut lines = Vec::new();
    let mut current = indent.to_string();

    for word in text.split_whitespace() {
        let space = if current.len() == indent_len { 0 } else { 1 };
        if current.len() + space + word.len() > max_width && current.len() > indent_len {
            lines.push(current);
            current = format!("{}{}", indent, word);
        } else {
            if space == 1 {
                current.push(' ');
            }
            current.push_str(word);
        }
    }
    if current.len() > indent_len {
        lines.push(current);
    }
    lines
}

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

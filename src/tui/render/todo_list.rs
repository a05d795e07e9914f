use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::todo::Todo;
use crate::ops::search::term_regex;
use crate::tui::app::{App, Focus};
use crate::util::unicode::{display_width, truncate_to_width};

use super::push_highlighted_spans;

/// Header with the folder (or search term), then one row per visible todo
pub fn render_todo_list(frame: &mut Frame, app: &App) {
    let main = app.layout.main;
    if main.width < 4 || main.height < 2 {
        return;
    }
    let bg = app.theme.background;
    let todos = app.visible_todos();

    // Header
    let title = if app.is_searching() {
        format!(" Search: \u{201c}{}\u{201d}", app.search.buffer)
    } else {
        app.folder(&app.selected_folder)
            .map(|f| format!(" {} {}", f.glyph(), f.name))
            .unwrap_or_default()
    };
    let done = todos.iter().filter(|t| t.completed).count();
    let summary = format!("{} open · {} done ", todos.len() - done, done);
    let width = main.width as usize;
    let title = truncate_to_width(&title, width.saturating_sub(display_width(&summary) + 1));
    let pad = width.saturating_sub(display_width(&title) + display_width(&summary));
    let header = Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ".repeat(pad), Style::default().bg(bg)),
        Span::styled(summary, Style::default().fg(app.theme.dim).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(header), Rect::new(main.x, main.y, main.width, 1));
    frame.render_widget(
        Paragraph::new("─".repeat(width)).style(Style::default().fg(app.theme.dim).bg(bg)),
        Rect::new(main.x, main.y + 1, main.width, 1),
    );

    if todos.is_empty() {
        let message = if app.is_searching() {
            format!(" No results for \u{201c}{}\u{201d}", app.search.buffer)
        } else {
            " Nothing here yet. Press a to add a to-do.".to_string()
        };
        let list = app.layout.todo_list;
        frame.render_widget(
            Paragraph::new(truncate_to_width(&message, width))
                .style(Style::default().fg(app.theme.dim).bg(bg)),
            Rect::new(list.x, list.y, list.width, 1.min(list.height)),
        );
        return;
    }

    let search_re = term_regex(&app.search.buffer);
    for (id, rect) in &app.layout.todo_rows {
        let Some((index, todo)) = todos.iter().enumerate().find(|(_, t)| t.id == *id) else {
            continue;
        };
        let is_cursor = index == app.todo_cursor && app.focus == Focus::Todos;
        let line = todo_line(app, todo, is_cursor, search_re.as_ref(), width);
        frame.render_widget(Paragraph::new(line), *rect);
    }
}

fn todo_line<'a>(
    app: &App,
    todo: &Todo,
    is_cursor: bool,
    search_re: Option<&regex::Regex>,
    width: usize,
) -> Line<'a> {
    let row_bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let mut text_style = Style::default().fg(app.theme.text).bg(row_bg);
    if todo.completed {
        text_style = text_style
            .fg(app.theme.dim)
            .add_modifier(Modifier::CROSSED_OUT);
    } else if is_cursor {
        text_style = text_style.fg(app.theme.text_bright);
    }
    let match_style = Style::default()
        .fg(app.theme.search_match_fg)
        .bg(app.theme.search_match_bg);

    let check = if todo.completed { "[x]" } else { "[ ]" };
    let check_color = if todo.completed {
        app.theme.green
    } else {
        app.theme.dim
    };
    let mut spans = vec![
        Span::styled(
            if is_cursor { "▎" } else { " " },
            Style::default().fg(app.theme.selection_border).bg(row_bg),
        ),
        Span::styled(check, Style::default().fg(check_color).bg(row_bg)),
        Span::styled(" ", Style::default().bg(row_bg)),
    ];

    let mut used = 5;
    let text = truncate_to_width(&todo.text, width.saturating_sub(used + 1));
    used += display_width(&text);
    push_highlighted_spans(&mut spans, &text, text_style, match_style, search_re);

    for tag in &todo.tags {
        let label = format!(" #{}", tag);
        if used + display_width(&label) > width {
            break;
        }
        used += display_width(&label);
        push_highlighted_spans(
            &mut spans,
            &label,
            Style::default().fg(app.theme.tag).bg(row_bg),
            match_style,
            search_re,
        );
    }

    // Search results span folders, so say where each one lives
    if app.is_searching() {
        let folder = app
            .folder(&todo.folder_id)
            .map_or("Unknown", |f| f.name.as_str());
        let label = format!("  · {}", folder);
        if used + display_width(&label) <= width {
            used += display_width(&label);
            spans.push(Span::styled(label, Style::default().fg(app.theme.dim).bg(row_bg)));
        }
    }

    spans.push(Span::styled(
        " ".repeat(width.saturating_sub(used)),
        Style::default().bg(row_bg),
    ));
    Line::from(spans)
}

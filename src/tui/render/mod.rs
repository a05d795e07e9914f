pub mod fab;
pub mod popups;
pub mod sidebar;
pub mod status_row;
pub mod todo_list;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph};
use regex::Regex;

use crate::model::config::CellMetrics;
use crate::motion::arbiter::Target;
use crate::motion::geometry::Offset;
use crate::ops::folder_ops;

use super::app::{App, Mode};
use super::layout::{LayoutInput, ScreenLayout};

/// Main render function: lays out the frame, then dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Todo rows: body minus header, rule and status row
    app.scroll_to_cursor(area.height.saturating_sub(3) as usize);
    app.layout = compute_layout(app, area);

    sidebar::render_sidebar(frame, app);
    render_divider(frame, app);
    todo_list::render_todo_list(frame, app);
    fab::render_fab(frame, app);
    status_row::render_status_row(frame, app, app.layout.status);

    // Popups (rendered on top of everything)
    match app.mode {
        Mode::Confirm => popups::render_confirm_popup(frame, app, area),
        Mode::QuickFind => popups::render_quick_find(frame, app, area),
        _ => {}
    }
}

fn compute_layout(app: &App, area: Rect) -> ScreenLayout {
    let cells = app.config.cells;
    let sections: Vec<Vec<&str>> = folder_ops::sidebar_sections(&app.folders)
        .into_iter()
        .map(|(_, members)| members.into_iter().map(|f| f.id.as_str()).collect())
        .collect();
    let revealed = app
        .folders
        .iter()
        .filter_map(|f| {
            let cols = -cells.px_to_columns(app.interactions.row_swipe_offset(&f.id));
            (cols > 0).then_some((f.id.as_str(), cols as u16))
        })
        .collect();
    let input = LayoutInput {
        sidebar_width: app.sidebar_columns(),
        sections,
        revealed,
        todo_ids: app.visible_todos().iter().map(|t| t.id).collect(),
        todo_scroll: app.todo_scroll,
        fab_open: app.interactions.fab().is_open(),
    };
    ScreenLayout::compute(area, cells, &input)
}

fn render_divider(frame: &mut Frame, app: &App) {
    let divider = app.layout.divider;
    if divider.area() == 0 {
        return;
    }
    let color = if app.interactions.hovered() == Some(&Target::Divider) {
        app.theme.highlight
    } else {
        app.theme.dim
    };
    let lines: Vec<_> = (0..divider.height).map(|_| "│").collect();
    frame.render_widget(
        Paragraph::new(lines.join("\n")).style(Style::default().fg(color).bg(app.theme.background)),
        divider,
    );
}

/// Shift a cell rect by a pixel offset (rounded to whole cells), keeping it
/// inside `bounds`.
pub(super) fn nudge(rect: Rect, offset: Offset, cells: &CellMetrics, bounds: Rect) -> Rect {
    let dx = cells.px_to_columns(offset.dx);
    let dy = cells.px_to_rows(offset.dy);
    let min_x = i32::from(bounds.x);
    let min_y = i32::from(bounds.y);
    let max_x = (i32::from(bounds.right()) - i32::from(rect.width)).max(min_x);
    let max_y = (i32::from(bounds.bottom()) - i32::from(rect.height)).max(min_y);
    let x = (i32::from(rect.x) + dx).clamp(min_x, max_x);
    let y = (i32::from(rect.y) + dy).clamp(min_y, max_y);
    Rect::new(x as u16, y as u16, rect.width, rect.height).intersection(bounds)
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let re = match search_re {
        Some(r) => r,
        None => {
            spans.push(Span::styled(text.to_string(), base_style));
            return;
        }
    };

    let mut last_end = 0;
    for range in crate::ops::search::find_matches(re, text) {
        if range.start > last_end {
            spans.push(Span::styled(text[last_end..range.start].to_string(), base_style));
        }
        spans.push(Span::styled(text[range.clone()].to_string(), highlight_style));
        last_end = range.end;
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

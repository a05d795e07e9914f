//! Cell geometry of one rendered frame.
//!
//! The layout is recomputed on every draw and kept on the [`App`] so that
//! pointer events arriving before the next draw hit-test against what is
//! actually on screen. Rects are stored in cells and converted to logical
//! pixels (through [`CellMetrics`]) when the interaction core asks.
//!
//! [`App`]: super::app::App

use ratatui::layout::Rect;

use crate::model::config::CellMetrics;
use crate::motion::arbiter::{Surface, Target};
use crate::motion::fab::FabAction;
use crate::motion::geometry::{Point, Rect as PxRect};

/// Width of the floating action button, in cells
pub const FAB_WIDTH: u16 = 5;
/// Height of the floating action button, in cells
pub const FAB_HEIGHT: u16 = 3;
/// Width of one action in the open menu, in cells
pub const FAB_ACTION_WIDTH: u16 = 16;

/// A folder id and the cells its row occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSlot {
    pub id: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    pub cells: CellMetrics,
    pub area: Rect,
    pub sidebar: Rect,
    pub divider: Rect,
    pub main: Rect,
    pub status: Rect,
    pub search_box: Rect,
    pub folder_rows: Vec<FolderSlot>,
    /// Section separators between folder groups
    pub rules: Vec<Rect>,
    /// Delete panels of rows that are currently swiped open (or dragging)
    pub delete_panels: Vec<FolderSlot>,
    pub todo_list: Rect,
    pub todo_rows: Vec<(u64, Rect)>,
    pub fab_button: Rect,
    /// Present only while the menu is open
    pub fab_actions: Vec<(FabAction, Rect)>,
}

/// What the layout needs to know about the app state.
pub struct LayoutInput<'a> {
    pub sidebar_width: u16,
    /// Folder ids grouped by sidebar section, in display order
    pub sections: Vec<Vec<&'a str>>,
    /// Revealed width of each swiped row, in cells
    pub revealed: Vec<(&'a str, u16)>,
    pub todo_ids: Vec<u64>,
    pub todo_scroll: usize,
    pub fab_open: bool,
}

impl ScreenLayout {
    pub fn compute(area: Rect, cells: CellMetrics, input: &LayoutInput<'_>) -> ScreenLayout {
        let status = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1.min(area.height));
        let body_h = area.height.saturating_sub(1);

        let sidebar_w = input.sidebar_width.min(area.width.saturating_sub(1));
        let sidebar = Rect::new(area.x, area.y, sidebar_w, body_h);
        let divider = Rect::new(sidebar.right(), area.y, 1.min(area.width - sidebar_w), body_h);
        let main = Rect::new(
            divider.right(),
            area.y,
            area.width.saturating_sub(sidebar_w + divider.width),
            body_h,
        );

        let inner_w = sidebar.width.saturating_sub(2);
        let search_box = clip(Rect::new(sidebar.x + 1, sidebar.y + 1, inner_w, 3), sidebar);

        let mut folder_rows = Vec::new();
        let mut rules = Vec::new();
        let mut y = sidebar.y + 5;
        for (i, section) in input.sections.iter().enumerate() {
            if i > 0 {
                if y >= sidebar.bottom() {
                    break;
                }
                rules.push(Rect::new(sidebar.x + 1, y, inner_w, 1));
                y += 1;
            }
            for id in section {
                if y >= sidebar.bottom() {
                    break;
                }
                folder_rows.push(FolderSlot {
                    id: id.to_string(),
                    rect: Rect::new(sidebar.x + 1, y, inner_w, 1),
                });
                y += 1;
            }
        }

        let delete_panels = folder_rows
            .iter()
            .filter_map(|slot| {
                let width = input
                    .revealed
                    .iter()
                    .find(|(id, _)| *id == slot.id)
                    .map(|(_, w)| (*w).min(slot.rect.width))?;
                (width > 0).then(|| FolderSlot {
                    id: slot.id.clone(),
                    rect: Rect::new(slot.rect.right() - width, slot.rect.y, width, 1),
                })
            })
            .collect();

        let todo_list = Rect::new(
            main.x,
            main.y + 2.min(main.height),
            main.width,
            main.height.saturating_sub(2),
        );
        let todo_rows = input
            .todo_ids
            .iter()
            .skip(input.todo_scroll)
            .take(todo_list.height as usize)
            .enumerate()
            .map(|(i, id)| (*id, Rect::new(todo_list.x, todo_list.y + i as u16, todo_list.width, 1)))
            .collect();

        let fab_button = clip(
            Rect::new(
                main.right().saturating_sub(FAB_WIDTH + 2),
                main.bottom().saturating_sub(FAB_HEIGHT + 1),
                FAB_WIDTH,
                FAB_HEIGHT,
            ),
            main,
        );
        let fab_actions = if input.fab_open {
            FabAction::ALL
                .iter()
                .enumerate()
                .filter_map(|(i, action)| {
                    let y = fab_button.y.checked_sub(2 * (i as u16 + 1))?;
                    let x = fab_button.right().saturating_sub(FAB_ACTION_WIDTH).max(main.x);
                    Some((*action, clip(Rect::new(x, y, FAB_ACTION_WIDTH, 1), main)))
                })
                .collect()
        } else {
            Vec::new()
        };

        ScreenLayout {
            cells,
            area,
            sidebar,
            divider,
            main,
            status,
            search_box,
            folder_rows,
            rules,
            delete_panels,
            todo_list,
            todo_rows,
            fab_button,
            fab_actions,
        }
    }

    /// Logical pixel rect of a cell rect.
    pub fn to_px(&self, rect: Rect) -> PxRect {
        let cw = self.cells.cell_width;
        let ch = self.cells.cell_height;
        PxRect::new(
            f64::from(rect.x) * cw,
            f64::from(rect.y) * ch,
            f64::from(rect.right()) * cw,
            f64::from(rect.bottom()) * ch,
        )
    }

    /// Pointer position for a terminal mouse event.
    pub fn pointer(&self, column: u16, row: u16) -> Point {
        let (x, y) = self.cells.cell_center(column, row);
        Point::new(x, y)
    }

    pub fn folder_row(&self, id: &str) -> Option<Rect> {
        self.folder_rows.iter().find(|s| s.id == id).map(|s| s.rect)
    }

    pub fn delete_panel(&self, id: &str) -> Option<Rect> {
        self.delete_panels.iter().find(|s| s.id == id).map(|s| s.rect)
    }

    /// The single cell holding the toggle glyph.
    pub fn fab_toggle(&self) -> Rect {
        let b = self.fab_button;
        Rect::new(b.x + b.width / 2, b.y + b.height / 2, 1.min(b.width), 1.min(b.height))
    }

    /// Todo row under a cell, and whether the cell is on its checkbox.
    pub fn todo_at(&self, column: u16, row: u16) -> Option<(u64, bool)> {
        self.todo_rows
            .iter()
            .find(|(_, r)| contains(*r, column, row))
            .map(|(id, r)| (*id, column < r.x + 5))
    }
}

impl Surface for ScreenLayout {
    fn rect(&self, target: &Target) -> Option<PxRect> {
        let cells = match target {
            Target::FabButton => Some(self.fab_button),
            Target::FabToggle => Some(self.fab_toggle()),
            Target::FabAction(action) => self
                .fab_actions
                .iter()
                .find(|(a, _)| a == action)
                .map(|(_, r)| *r),
            Target::SearchBox => Some(self.search_box),
            Target::FolderRow(id) => self.folder_row(id),
            Target::FolderDelete(id) => self.delete_panel(id),
            Target::Divider => Some(self.divider),
        };
        cells.filter(|r| r.area() > 0).map(|r| self.to_px(r))
    }

    fn hit_test(&self, point: Point) -> Option<Target> {
        let hit = |r: &Rect| r.area() > 0 && self.to_px(*r).contains(point);

        if let Some((action, _)) = self.fab_actions.iter().find(|(_, r)| hit(r)) {
            return Some(Target::FabAction(*action));
        }
        if hit(&self.fab_button) {
            return Some(Target::FabButton);
        }
        if let Some(slot) = self.delete_panels.iter().find(|s| hit(&s.rect)) {
            return Some(Target::FolderDelete(slot.id.clone()));
        }
        if let Some(slot) = self.folder_rows.iter().find(|s| hit(&s.rect)) {
            return Some(Target::FolderRow(slot.id.clone()));
        }
        if hit(&self.search_box) {
            return Some(Target::SearchBox);
        }
        if hit(&self.divider) {
            return Some(Target::Divider);
        }
        None
    }
}

fn clip(rect: Rect, bounds: Rect) -> Rect {
    rect.intersection(bounds)
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

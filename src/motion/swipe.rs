//! Horizontal swipe-to-reveal for sidebar rows.
//!
//! Rows are dragged left to expose a delete panel `reveal_width` wide.
//! Only one row can be mid-drag, and at rest at most one row is open.
//! Starting a drag elsewhere, or clicking outside the open row, snaps the
//! open row closed.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Per-row swipe state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowState {
    #[default]
    Idle,
    Dragging,
    SnappedOpen,
    SnappedClosed,
}

#[derive(Debug, Clone, Copy, Default)]
struct RowEntry {
    state: RowState,
    offset: f64,
}

#[derive(Debug, Clone)]
struct ActiveDrag<K> {
    row: K,
    start_x: f64,
    initial_offset: f64,
}

/// Result of a pointer-down that started a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragStarted<K> {
    pub row: K,
    /// A previously open (or orphaned mid-drag) row that was snapped shut first.
    pub closed: Option<K>,
}

/// Resolution of a drag at pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeRelease<K> {
    pub row: K,
    pub state: RowState,
    pub offset: f64,
}

/// Swipe controller shared by all rows of the sidebar.
#[derive(Debug, Clone)]
pub struct SwipeController<K> {
    reveal_width: f64,
    permanent: HashSet<K>,
    rows: HashMap<K, RowEntry>,
    active: Option<ActiveDrag<K>>,
    open_row: Option<K>,
}

impl<K> SwipeController<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new(reveal_width: f64) -> Self {
        SwipeController {
            reveal_width,
            permanent: HashSet::new(),
            rows: HashMap::new(),
            active: None,
            open_row: None,
        }
    }

    pub fn with_permanent<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        self.permanent.extend(rows);
        self
    }

    pub fn reveal_width(&self) -> f64 {
        self.reveal_width
    }

    /// Offset past which a release snaps open.
    pub fn threshold(&self) -> f64 {
        self.reveal_width / 2.0
    }

    pub fn is_permanent(&self, row: &K) -> bool {
        self.permanent.contains(row)
    }

    // -----------------------------------------------------------------------
    // Drag lifecycle
    // -----------------------------------------------------------------------

    /// Pointer-down on a row's draggable content.
    ///
    /// Returns `None` for permanent rows, which never swipe.
    pub fn begin_drag(&mut self, row: &K, x: f64) -> Option<DragStarted<K>> {
        if self.is_permanent(row) {
            return None;
        }

        let mut closed = None;
        if let Some(orphan) = self.active.take()
            && orphan.row != *row
        {
            self.snap_closed(&orphan.row);
            closed = Some(orphan.row);
        }
        if let Some(open) = self.open_row.clone()
            && open != *row
        {
            self.snap_closed(&open);
            closed = Some(open);
        }

        let entry = self.rows.entry(row.clone()).or_default();
        let initial_offset = entry.offset;
        entry.state = RowState::Dragging;
        self.active = Some(ActiveDrag {
            row: row.clone(),
            start_x: x,
            initial_offset,
        });
        tracing::debug!(row = ?row, initial_offset, "swipe drag started");

        Some(DragStarted {
            row: row.clone(),
            closed,
        })
    }

    /// Pointer-move while the button is held. Returns the row's new offset.
    pub fn drag_to(&mut self, x: f64) -> Option<f64> {
        let drag = self.active.as_ref()?;
        let offset = (drag.initial_offset + (x - drag.start_x)).clamp(-self.reveal_width, 0.0);
        let entry = self.rows.entry(drag.row.clone()).or_default();
        entry.offset = offset;
        Some(offset)
    }

    /// Pointer-up: snap fully open or fully closed.
    pub fn release(&mut self) -> Option<SwipeRelease<K>> {
        let drag = self.active.take()?;
        let current = self.offset(&drag.row);

        let (state, offset) = if current < -self.threshold() {
            (RowState::SnappedOpen, -self.reveal_width)
        } else {
            (RowState::SnappedClosed, 0.0)
        };

        let entry = self.rows.entry(drag.row.clone()).or_default();
        entry.state = state;
        entry.offset = offset;

        match state {
            RowState::SnappedOpen => self.open_row = Some(drag.row.clone()),
            _ => {
                if self.open_row.as_ref() == Some(&drag.row) {
                    self.open_row = None;
                }
            }
        }
        tracing::debug!(row = ?drag.row, ?state, "swipe released");

        Some(SwipeRelease {
            row: drag.row,
            state,
            offset,
        })
    }

    // -----------------------------------------------------------------------
    // Closing and selection
    // -----------------------------------------------------------------------

    /// Global click-capture: close the open row unless the click is on it.
    pub fn click_outside(&mut self, clicked_row: Option<&K>) -> Option<K> {
        let open = self.open_row.clone()?;
        if clicked_row == Some(&open) {
            return None;
        }
        self.snap_closed(&open);
        Some(open)
    }

    /// Click-to-select on a row's content.
    ///
    /// Honored only when the row sits exactly at offset 0; a click on a
    /// shifted row belongs to the swipe interaction.
    pub fn try_select(&mut self, row: &K) -> bool {
        if self.offset(row) != 0.0 {
            return false;
        }
        if self.open_row.as_ref() == Some(row) {
            self.snap_closed(row);
        }
        true
    }

    /// Snap the open row shut, if there is one.
    pub fn close_open(&mut self) -> Option<K> {
        let open = self.open_row.clone()?;
        self.snap_closed(&open);
        Some(open)
    }

    /// Drop all state for a row that no longer exists.
    pub fn forget(&mut self, row: &K) {
        self.rows.remove(row);
        if self.open_row.as_ref() == Some(row) {
            self.open_row = None;
        }
        if self.active.as_ref().is_some_and(|d| d.row == *row) {
            self.active = None;
        }
    }

    fn snap_closed(&mut self, row: &K) {
        let entry = self.rows.entry(row.clone()).or_default();
        entry.state = RowState::SnappedClosed;
        entry.offset = 0.0;
        if self.open_row.as_ref() == Some(row) {
            self.open_row = None;
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn offset(&self, row: &K) -> f64 {
        self.rows.get(row).map_or(0.0, |e| e.offset)
    }

    pub fn state(&self, row: &K) -> RowState {
        self.rows.get(row).map_or(RowState::Idle, |e| e.state)
    }

    pub fn open_row(&self) -> Option<&K> {
        self.open_row.as_ref()
    }

    pub fn active_row(&self) -> Option<&K> {
        self.active.as_ref().map(|d| &d.row)
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }
}

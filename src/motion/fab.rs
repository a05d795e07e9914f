//! Floating action button and its fanned-out sub-actions.
//!
//! Three magnetic categories live here. The container is magnetic only
//! while the menu is closed; the toggle icon and every sub-action are
//! magnetic only while it is open. Opening or closing the menu swaps those
//! scopes synchronously, so no engagement survives the transition.

use std::fmt;

use super::geometry::Offset;
use super::magnetic::MagneticController;
use super::proximity::MagnetTuning;

/// Quick-capture actions revealed when the menu opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FabAction {
    NewTodo,
    NewList,
    QuickFind,
}

impl FabAction {
    /// Display order, nearest the button first.
    pub const ALL: [FabAction; 3] = [FabAction::NewTodo, FabAction::NewList, FabAction::QuickFind];

    pub fn label(self) -> &'static str {
        match self {
            FabAction::NewTodo => "New to-do",
            FabAction::NewList => "New list",
            FabAction::QuickFind => "Quick find",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            FabAction::NewTodo => "✎",
            FabAction::NewList => "▤",
            FabAction::QuickFind => "⌕",
        }
    }
}

impl fmt::Display for FabAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tuning for the three FAB categories.
#[derive(Debug, Clone, Copy)]
pub struct FabTuning {
    pub container: MagnetTuning,
    pub action: MagnetTuning,
    pub toggle: MagnetTuning,
}

/// Menu state plus the magnetic controllers it scopes.
#[derive(Debug, Clone)]
pub struct FabMenu {
    open: bool,
    pub(crate) container: MagneticController<()>,
    pub(crate) toggle: MagneticController<()>,
    pub(crate) actions: MagneticController<FabAction>,
    active_action: Option<FabAction>,
}

impl FabMenu {
    pub fn new(tuning: FabTuning) -> Self {
        let mut toggle = MagneticController::single("fab_toggle", tuning.toggle);
        toggle.suppress();
        let mut actions = MagneticController::new("fab_action", tuning.action);
        for action in FabAction::ALL {
            actions.mount(action);
        }
        actions.suppress();

        FabMenu {
            open: false,
            container: MagneticController::single("fab", tuning.container),
            toggle,
            actions,
            active_action: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the menu. The container's own magnet is shut off and zeroed.
    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.open = true;
        self.container.suppress();
        self.toggle.resume();
        self.actions.resume();
        tracing::debug!("fab menu opened");
    }

    /// Close the menu, resetting every offset the menu owns.
    pub fn close(&mut self) {
        self.open = false;
        self.toggle.suppress();
        self.actions.suppress();
        self.active_action = None;
        self.container.reset_all();
        self.container.resume();
        tracing::debug!("fab menu closed");
    }

    pub fn toggle_open(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    /// Pointer is over a sub-action.
    pub fn hover_action(&mut self, action: FabAction) {
        if self.open {
            self.active_action = Some(action);
        }
    }

    pub fn unhover_action(&mut self, action: FabAction) {
        if self.active_action == Some(action) {
            self.active_action = None;
        }
    }

    /// Run a sub-action: the menu closes and the action is handed back.
    pub fn activate(&mut self, action: FabAction) -> Option<FabAction> {
        if !self.open {
            return None;
        }
        self.close();
        Some(action)
    }

    pub fn active_action(&self) -> Option<FabAction> {
        self.active_action
    }

    pub fn container_offset(&self) -> Offset {
        self.container.offset(&())
    }

    pub fn toggle_offset(&self) -> Offset {
        self.toggle.offset(&())
    }

    pub fn action_offset(&self, action: FabAction) -> Offset {
        self.actions.offset(&action)
    }

    pub fn is_subscribed(&self) -> bool {
        self.container.is_subscribed() || self.toggle.is_subscribed() || self.actions.is_subscribed()
    }

    pub fn any_pending(&self) -> bool {
        self.container.any_pending() || self.toggle.any_pending() || self.actions.any_pending()
    }
}

//! Precedence between hover, drag and click.
//!
//! [`Interactions`] owns every controller of the sidebar and the floating
//! action menu and is the only thing the UI feeds pointer events into. It
//! synthesizes enter/leave transitions from hit tests, routes moves to the
//! active drag (or else to the magnets), and turns press/release pairs into
//! clicks with these rules:
//!
//! - A press that starts a swipe or a resize is consumed; the caller must
//!   not also treat it as the start of an edit or a toggle.
//! - While a drag is active no magnet receives pointer samples.
//! - A click first closes any open swipe row it did not land on, and only
//!   then is dispatched to its target.
//! - Selection of a row happens only when that row sits at offset 0.

use std::collections::HashSet;

use super::fab::{FabAction, FabMenu, FabTuning};
use super::geometry::{Offset, Point, Rect};
use super::magnetic::MagneticController;
use super::proximity::MagnetTuning;
use super::resize::SidebarResize;
use super::swipe::{DragStarted, SwipeController, SwipeRelease};

/// Every interactive region the interaction core knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// The floating action button (container and toggle icon share it).
    FabButton,
    /// The toggle icon inside the button; used for rect lookup only.
    FabToggle,
    FabAction(FabAction),
    SearchBox,
    /// A sidebar folder row; its content is the swipe handle.
    FolderRow(String),
    /// The delete panel revealed behind a swiped row.
    FolderDelete(String),
    /// The one-cell divider between sidebar and main pane.
    Divider,
}

impl Target {
    /// The folder row this target belongs to, if any.
    pub fn row_id(&self) -> Option<&String> {
        match self {
            Target::FolderRow(id) | Target::FolderDelete(id) => Some(id),
            _ => None,
        }
    }

    /// Collapse sub-regions onto the element that owns hover.
    fn hover_owner(self) -> Target {
        match self {
            Target::FolderDelete(id) => Target::FolderRow(id),
            Target::FabToggle => Target::FabButton,
            other => other,
        }
    }
}

/// Live layout as seen by the interaction core.
///
/// Rectangles are read on demand every time they are needed and never
/// cached across ticks.
pub trait Surface {
    fn rect(&self, target: &Target) -> Option<Rect>;
    fn hit_test(&self, point: Point) -> Option<Target>;
}

/// What a pointer-down turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum Press {
    Swipe(DragStarted<String>),
    Resize,
    Target(Option<Target>),
}

impl Press {
    /// True when the gesture belongs to a drag and must not start anything else.
    pub fn is_consumed(&self) -> bool {
        matches!(self, Press::Swipe(_) | Press::Resize)
    }
}

/// Application-level consequences of pointer input.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SelectFolder(String),
    /// Ask the user before deleting; declining leaves the row open.
    ConfirmDelete(String),
    RunAction(FabAction),
    FocusSearch,
    SidebarResized(f64),
}

/// Outcome of a pointer-up.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Release {
    pub swipe: Option<SwipeRelease<String>>,
    pub intents: Vec<Intent>,
}

/// Tuning for every controller the arbiter owns.
#[derive(Debug, Clone)]
pub struct InteractionConfig {
    pub folder: MagnetTuning,
    pub search: MagnetTuning,
    pub fab: FabTuning,
    pub reveal_width: f64,
    pub permanent: Vec<String>,
    pub sidebar_width: f64,
    pub sidebar_min: f64,
    pub sidebar_max: f64,
}

/// The interaction arbiter.
#[derive(Debug, Clone)]
pub struct Interactions {
    folders: MagneticController<String>,
    search: MagneticController<()>,
    fab: FabMenu,
    swipe: SwipeController<String>,
    resize: SidebarResize,
    hovered: Option<Target>,
    pressed: Option<Target>,
    known_rows: HashSet<String>,
}

impl Interactions {
    pub fn new(config: InteractionConfig) -> Self {
        Interactions {
            folders: MagneticController::exclusive("folder", config.folder),
            search: MagneticController::single("search", config.search),
            fab: FabMenu::new(config.fab),
            swipe: SwipeController::new(config.reveal_width).with_permanent(config.permanent),
            resize: SidebarResize::new(
                config.sidebar_width,
                config.sidebar_min,
                config.sidebar_max,
            ),
            hovered: None,
            pressed: None,
            known_rows: HashSet::new(),
        }
    }

    /// Mount the current folder rows and drop state for vanished ones.
    pub fn sync_folders<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        let ids: HashSet<String> = ids.into_iter().collect();
        for gone in self.known_rows.difference(&ids) {
            self.swipe.forget(gone);
        }
        if self
            .hovered
            .as_ref()
            .and_then(Target::row_id)
            .is_some_and(|id| !ids.contains(id))
        {
            self.hovered = None;
        }
        self.folders.sync(ids.iter().cloned());
        self.known_rows = ids;
    }

    // -----------------------------------------------------------------------
    // Pointer input
    // -----------------------------------------------------------------------

    /// A pointer sample anywhere in the viewport.
    pub fn pointer_moved<S: Surface>(&mut self, point: Point, surface: &S) -> Option<Intent> {
        if self.resize.is_active() {
            return self.resize.drag_to(point.x).map(Intent::SidebarResized);
        }
        if self.swipe.is_dragging() {
            self.swipe.drag_to(point.x);
            return None;
        }

        let hit = surface.hit_test(point).map(Target::hover_owner);
        if hit != self.hovered {
            if let Some(old) = self.hovered.take() {
                self.leave(&old);
            }
            if let Some(new) = &hit {
                self.enter(new);
            }
            self.hovered = hit;
        }

        self.folders
            .pointer_moved(point, |id| surface.rect(&Target::FolderRow(id.clone())));
        self.search
            .pointer_moved(point, |_| surface.rect(&Target::SearchBox));
        self.fab
            .container
            .pointer_moved(point, |_| surface.rect(&Target::FabButton));
        self.fab
            .toggle
            .pointer_moved(point, |_| surface.rect(&Target::FabToggle));
        self.fab
            .actions
            .pointer_moved(point, |a| surface.rect(&Target::FabAction(*a)));
        None
    }

    pub fn pointer_down<S: Surface>(&mut self, point: Point, surface: &S) -> Press {
        let hit = surface.hit_test(point);
        self.pressed = hit.clone();

        match &hit {
            Some(Target::Divider) => {
                self.resize.begin(point.x);
                Press::Resize
            }
            Some(Target::FolderRow(id)) => match self.swipe.begin_drag(id, point.x) {
                Some(started) => {
                    self.folders.reset_all();
                    Press::Swipe(started)
                }
                None => Press::Target(hit),
            },
            _ => Press::Target(hit),
        }
    }

    /// Pointer-up: finish any drag, then fire a click if the press and the
    /// release landed on the same target.
    pub fn pointer_up<S: Surface>(&mut self, point: Point, surface: &S) -> Release {
        let mut release = Release::default();
        let pressed = self.pressed.take();

        if let Some(width) = self.resize.end() {
            release.intents.push(Intent::SidebarResized(width));
            return release;
        }
        release.swipe = self.swipe.release();

        let hit = surface.hit_test(point);
        if hit == pressed {
            release.intents.extend(self.click(hit));
        }
        release
    }

    fn click(&mut self, hit: Option<Target>) -> Option<Intent> {
        if let Some(closed) = self.swipe.click_outside(hit.as_ref().and_then(Target::row_id)) {
            tracing::debug!(row = %closed, "swiped row closed by outside click");
        }
        let on_fab = matches!(
            hit,
            Some(Target::FabButton | Target::FabToggle | Target::FabAction(_))
        );
        if self.fab.is_open() && !on_fab {
            self.fab.close();
        }

        match hit? {
            Target::FolderRow(id) => self
                .swipe
                .try_select(&id)
                .then_some(Intent::SelectFolder(id)),
            Target::FolderDelete(id) => Some(Intent::ConfirmDelete(id)),
            Target::FabButton | Target::FabToggle => {
                self.fab.toggle_open();
                None
            }
            Target::FabAction(action) => self.fab.activate(action).map(Intent::RunAction),
            Target::SearchBox => Some(Intent::FocusSearch),
            Target::Divider => None,
        }
    }

    fn enter(&mut self, target: &Target) {
        match target {
            Target::FolderRow(id) => self.folders.pointer_enter(id),
            Target::SearchBox => self.search.pointer_enter(&()),
            Target::FabButton => {
                self.fab.container.pointer_enter(&());
                self.fab.toggle.pointer_enter(&());
            }
            Target::FabAction(action) => {
                self.fab.actions.pointer_enter(action);
                self.fab.hover_action(*action);
            }
            _ => {}
        }
    }

    fn leave(&mut self, target: &Target) {
        match target {
            Target::FolderRow(id) => self.folders.pointer_leave(id),
            Target::SearchBox => self.search.pointer_leave(&()),
            Target::FabButton => {
                self.fab.container.pointer_leave(&());
                self.fab.toggle.pointer_leave(&());
            }
            Target::FabAction(action) => {
                self.fab.actions.pointer_leave(action);
                self.fab.unhover_action(*action);
            }
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Ticks and direct commands
    // -----------------------------------------------------------------------

    /// Display refresh: apply every pending magnetic update.
    pub fn frame_tick<S: Surface>(&mut self, surface: &S) -> bool {
        let mut changed = self
            .folders
            .on_frame(|id| surface.rect(&Target::FolderRow(id.clone())));
        changed |= self.search.on_frame(|_| surface.rect(&Target::SearchBox));
        changed |= self
            .fab
            .container
            .on_frame(|_| surface.rect(&Target::FabButton));
        changed |= self.fab.toggle.on_frame(|_| surface.rect(&Target::FabToggle));
        changed |= self
            .fab
            .actions
            .on_frame(|a| surface.rect(&Target::FabAction(*a)));
        changed
    }

    /// True while anything needs the fast tick: an engaged magnet, a pending
    /// update, or a drag in progress.
    pub fn is_animating(&self) -> bool {
        self.swipe.is_dragging()
            || self.resize.is_active()
            || self.folders.is_subscribed()
            || self.folders.any_pending()
            || self.search.is_subscribed()
            || self.search.any_pending()
            || self.fab.is_subscribed()
            || self.fab.any_pending()
    }

    pub fn open_menu(&mut self) {
        self.fab.open();
    }

    pub fn close_menu(&mut self) {
        self.fab.close();
    }

    pub fn toggle_menu(&mut self) {
        self.fab.toggle_open();
    }

    /// Close the open swipe row, e.g. on keyboard navigation.
    pub fn close_swipe(&mut self) -> Option<String> {
        self.swipe.close_open()
    }

    /// Select a row from the keyboard, following the same offset rule as a click.
    pub fn select_row(&mut self, id: &str) -> bool {
        let id = id.to_string();
        self.swipe.click_outside(Some(&id));
        self.swipe.try_select(&id)
    }

    pub fn set_sidebar_width(&mut self, width: f64) {
        self.resize.set_width(width);
    }

    // -----------------------------------------------------------------------
    // Render-side queries
    // -----------------------------------------------------------------------

    pub fn folder_offset(&self, id: &str) -> Offset {
        self.folders.offset(&id.to_string())
    }

    pub fn row_swipe_offset(&self, id: &str) -> f64 {
        self.swipe.offset(&id.to_string())
    }

    pub fn search_offset(&self) -> Offset {
        self.search.offset(&())
    }

    pub fn fab(&self) -> &FabMenu {
        &self.fab
    }

    pub fn swipe(&self) -> &SwipeController<String> {
        &self.swipe
    }

    pub fn folders(&self) -> &MagneticController<String> {
        &self.folders
    }

    pub fn sidebar_width(&self) -> f64 {
        self.resize.width()
    }

    pub fn hovered(&self) -> Option<&Target> {
        self.hovered.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::magnetic::Engagement;
    use crate::motion::swipe::RowState;

    /// Fixed layout: two rows, a search box, a divider and the FAB.
    struct FakeSurface {
        regions: Vec<(Target, Rect)>,
    }

    impl FakeSurface {
        fn new() -> Self {
            let tuning_rows = vec![
                (Target::SearchBox, Rect::new(0.0, 0.0, 200.0, 30.0)),
                (Target::FolderRow("inbox".into()), Rect::new(0.0, 40.0, 200.0, 70.0)),
                (Target::FolderRow("work".into()), Rect::new(0.0, 80.0, 200.0, 110.0)),
                (Target::FolderRow("life".into()), Rect::new(0.0, 120.0, 200.0, 150.0)),
                (Target::Divider, Rect::new(200.0, 0.0, 208.0, 600.0)),
                (Target::FabButton, Rect::new(700.0, 500.0, 740.0, 540.0)),
                (Target::FabToggle, Rect::new(710.0, 510.0, 730.0, 530.0)),
                (Target::FabAction(FabAction::NewTodo), Rect::new(700.0, 450.0, 740.0, 480.0)),
                (Target::FabAction(FabAction::NewList), Rect::new(700.0, 400.0, 740.0, 430.0)),
                (Target::FabAction(FabAction::QuickFind), Rect::new(700.0, 350.0, 740.0, 380.0)),
            ];
            FakeSurface {
                regions: tuning_rows,
            }
        }

        fn with_delete_panel(mut self, id: &str) -> Self {
            self.regions.insert(
                0,
                (Target::FolderDelete(id.into()), Rect::new(125.0, 80.0, 200.0, 110.0)),
            );
            self
        }
    }

    impl Surface for FakeSurface {
        fn rect(&self, target: &Target) -> Option<Rect> {
            self.regions
                .iter()
                .find(|(t, _)| t == target)
                .map(|(_, r)| *r)
        }

        fn hit_test(&self, point: Point) -> Option<Target> {
            self.regions
                .iter()
                .find(|(t, r)| *t != Target::FabToggle && r.contains(point))
                .map(|(t, _)| t.clone())
        }
    }

    fn tuning() -> MagnetTuning {
        MagnetTuning::new(60.0, 4.0, 0.08, 15.0)
    }

    fn interactions() -> Interactions {
        let t = tuning();
        let mut i = Interactions::new(InteractionConfig {
            folder: t,
            search: t,
            fab: FabTuning {
                container: t,
                action: t,
                toggle: t,
            },
            reveal_width: 75.0,
            permanent: vec!["inbox".into()],
            sidebar_width: 200.0,
            sidebar_min: 144.0,
            sidebar_max: 384.0,
        });
        i.sync_folders(["inbox", "work", "life"].map(String::from));
        i
    }

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn leaving_a_row_engages_its_magnet() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_moved(p(100.0, 95.0), &surface);
        assert_eq!(i.hovered(), Some(&Target::FolderRow("work".into())));
        assert_eq!(i.folders().engagement(&"work".to_string()), Engagement::Disengaged);

        i.pointer_moved(p(230.0, 95.0), &surface);
        assert_eq!(i.folders().engagement(&"work".to_string()), Engagement::Engaged);
        assert!(i.is_animating());
        i.frame_tick(&surface);
        assert!(i.folder_offset("work").dx > 0.0);

        // Back over the row: pinned to zero on that sample
        i.pointer_moved(p(150.0, 95.0), &surface);
        assert_eq!(i.folder_offset("work"), Offset::ZERO);
        assert_eq!(i.folders().engagement(&"work".to_string()), Engagement::Disengaged);
    }

    #[test]
    fn swipe_press_is_consumed_and_suppresses_magnets() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_moved(p(100.0, 130.0), &surface);
        i.pointer_moved(p(100.0, 95.0), &surface);
        // "life" is engaged now that the pointer left it
        assert_eq!(i.folders().engagement(&"life".to_string()), Engagement::Engaged);

        let press = i.pointer_down(p(100.0, 95.0), &surface);
        assert!(press.is_consumed());
        assert!(!i.folders().is_subscribed());

        i.pointer_moved(p(60.0, 95.0), &surface);
        assert!(!i.folders().any_pending());
        assert_eq!(i.row_swipe_offset("work"), -40.0);
    }

    #[test]
    fn completed_swipe_does_not_select() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_down(p(150.0, 95.0), &surface);
        i.pointer_moved(p(100.0, 95.0), &surface);
        let release = i.pointer_up(p(100.0, 95.0), &surface);

        let swipe = release.swipe.unwrap();
        assert_eq!(swipe.state, RowState::SnappedOpen);
        assert_eq!(i.row_swipe_offset("work"), -75.0);
        assert!(release.intents.is_empty());
    }

    #[test]
    fn plain_click_selects() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_down(p(150.0, 95.0), &surface);
        let release = i.pointer_up(p(150.0, 95.0), &surface);
        assert_eq!(release.intents, vec![Intent::SelectFolder("work".into())]);
    }

    #[test]
    fn permanent_row_press_is_not_consumed() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        let press = i.pointer_down(p(150.0, 55.0), &surface);
        assert_eq!(press, Press::Target(Some(Target::FolderRow("inbox".into()))));
        assert!(!press.is_consumed());
        let release = i.pointer_up(p(150.0, 55.0), &surface);
        assert_eq!(release.intents, vec![Intent::SelectFolder("inbox".into())]);
    }

    #[test]
    fn click_on_open_row_dismisses_without_selecting() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_down(p(150.0, 95.0), &surface);
        i.pointer_moved(p(60.0, 95.0), &surface);
        i.pointer_up(p(60.0, 95.0), &surface);

        // Click on the content of the open row
        i.pointer_down(p(50.0, 95.0), &surface);
        let release = i.pointer_up(p(50.0, 95.0), &surface);
        assert!(release.intents.is_empty());
        assert_eq!(i.swipe().open_row(), Some(&"work".to_string()));
    }

    #[test]
    fn clicking_another_row_closes_open_one_and_selects() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_down(p(150.0, 95.0), &surface);
        i.pointer_moved(p(60.0, 95.0), &surface);
        i.pointer_up(p(60.0, 95.0), &surface);

        i.pointer_down(p(150.0, 135.0), &surface);
        assert_eq!(i.row_swipe_offset("work"), 0.0);
        let release = i.pointer_up(p(150.0, 135.0), &surface);
        assert_eq!(release.intents, vec![Intent::SelectFolder("life".into())]);
        assert_eq!(i.swipe().open_row(), None);
    }

    #[test]
    fn click_elsewhere_closes_open_row() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_down(p(150.0, 95.0), &surface);
        i.pointer_moved(p(60.0, 95.0), &surface);
        i.pointer_up(p(60.0, 95.0), &surface);

        i.pointer_down(p(400.0, 300.0), &surface);
        let release = i.pointer_up(p(400.0, 300.0), &surface);
        assert!(release.intents.is_empty());
        assert_eq!(i.row_swipe_offset("work"), 0.0);
    }

    #[test]
    fn delete_panel_asks_for_confirmation_and_keeps_row_open() {
        let mut i = interactions();
        let plain = FakeSurface::new();
        i.pointer_down(p(150.0, 95.0), &plain);
        i.pointer_moved(p(60.0, 95.0), &plain);
        i.pointer_up(p(60.0, 95.0), &plain);

        let revealed = FakeSurface::new().with_delete_panel("work");
        let press = i.pointer_down(p(180.0, 95.0), &revealed);
        assert!(!press.is_consumed());
        let release = i.pointer_up(p(180.0, 95.0), &revealed);
        assert_eq!(release.intents, vec![Intent::ConfirmDelete("work".into())]);
        assert_eq!(i.swipe().open_row(), Some(&"work".to_string()));
    }

    #[test]
    fn fab_click_toggles_menu_and_action_runs() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_down(p(720.0, 520.0), &surface);
        i.pointer_up(p(720.0, 520.0), &surface);
        assert!(i.fab().is_open());

        i.pointer_moved(p(720.0, 465.0), &surface);
        assert_eq!(i.fab().active_action(), Some(FabAction::NewTodo));

        i.pointer_down(p(720.0, 465.0), &surface);
        let release = i.pointer_up(p(720.0, 465.0), &surface);
        assert_eq!(release.intents, vec![Intent::RunAction(FabAction::NewTodo)]);
        assert!(!i.fab().is_open());
        assert_eq!(i.fab().active_action(), None);
    }

    #[test]
    fn menu_close_leaves_no_engagement_behind() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.open_menu();
        // Hover then leave the toggle and two sub-actions
        i.pointer_moved(p(720.0, 520.0), &surface);
        i.pointer_moved(p(720.0, 465.0), &surface);
        i.pointer_moved(p(720.0, 415.0), &surface);
        i.pointer_moved(p(760.0, 440.0), &surface);
        i.frame_tick(&surface);
        i.pointer_moved(p(765.0, 445.0), &surface);
        assert!(i.fab().any_pending());

        i.close_menu();
        let fab = i.fab();
        assert_eq!(fab.container_offset(), Offset::ZERO);
        assert_eq!(fab.toggle_offset(), Offset::ZERO);
        for action in FabAction::ALL {
            assert_eq!(fab.action_offset(action), Offset::ZERO);
        }
        assert_eq!(fab.active_action(), None);
        assert!(!fab.any_pending());
    }

    #[test]
    fn click_outside_menu_closes_it() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.open_menu();
        i.pointer_down(p(400.0, 300.0), &surface);
        i.pointer_up(p(400.0, 300.0), &surface);
        assert!(!i.fab().is_open());
    }

    #[test]
    fn divider_drag_resizes_sidebar() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        let press = i.pointer_down(p(204.0, 300.0), &surface);
        assert_eq!(press, Press::Resize);
        assert_eq!(
            i.pointer_moved(p(264.0, 300.0), &surface),
            Some(Intent::SidebarResized(260.0))
        );
        let release = i.pointer_up(p(264.0, 300.0), &surface);
        assert_eq!(release.intents, vec![Intent::SidebarResized(260.0)]);
        assert_eq!(i.sidebar_width(), 260.0);
    }

    #[test]
    fn search_box_click_focuses_search() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_down(p(50.0, 10.0), &surface);
        let release = i.pointer_up(p(50.0, 10.0), &surface);
        assert_eq!(release.intents, vec![Intent::FocusSearch]);
    }

    #[test]
    fn vanished_rows_are_forgotten() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_down(p(150.0, 95.0), &surface);
        i.pointer_moved(p(60.0, 95.0), &surface);
        i.pointer_up(p(60.0, 95.0), &surface);

        i.sync_folders(["inbox", "life"].map(String::from));
        assert_eq!(i.swipe().open_row(), None);
        assert!(!i.folders().is_mounted(&"work".to_string()));
    }

    #[test]
    fn keyboard_select_closes_open_row() {
        let surface = FakeSurface::new();
        let mut i = interactions();
        i.pointer_down(p(150.0, 95.0), &surface);
        i.pointer_moved(p(60.0, 95.0), &surface);
        i.pointer_up(p(60.0, 95.0), &surface);

        assert!(!i.select_row("work"));
        assert!(i.select_row("life"));
        assert_eq!(i.row_swipe_offset("work"), 0.0);
    }
}

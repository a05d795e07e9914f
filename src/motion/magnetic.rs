//! Per-category magnetic hover controller.
//!
//! One controller owns every mounted target of a category (the folder rows,
//! the fanned-out sub-actions, the single search box, ...). Each target is an
//! explicit two-state machine:
//!
//! - `Disengaged -> Engaged` when the pointer leaves the target.
//! - `Engaged -> Disengaged` the instant a pointer sample lands inside the
//!   target's current rectangle, or on a direct pointer-enter. Offset is
//!   pinned to zero on that transition.
//!
//! While engaged, pointer samples are coalesced into a per-target
//! [`FrameSlot`] and only turned into an offset on the next render tick,
//! after re-reading the target's live rectangle.

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;

use super::frame::FrameSlot;
use super::geometry::{Offset, Point, Rect};
use super::proximity::{MagnetTuning, pull_vector};

/// Engagement state of one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engagement {
    #[default]
    Disengaged,
    Engaged,
}

#[derive(Debug, Clone, Default)]
struct TargetState {
    engagement: Engagement,
    offset: Offset,
    frame: FrameSlot<Point>,
}

impl TargetState {
    fn disengage(&mut self) {
        self.engagement = Engagement::Disengaged;
        self.offset = Offset::ZERO;
        self.frame.cancel();
    }
}

/// Magnetic controller for one target category.
#[derive(Debug, Clone)]
pub struct MagneticController<K> {
    name: &'static str,
    tuning: MagnetTuning,
    /// At most one engaged target at a time.
    exclusive: bool,
    suppressed: bool,
    targets: IndexMap<K, TargetState>,
}

impl<K> MagneticController<K>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new(name: &'static str, tuning: MagnetTuning) -> Self {
        MagneticController {
            name,
            tuning,
            exclusive: false,
            suppressed: false,
            targets: IndexMap::new(),
        }
    }

    /// A controller whose targets compete: engaging one releases the others.
    pub fn exclusive(name: &'static str, tuning: MagnetTuning) -> Self {
        MagneticController {
            exclusive: true,
            ..Self::new(name, tuning)
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tuning(&self) -> &MagnetTuning {
        &self.tuning
    }

    pub fn set_tuning(&mut self, tuning: MagnetTuning) {
        self.tuning = tuning;
    }

    // -----------------------------------------------------------------------
    // Target lifecycle
    // -----------------------------------------------------------------------

    /// Register a target. Mounting an already-mounted key is a no-op.
    pub fn mount(&mut self, key: K) {
        self.targets.entry(key).or_default();
    }

    /// Forget a target, discarding its offset and any pending update.
    pub fn unmount(&mut self, key: &K) -> bool {
        self.targets.shift_remove(key).is_some()
    }

    /// Mount exactly `keys`, unmounting everything else.
    pub fn sync<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = K>,
    {
        let wanted: IndexMap<K, ()> = keys.into_iter().map(|k| (k, ())).collect();
        self.targets.retain(|key, _| wanted.contains_key(key));
        for key in wanted.into_keys() {
            self.mount(key);
        }
    }

    pub fn is_mounted(&self, key: &K) -> bool {
        self.targets.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.targets.keys()
    }

    // -----------------------------------------------------------------------
    // Suppression
    // -----------------------------------------------------------------------

    /// Turn the whole mechanism off: nothing engages and every offset is zero
    /// until [`resume`](Self::resume).
    pub fn suppress(&mut self) {
        self.suppressed = true;
        self.reset_all();
    }

    pub fn resume(&mut self) {
        self.suppressed = false;
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Disengage every target, zero every offset, cancel every pending update.
    pub fn reset_all(&mut self) {
        for target in self.targets.values_mut() {
            target.disengage();
        }
    }

    // -----------------------------------------------------------------------
    // Pointer transitions
    // -----------------------------------------------------------------------

    /// Pointer went directly over the target.
    pub fn pointer_enter(&mut self, key: &K) {
        if let Some(target) = self.targets.get_mut(key) {
            if target.engagement == Engagement::Engaged {
                tracing::debug!(controller = self.name, target = ?key, "disengaged on enter");
            }
            target.disengage();
        }
    }

    /// Pointer left the target: start tracking it from the outside.
    pub fn pointer_leave(&mut self, key: &K) {
        if self.suppressed || !self.targets.contains_key(key) {
            return;
        }
        if self.exclusive {
            for (other, target) in self.targets.iter_mut() {
                if other != key && target.engagement == Engagement::Engaged {
                    target.disengage();
                }
            }
        }
        if let Some(target) = self.targets.get_mut(key) {
            target.engagement = Engagement::Engaged;
            tracing::debug!(controller = self.name, target = ?key, "engaged");
        }
    }

    /// A global pointer sample.
    ///
    /// Targets the pointer is now inside disengage immediately. Every other
    /// engaged target gets its pending update replaced by this sample.
    pub fn pointer_moved<F>(&mut self, point: Point, rect_of: F)
    where
        F: Fn(&K) -> Option<Rect>,
    {
        if self.suppressed {
            return;
        }
        for (key, target) in self.targets.iter_mut() {
            if target.engagement != Engagement::Engaged {
                continue;
            }
            if rect_of(key).is_some_and(|rect| rect.contains(point)) {
                tracing::debug!(controller = self.name, target = ?key, "pointer inside, disengaged");
                target.disengage();
                continue;
            }
            target.frame.schedule(point);
        }
    }

    /// Display tick: apply the latest sample of every target that has one.
    ///
    /// Returns true when any offset changed. A target whose rectangle cannot
    /// be resolved is skipped silently.
    pub fn on_frame<F>(&mut self, rect_of: F) -> bool
    where
        F: Fn(&K) -> Option<Rect>,
    {
        let mut changed = false;
        for (key, target) in self.targets.iter_mut() {
            let Some(point) = target.frame.take() else {
                continue;
            };
            if target.engagement != Engagement::Engaged {
                continue;
            }
            let Some(rect) = rect_of(key) else {
                continue;
            };
            let previous = target.offset;
            if rect.contains(point) {
                target.disengage();
            } else {
                target.offset = pull_vector(&rect, point, &self.tuning);
            }
            changed |= previous != target.offset;
        }
        changed
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn offset(&self, key: &K) -> Offset {
        self.targets.get(key).map_or(Offset::ZERO, |t| t.offset)
    }

    pub fn engagement(&self, key: &K) -> Engagement {
        self.targets
            .get(key)
            .map_or(Engagement::Disengaged, |t| t.engagement)
    }

    pub fn has_pending(&self, key: &K) -> bool {
        self.targets.get(key).is_some_and(|t| t.frame.is_pending())
    }

    pub fn any_pending(&self) -> bool {
        self.targets.values().any(|t| t.frame.is_pending())
    }

    /// Whether this controller currently needs the global pointer stream.
    pub fn is_subscribed(&self) -> bool {
        !self.suppressed
            && self
                .targets
                .values()
                .any(|t| t.engagement == Engagement::Engaged)
    }

    pub fn engaged(&self) -> impl Iterator<Item = &K> {
        self.targets
            .iter()
            .filter(|(_, t)| t.engagement == Engagement::Engaged)
            .map(|(k, _)| k)
    }
}

impl MagneticController<()> {
    /// A controller with exactly one mounted target.
    pub fn single(name: &'static str, tuning: MagnetTuning) -> Self {
        let mut controller = Self::new(name, tuning);
        controller.mount(());
        controller
    }
}

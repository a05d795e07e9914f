/// Handle to a scheduled visual update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// A single-slot "next tick" scheduler.
///
/// Scheduling while a callback is outstanding cancels the old one first, so
/// at most one update is ever pending and it always carries the latest
/// value. The owner drains the slot once per render tick with [`take`].
///
/// [`take`]: FrameSlot::take
#[derive(Debug, Clone)]
pub struct FrameSlot<T> {
    pending: Option<(FrameHandle, T)>,
    next_id: u64,
}

impl<T> Default for FrameSlot<T> {
    fn default() -> Self {
        FrameSlot {
            pending: None,
            next_id: 0,
        }
    }
}

impl<T> FrameSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is pending with `value`.
    pub fn schedule(&mut self, value: T) -> FrameHandle {
        self.cancel();
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some((handle, value));
        handle
    }

    /// Drop the pending update, if any, and return its handle.
    pub fn cancel(&mut self) -> Option<FrameHandle> {
        self.pending.take().map(|(handle, _)| handle)
    }

    /// Run-time of the tick: hand the pending value to the caller.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn handle(&self) -> Option<FrameHandle> {
        self.pending.as_ref().map(|(handle, _)| *handle)
    }
}

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parking_lot::Mutex;
use trackable_types::{Lifecycle, Track, TrackerRef, TypeDesc};

mod registry;
pub use registry::{global_tracker, set_global_tracker};

#[cfg(test)]
mod tests;

/// A lifecycle-reporting cell, embedded in any object that opts in to
/// tracking.
///
/// The cell owns exactly one [`TrackerRef`] at all times: a real tracker or
/// the sentinel, never anything in between. Construction fires
/// `notify_attached` at the chosen tracker, [`Trackable::set_tracker`]
/// fires `notify_detached` at the old tracker and then `notify_attached`
/// at the new one, and dropping the cell fires `notify_destroyed`. Every
/// notification carries the cell's [`TypeDesc`] and nothing else.
///
/// The slot is guarded by a mutex scoped to its own mutation, so the cell
/// is safe to embed in types shared across threads; there is no atomicity
/// across operations beyond that.
pub struct Trackable {
    ty: TypeDesc,
    tracker: Mutex<TrackerRef>,
}

impl Trackable {
    /// Creates a cell reporting as `ty`, tracked by the current
    /// process-wide default tracker (or by nothing, if none is
    /// registered).
    ///
    /// Fires `notify_attached(ty)` at the chosen tracker. Later changes to
    /// the global default never affect this cell.
    pub fn new(ty: TypeDesc) -> Self {
        Self::with_tracker(ty, registry::global_tracker())
    }

    /// Shorthand for `Trackable::new(TypeDesc::of::<T>())`.
    pub fn of<T: 'static>() -> Self {
        Self::new(TypeDesc::of::<T>())
    }

    /// Creates a cell with an explicitly chosen tracker, bypassing the
    /// process-wide default entirely.
    ///
    /// This is the injection point for tests and embedders that want
    /// tracking without mutating process-wide state.
    pub fn with_tracker(ty: TypeDesc, tracker: TrackerRef) -> Self {
        let cell = Self {
            ty,
            tracker: Mutex::new(tracker.clone()),
        };
        ping(&tracker, ty, Lifecycle::Attached);
        cell
    }

    /// The descriptor this cell reports in every notification.
    pub fn ty(&self) -> TypeDesc {
        self.ty
    }

    /// Returns a new owning reference to the current tracker (or the
    /// sentinel). Ownership of the slot stays with the cell.
    pub fn get_tracker(&self) -> TrackerRef {
        self.tracker.lock().clone()
    }

    /// Replaces the current tracker.
    ///
    /// Fires `notify_detached` at the current tracker, releases it, stores
    /// an owning reference to `new`, then fires `notify_attached` at `new`.
    /// Detach-old strictly precedes attach-new. Sentinels are skipped on
    /// either side, and the operation never fails from the caller's point
    /// of view.
    pub fn set_tracker(&self, new: TrackerRef) {
        let old = self.tracker.lock().clone();
        ping(&old, self.ty, Lifecycle::Detached);
        {
            let mut slot = self.tracker.lock();
            *slot = new.clone();
        }
        drop(old);
        ping(&new, self.ty, Lifecycle::Attached);
    }

    /// Calls `visitor` with the tracker reference, if one is held.
    ///
    /// Traversal hook for hosts that run a cycle detector over their
    /// object graph: the tracker reference is a strong edge, and a tracker
    /// that points back at its trackable forms a cycle discoverable only
    /// through here. The visitor runs with the slot locked and must not
    /// call back into this cell.
    pub fn visit(&self, mut visitor: impl FnMut(&Arc<dyn Track>)) {
        if let TrackerRef::Tracker(tracker) = &*self.tracker.lock() {
            visitor(tracker);
        }
    }

    /// Drops the tracker reference without firing any notification,
    /// leaving the sentinel behind.
    ///
    /// Cycle-breaking hook: a collector that found a cycle through
    /// [`Trackable::visit`] severs it here. Idempotent; a later drop of
    /// the cell then fires nothing.
    pub fn clear(&self) {
        let old = std::mem::take(&mut *self.tracker.lock());
        drop(old);
    }
}

impl Drop for Trackable {
    fn drop(&mut self) {
        let old = std::mem::take(self.tracker.get_mut());
        ping(&old, self.ty, Lifecycle::Destroyed);
    }
}

impl std::fmt::Debug for Trackable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trackable")
            .field("ty", &self.ty.name())
            .field("tracked", &!self.tracker.lock().is_sentinel())
            .finish()
    }
}

/// Best-effort dispatch of one lifecycle notification.
///
/// Sentinels are skipped without a call. A panic raised by the tracker is
/// caught and discarded here; tracking is observability, not a correctness
/// dependency, and a misbehaving tracker must never break the tracked
/// object's lifecycle. Exactly one attempt per event, no retries.
fn ping(tracker: &TrackerRef, ty: TypeDesc, event: Lifecycle) {
    let TrackerRef::Tracker(tracker) = tracker else {
        return;
    };
    tracing::trace!(ty = ty.name(), ?event, "dispatching lifecycle notification");
    let _ = catch_unwind(AssertUnwindSafe(|| match event {
        Lifecycle::Attached => tracker.notify_attached(ty),
        Lifecycle::Detached => tracker.notify_detached(ty),
        Lifecycle::Destroyed => tracker.notify_destroyed(ty),
    }));
}

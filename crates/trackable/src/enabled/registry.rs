//! Process-wide default tracker.
//!
//! A single mutable cell consulted by `Trackable::new` at construction
//! time, and only then: replacing the default never re-attaches existing
//! cells. Absent (sentinel) at process start, replaced wholesale by each
//! `set_global_tracker` call, released only at process exit.

use parking_lot::RwLock;
use trackable_types::TrackerRef;

static GLOBAL_TRACKER: RwLock<TrackerRef> = RwLock::new(TrackerRef::Sentinel);

/// Replaces the process-wide default tracker. Last writer wins.
///
/// The previous default's owning reference is released. Cells constructed
/// before the call keep whatever tracker they already hold.
pub fn set_global_tracker(tracker: TrackerRef) {
    let old = std::mem::replace(&mut *GLOBAL_TRACKER.write(), tracker);
    // Released outside the lock; a tracker's Drop may itself touch the
    // registry.
    drop(old);
}

/// Returns a new owning reference to the current process-wide default.
pub fn global_tracker() -> TrackerRef {
    GLOBAL_TRACKER.read().clone()
}

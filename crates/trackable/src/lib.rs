//! Lifecycle-reporting capability for Rust objects.
//!
//! Any object type that embeds a [`Trackable`] cell reports its own
//! creation, tracker replacement, and destruction to a *tracker*: an
//! external observer implementing [`Track`]. Trackers can then maintain an
//! out-of-band census of live objects (leak detection, instrumentation,
//! reference-graph auditing) without the tracked object knowing anything
//! about the tracker's bookkeeping.
//!
//! ```rust
//! use trackable::Trackable;
//!
//! struct Session {
//!     _lifecycle: Trackable,
//!     // ... the object's own state
//! }
//!
//! impl Session {
//!     fn new() -> Self {
//!         Self {
//!             // Consults the process-wide default tracker, fires
//!             // `notify_attached(TypeDesc::of::<Session>())` against it.
//!             _lifecycle: Trackable::of::<Session>(),
//!         }
//!     }
//! }
//!
//! // Install a process-wide default for subsequently constructed objects:
//! // trackable::set_global_tracker(TrackerRef::from_tracker(my_tracker));
//! let session = Session::new();
//! drop(session); // fires `notify_destroyed` at the session's tracker
//! ```
//!
//! Notification delivery is best-effort: a panicking tracker never breaks
//! the tracked object's own lifecycle, and each event is attempted exactly
//! once. There is no ordering guarantee across notifications from
//! different objects.
//!
//! # Cargo features
//!
//! | Feature | Effect |
//! |---------|--------|
//! | `tracking` *(default)* | Real implementation: tracker slots, global default, dispatch. |
//! | *(disabled)* | The identical surface compiles to pass-throughs; `Trackable` keeps only its `TypeDesc`. |

pub use trackable_types::{Lifecycle, Track, TrackerRef, TypeDesc};

#[cfg(not(feature = "tracking"))]
mod disabled;
#[cfg(feature = "tracking")]
mod enabled;

#[cfg(not(feature = "tracking"))]
pub use disabled::*;
#[cfg(feature = "tracking")]
pub use enabled::*;

/// Capability version, reported by [`version`].
pub const VERSION: u32 = 1;

/// Diagnostic version report. Constant.
pub fn version() -> u32 {
    VERSION
}

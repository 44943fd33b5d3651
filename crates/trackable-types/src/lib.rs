//! Contract types shared between trackable objects and their trackers.
//!
//! A *trackable* object reports its own lifecycle (attach, detach, destroy)
//! to a *tracker* it holds a reference to. This crate defines the three
//! pieces of that contract: the [`Track`] capability a tracker implements,
//! the [`TrackerRef`] a trackable holds (a real tracker or the explicit
//! [`TrackerRef::Sentinel`]), and the [`TypeDesc`] every notification
//! carries.

use facet::Facet;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Describes the kind of object a notification is about.
///
/// Trackers observe *types*, not instances: every notification carries the
/// descriptor of the constructing type and nothing that identifies the
/// individual object. Implementers of [`Track`] that want per-instance
/// bookkeeping must arrange for it themselves; the capability deliberately
/// does not hand them instance identity.
#[derive(Debug, Clone, Copy)]
pub struct TypeDesc {
    name: &'static str,
    id: TypeId,
}

impl TypeDesc {
    /// Builds the descriptor for `T`.
    pub fn of<T: 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// Fully qualified name of the described type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The described type's `TypeId`.
    pub fn id(&self) -> TypeId {
        self.id
    }
}

// Equality and hashing go through the TypeId; `type_name` output is not
// guaranteed unique across types.
impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDesc {}

impl Hash for TypeDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The three moments a trackable reports.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[facet(rename_all = "snake_case")]
pub enum Lifecycle {
    Attached,
    Detached,
    Destroyed,
}

/// Receives lifecycle notifications from trackable objects.
///
/// Implementations may panic inside any of these methods; the dispatching
/// trackable isolates and discards the unwind, so nothing a tracker does
/// here can break the tracked object's own lifecycle. Each notification is
/// attempted exactly once per lifecycle event, best-effort.
///
/// Trackers must not hold strong references back to the objects they
/// observe. Any back-pointer a tracker keeps should be a `Weak`, or the
/// resulting `Arc` cycle will never be reclaimed unless the embedding host
/// runs a cycle detector through `Trackable::visit`/`Trackable::clear`.
pub trait Track: Send + Sync + 'static {
    /// A trackable acquired a reference to this tracker.
    fn notify_attached(&self, ty: TypeDesc);

    /// A trackable is about to replace this tracker with another one.
    fn notify_detached(&self, ty: TypeDesc);

    /// A trackable holding this tracker is being destroyed.
    fn notify_destroyed(&self, ty: TypeDesc);
}

/// An owning reference to a tracker, or the explicit "no tracker" value.
///
/// Cloning produces a new owning reference to the same tracker; many
/// trackables may hold references to one tracker. The sentinel is a real
/// value with the same clone/ownership surface, not an absence.
#[derive(Clone, Default)]
pub enum TrackerRef {
    /// No tracker currently assigned. Notifications are skipped entirely.
    #[default]
    Sentinel,
    /// An owning reference to a tracker.
    Tracker(Arc<dyn Track>),
}

impl TrackerRef {
    /// Wraps a tracker value in a fresh owning reference.
    pub fn from_tracker(tracker: impl Track) -> Self {
        Self::Tracker(Arc::new(tracker))
    }

    /// True if this is the "no tracker" sentinel.
    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel)
    }

    /// Borrows the tracker, if one is held.
    pub fn tracker(&self) -> Option<&Arc<dyn Track>> {
        match self {
            Self::Sentinel => None,
            Self::Tracker(tracker) => Some(tracker),
        }
    }

    /// Pointer-identity comparison: true for two references to the same
    /// tracker object, and for two sentinels.
    pub fn same_tracker(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Sentinel, Self::Sentinel) => true,
            (Self::Tracker(a), Self::Tracker(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<dyn Track>> for TrackerRef {
    fn from(tracker: Arc<dyn Track>) -> Self {
        Self::Tracker(tracker)
    }
}

impl fmt::Debug for TrackerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentinel => f.write_str("Sentinel"),
            Self::Tracker(tracker) => f
                .debug_tuple("Tracker")
                .field(&Arc::as_ptr(tracker))
                .finish(),
        }
    }
}

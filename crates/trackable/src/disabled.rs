//! Pass-through surface compiled when the `tracking` feature is off.
//!
//! Identical API, zero overhead: cells keep only their `TypeDesc`, no
//! tracker reference is ever held, and no notification is ever sent.

use std::sync::Arc;

use trackable_types::{Track, TrackerRef, TypeDesc};

/// Inert stand-in for the tracking cell.
pub struct Trackable {
    ty: TypeDesc,
}

impl Trackable {
    pub fn new(ty: TypeDesc) -> Self {
        Self { ty }
    }

    pub fn of<T: 'static>() -> Self {
        Self::new(TypeDesc::of::<T>())
    }

    pub fn with_tracker(ty: TypeDesc, _tracker: TrackerRef) -> Self {
        Self { ty }
    }

    pub fn ty(&self) -> TypeDesc {
        self.ty
    }

    pub fn get_tracker(&self) -> TrackerRef {
        TrackerRef::Sentinel
    }

    pub fn set_tracker(&self, _new: TrackerRef) {}

    pub fn visit(&self, _visitor: impl FnMut(&Arc<dyn Track>)) {}

    pub fn clear(&self) {}
}

impl std::fmt::Debug for Trackable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trackable")
            .field("ty", &self.ty.name())
            .field("tracked", &false)
            .finish()
    }
}

pub fn set_global_tracker(_tracker: TrackerRef) {}

pub fn global_tracker() -> TrackerRef {
    TrackerRef::Sentinel
}

//! Sample census tracker.
//!
//! Keeps per-type counts of live, total-allocated, and retired objects.
//! This is consumer code: the capability itself does no bookkeeping, it
//! only delivers notifications.

use std::collections::BTreeMap;

use facet::Facet;
use parking_lot::Mutex;
use trackable::{Track, TypeDesc};

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    live: i64,
    allocated: u64,
    retired: u64,
}

/// Counts objects per type as lifecycle notifications arrive.
#[derive(Default)]
pub struct CensusTracker {
    per_type: Mutex<BTreeMap<&'static str, Counts>>,
}

impl CensusTracker {
    fn update(&self, ty: TypeDesc, apply: impl FnOnce(&mut Counts)) {
        let mut per_type = self.per_type.lock();
        apply(per_type.entry(ty.name()).or_default());
    }

    /// Copies the current census out for reporting.
    pub fn snapshot(&self) -> CensusSnapshot {
        CensusSnapshot {
            entries: self
                .per_type
                .lock()
                .iter()
                .map(|(name, counts)| CensusEntry {
                    type_name: (*name).to_string(),
                    live: counts.live,
                    allocated: counts.allocated,
                    retired: counts.retired,
                })
                .collect(),
        }
    }
}

impl Track for CensusTracker {
    fn notify_attached(&self, ty: TypeDesc) {
        self.update(ty, |counts| {
            counts.live += 1;
            counts.allocated += 1;
        });
    }

    fn notify_detached(&self, ty: TypeDesc) {
        self.update(ty, |counts| counts.live -= 1);
    }

    fn notify_destroyed(&self, ty: TypeDesc) {
        self.update(ty, |counts| {
            counts.live -= 1;
            counts.retired += 1;
        });
    }
}

#[derive(Facet, Debug)]
pub struct CensusEntry {
    pub type_name: String,
    pub live: i64,
    pub allocated: u64,
    pub retired: u64,
}

#[derive(Facet, Debug, Default)]
pub struct CensusSnapshot {
    pub entries: Vec<CensusEntry>,
}

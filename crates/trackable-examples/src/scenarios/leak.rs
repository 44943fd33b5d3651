//! A deliberate leak.
//!
//! Each wave parks a batch of sessions in a collection that is then
//! leaked, so `notify_destroyed` never fires and the census reports them
//! live at exit. This is the kind of drift a census tracker exists to
//! expose.

use trackable::Trackable;

struct Session {
    _lifecycle: Trackable,
}

impl Session {
    fn new() -> Self {
        Self {
            _lifecycle: Trackable::of::<Session>(),
        }
    }
}

pub fn run(waves: u64) {
    let mut parked = Vec::new();
    for wave in 0..waves {
        parked.extend((0..4).map(|_| Session::new()));
        tracing::info!(wave, parked = parked.len(), "sessions parked");
    }
    // Leaked on purpose; the dump at exit shows these as still live.
    std::mem::forget(parked);
}

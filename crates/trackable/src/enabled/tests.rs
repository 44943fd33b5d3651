use super::*;
use std::any::type_name;
use std::sync::{Arc, Mutex as StdMutex, OnceLock};
use trackable_types::{Lifecycle, Track, TrackerRef, TypeDesc};

struct Session;
struct Buffer;

type LogEntry = (&'static str, Lifecycle, &'static str);

/// Ordered record of every notification seen across a set of trackers.
#[derive(Clone, Default)]
struct SharedLog(Arc<StdMutex<Vec<LogEntry>>>);

impl SharedLog {
    fn entries(&self) -> Vec<LogEntry> {
        self.0.lock().expect("log mutex poisoned").clone()
    }
}

struct Recorder {
    name: &'static str,
    log: SharedLog,
}

impl Recorder {
    fn install(name: &'static str, log: &SharedLog) -> TrackerRef {
        TrackerRef::from_tracker(Self {
            name,
            log: log.clone(),
        })
    }

    fn record(&self, event: Lifecycle, ty: TypeDesc) {
        self.log
            .0
            .lock()
            .expect("log mutex poisoned")
            .push((self.name, event, ty.name()));
    }
}

impl Track for Recorder {
    fn notify_attached(&self, ty: TypeDesc) {
        self.record(Lifecycle::Attached, ty);
    }

    fn notify_detached(&self, ty: TypeDesc) {
        self.record(Lifecycle::Detached, ty);
    }

    fn notify_destroyed(&self, ty: TypeDesc) {
        self.record(Lifecycle::Destroyed, ty);
    }
}

struct Panicky;

impl Track for Panicky {
    fn notify_attached(&self, _ty: TypeDesc) {
        panic!("attach notification failed");
    }

    fn notify_detached(&self, _ty: TypeDesc) {
        panic!("detach notification failed");
    }

    fn notify_destroyed(&self, _ty: TypeDesc) {
        panic!("destroy notification failed");
    }
}

/// Serializes tests that touch the process-wide default tracker (or other
/// process-wide state, like the panic hook).
fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<StdMutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| StdMutex::new(()))
        .lock()
        .expect("test guard mutex poisoned")
}

#[test]
fn construct_uses_global_default() {
    let _guard = test_guard();
    let log = SharedLog::default();
    let global = Recorder::install("global", &log);
    set_global_tracker(global.clone());

    let cell = Trackable::of::<Session>();
    assert!(
        cell.get_tracker().same_tracker(&global),
        "cell should hold the default installed before construction"
    );
    assert_eq!(
        log.entries(),
        vec![("global", Lifecycle::Attached, type_name::<Session>())]
    );

    set_global_tracker(TrackerRef::Sentinel);
}

#[test]
fn construct_without_default_gets_sentinel() {
    let _guard = test_guard();
    set_global_tracker(TrackerRef::Sentinel);

    let cell = Trackable::of::<Session>();
    assert!(cell.get_tracker().is_sentinel());

    // A tracker installed afterwards hears nothing from this cell.
    let log = SharedLog::default();
    set_global_tracker(Recorder::install("late", &log));
    drop(cell);
    assert!(log.entries().is_empty(), "sentinel cells never notify");

    set_global_tracker(TrackerRef::Sentinel);
}

#[test]
fn explicit_tracker_bypasses_global_default() {
    let _guard = test_guard();
    let log = SharedLog::default();
    let global = Recorder::install("global", &log);
    let explicit = Recorder::install("explicit", &log);
    set_global_tracker(global.clone());

    let cell = Trackable::with_tracker(TypeDesc::of::<Buffer>(), explicit.clone());
    assert!(cell.get_tracker().same_tracker(&explicit));
    assert_eq!(
        log.entries(),
        vec![("explicit", Lifecycle::Attached, type_name::<Buffer>())]
    );

    set_global_tracker(TrackerRef::Sentinel);
}

#[test]
fn set_tracker_detaches_old_before_attaching_new() {
    let log = SharedLog::default();
    let t1 = Recorder::install("t1", &log);
    let t2 = Recorder::install("t2", &log);
    let t3 = Recorder::install("t3", &log);

    let cell = Trackable::with_tracker(TypeDesc::of::<Session>(), t1.clone());
    cell.set_tracker(t2.clone());
    cell.set_tracker(t3.clone());

    let ty = type_name::<Session>();
    assert_eq!(
        log.entries(),
        vec![
            ("t1", Lifecycle::Attached, ty),
            ("t1", Lifecycle::Detached, ty),
            ("t2", Lifecycle::Attached, ty),
            ("t2", Lifecycle::Detached, ty),
            ("t3", Lifecycle::Attached, ty),
        ],
        "detach-then-attach must strictly alternate across trackers"
    );

    drop(cell);
    assert_eq!(
        log.entries().last(),
        Some(&("t3", Lifecycle::Destroyed, ty))
    );
}

#[test]
fn drop_fires_destroyed_once_and_releases_the_tracker() {
    let log = SharedLog::default();
    let tracker = Recorder::install("t", &log);

    let cell = Trackable::with_tracker(TypeDesc::of::<Buffer>(), tracker.clone());
    drop(cell);

    let ty = type_name::<Buffer>();
    assert_eq!(
        log.entries(),
        vec![
            ("t", Lifecycle::Attached, ty),
            ("t", Lifecycle::Destroyed, ty),
        ]
    );

    let TrackerRef::Tracker(arc) = tracker else {
        panic!("recorder should be a real tracker");
    };
    assert_eq!(
        Arc::strong_count(&arc),
        1,
        "dropped cell must not keep a reference to its tracker"
    );
}

#[test]
fn panicking_tracker_never_breaks_the_lifecycle() {
    let _guard = test_guard();
    // Swallowed panics still run the hook; keep test output quiet.
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));

    let panicky = TrackerRef::from_tracker(Panicky);

    // Construction survives a panicking attach.
    let cell = Trackable::with_tracker(TypeDesc::of::<Session>(), panicky.clone());
    assert!(cell.get_tracker().same_tracker(&panicky));

    // Replacement survives a panicking detach and still attaches the new
    // tracker.
    let log = SharedLog::default();
    let healthy = Recorder::install("healthy", &log);
    cell.set_tracker(healthy.clone());
    assert!(cell.get_tracker().same_tracker(&healthy));
    assert_eq!(
        log.entries(),
        vec![("healthy", Lifecycle::Attached, type_name::<Session>())]
    );

    // Destruction survives a panicking destroy.
    let doomed = Trackable::with_tracker(TypeDesc::of::<Buffer>(), panicky.clone());
    drop(doomed);

    std::panic::set_hook(hook);
}

#[test]
fn clear_is_silent_and_idempotent() {
    let log = SharedLog::default();
    let tracker = Recorder::install("t", &log);

    let cell = Trackable::with_tracker(TypeDesc::of::<Session>(), tracker.clone());
    cell.clear();
    cell.clear();
    assert!(cell.get_tracker().is_sentinel());

    drop(cell);
    assert_eq!(
        log.entries(),
        vec![("t", Lifecycle::Attached, type_name::<Session>())],
        "clear and the drop after it must not notify"
    );
}

#[test]
fn set_global_tracker_does_not_retroact() {
    let _guard = test_guard();
    let log = SharedLog::default();
    let first = Recorder::install("first", &log);
    let second = Recorder::install("second", &log);

    set_global_tracker(first.clone());
    let a = Trackable::of::<Session>();

    set_global_tracker(second.clone());
    assert!(
        a.get_tracker().same_tracker(&first),
        "replacing the default must not re-attach existing cells"
    );

    let b = Trackable::of::<Buffer>();
    assert!(b.get_tracker().same_tracker(&second));

    set_global_tracker(TrackerRef::Sentinel);
}

#[test]
fn end_to_end_attach_reparent_destroy() {
    let _guard = test_guard();
    let log = SharedLog::default();
    let g = Recorder::install("g", &log);
    let h = Recorder::install("h", &log);

    set_global_tracker(g.clone());
    let a = Trackable::of::<Session>();
    a.set_tracker(h.clone());
    drop(a);
    set_global_tracker(TrackerRef::Sentinel);

    let ty = type_name::<Session>();
    assert_eq!(
        log.entries(),
        vec![
            ("g", Lifecycle::Attached, ty),
            ("g", Lifecycle::Detached, ty),
            ("h", Lifecycle::Attached, ty),
            ("h", Lifecycle::Destroyed, ty),
        ]
    );
}

#[test]
fn visit_traverses_the_tracker_reference() {
    let log = SharedLog::default();
    let tracker = Recorder::install("t", &log);
    let cell = Trackable::with_tracker(TypeDesc::of::<Session>(), tracker.clone());

    let expected = tracker.tracker().expect("recorder is a real tracker");
    let mut visited = 0;
    cell.visit(|edge| {
        visited += 1;
        assert!(Arc::ptr_eq(edge, expected));
    });
    assert_eq!(visited, 1);

    cell.clear();
    cell.visit(|_| panic!("cleared cell has no edge to visit"));
}

#[test]
fn version_is_constant() {
    assert_eq!(crate::version(), 1);
}

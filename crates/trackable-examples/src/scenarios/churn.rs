//! Construct-and-drop waves.
//!
//! Every object allocated in a wave is dropped before the next one, so
//! the final census shows zero live objects and equal allocated/retired
//! counts per type.

use trackable::Trackable;

struct Connection {
    _lifecycle: Trackable,
}

impl Connection {
    fn open() -> Self {
        Self {
            _lifecycle: Trackable::of::<Connection>(),
        }
    }
}

struct RequestBuffer {
    _lifecycle: Trackable,
    _bytes: Vec<u8>,
}

impl RequestBuffer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            _lifecycle: Trackable::of::<RequestBuffer>(),
            _bytes: Vec::with_capacity(capacity),
        }
    }
}

pub fn run(waves: u64) {
    for wave in 0..waves {
        let connections: Vec<Connection> = (0..8).map(|_| Connection::open()).collect();
        let buffers: Vec<RequestBuffer> = (0..32)
            .map(|_| RequestBuffer::with_capacity(4096))
            .collect();
        tracing::info!(
            wave,
            connections = connections.len(),
            buffers = buffers.len(),
            "wave allocated, dropping"
        );
    }
}

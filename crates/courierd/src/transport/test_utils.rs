//! Test helpers for the transport module.

use std::net::SocketAddr;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use super::{ConnectionHandler, ConnectionStream, DatagramHandler};

/// Counts accepted connections without reading them.
pub(crate) struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            count: Arc::clone(&count),
        });
        (count, handler)
    }
}

impl ConnectionHandler for CountingHandler {
    fn handle(&self, _stream: ConnectionStream) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Replies to each datagram with its own text.
pub(crate) struct EchoHandler;

impl DatagramHandler for EchoHandler {
    fn reply(&self, datagram: &[u8], _peer: SocketAddr) -> String {
        format!("echo: {}", String::from_utf8_lossy(datagram))
    }
}

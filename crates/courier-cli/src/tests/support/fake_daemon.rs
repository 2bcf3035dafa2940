//! Fake daemon utilities for CLI tests.
//!
//! Each daemon answers exactly one request with a canned reply and records
//! the request text it received.

use std::io::{Read, Write};
use std::net::{TcpListener, UdpSocket};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixListener;

use camino::Utf8Path;
use courier_config::SocketEndpoint;

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

pub(in crate::tests) struct FakeDaemon {
    endpoint: SocketEndpoint,
    request: Arc<Mutex<Option<String>>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl FakeDaemon {
    /// Spawns a daemon on an ephemeral TCP port.
    pub(in crate::tests) fn stream(reply: &str) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind fake daemon");
        let port = listener.local_addr().expect("local addr").port();
        Self::spawn(SocketEndpoint::tcp("127.0.0.1", port), reply, move |reply| {
            let (mut stream, _) = listener.accept().expect("accept client");
            let mut request = String::new();
            stream.read_to_string(&mut request).expect("read request");
            stream.write_all(reply.as_bytes()).expect("write reply");
            request
        })
    }

    /// Spawns a daemon on a Unix socket at `path`.
    #[cfg(unix)]
    pub(in crate::tests) fn unix(path: &Utf8Path, reply: &str) -> Self {
        let listener = UnixListener::bind(path).expect("bind fake unix daemon");
        Self::spawn(SocketEndpoint::unix(path), reply, move |reply| {
            let (mut stream, _) = listener.accept().expect("accept client");
            let mut request = String::new();
            stream.read_to_string(&mut request).expect("read request");
            stream.write_all(reply.as_bytes()).expect("write reply");
            request
        })
    }

    /// Spawns a daemon on an ephemeral UDP port.
    pub(in crate::tests) fn datagram(reply: &str) -> Self {
        let socket = UdpSocket::bind(("127.0.0.1", 0)).expect("bind fake daemon");
        socket
            .set_read_timeout(Some(RECEIVE_TIMEOUT))
            .expect("receive timeout");
        let port = socket.local_addr().expect("local addr").port();
        Self::spawn(SocketEndpoint::udp("127.0.0.1", port), reply, move |reply| {
            let mut buffer = [0_u8; 2048];
            let (size, peer) = socket.recv_from(&mut buffer).expect("receive request");
            socket.send_to(reply.as_bytes(), peer).expect("send reply");
            String::from_utf8_lossy(buffer.get(..size).expect("datagram size")).into_owned()
        })
    }

    fn spawn<F>(endpoint: SocketEndpoint, reply: &str, serve: F) -> Self
    where
        F: FnOnce(&str) -> String + Send + 'static,
    {
        let request = Arc::new(Mutex::new(None));
        let recorded = Arc::clone(&request);
        let reply = reply.to_owned();
        let handle = thread::spawn(move || {
            let received = serve(&reply);
            *recorded.lock().expect("lock request") = Some(received);
        });
        Self {
            endpoint,
            request,
            handle: Some(handle),
        }
    }

    pub(in crate::tests) fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }

    /// Waits for the daemon thread and returns the request it received.
    pub(in crate::tests) fn take_request(&mut self) -> Option<String> {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.request.lock().expect("lock request").take()
    }
}

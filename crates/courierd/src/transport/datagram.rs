//! Datagram listener for UDP endpoints.
//!
//! One datagram is one request. The socket waits at most one poll interval
//! per receive so the shared poll loop can observe shutdown; each datagram is
//! answered by a pool worker sending the reply back to the sender's address.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use courier_config::SocketEndpoint;

use super::pool::Job;
use super::serve::{self, Intake, ListenerHandle};
use super::{LISTENER_TARGET, ListenerError, resolve};

/// Largest payload a UDP datagram can carry over IPv4.
const MAX_DATAGRAM_BYTES: usize = 65_507;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Handles received datagrams.
pub(crate) trait DatagramHandler: Send + Sync + 'static {
    /// Produces the reply for one datagram sent by `peer`.
    fn reply(&self, datagram: &[u8], peer: SocketAddr) -> String;
}

/// Listener bound to a datagram endpoint.
#[derive(Debug)]
pub(crate) struct DatagramListener {
    endpoint: SocketEndpoint,
    socket: UdpSocket,
}

impl DatagramListener {
    pub(crate) fn bind(endpoint: &SocketEndpoint) -> Result<Self, ListenerError> {
        let SocketEndpoint::Udp { host, port } = endpoint else {
            return Err(ListenerError::WrongTransport {
                endpoint: endpoint.to_string(),
                kind: "datagram",
            });
        };
        let addr = resolve(host, *port)?;
        let socket =
            UdpSocket::bind(addr).map_err(|source| ListenerError::BindUdp { addr, source })?;
        Ok(Self {
            endpoint: endpoint.clone(),
            socket,
        })
    }

    #[cfg(test)]
    pub(crate) fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.local_addr().ok()
    }

    pub(crate) fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }

    /// Answers datagrams with `handler` on `workers` pool threads.
    pub(crate) fn start(
        self,
        handler: Arc<dyn DatagramHandler>,
        workers: usize,
    ) -> Result<ListenerHandle, ListenerError> {
        self.socket
            .set_read_timeout(Some(POLL_INTERVAL))
            .map_err(|source| ListenerError::PollInterval { source })?;
        let intake = DatagramIntake {
            endpoint: self.endpoint,
            socket: Arc::new(self.socket),
            handler,
            buffer: vec![0_u8; MAX_DATAGRAM_BYTES + 1],
        };
        Ok(serve::spawn(intake, workers))
    }
}

struct DatagramIntake {
    endpoint: SocketEndpoint,
    socket: Arc<UdpSocket>,
    handler: Arc<dyn DatagramHandler>,
    buffer: Vec<u8>,
}

impl Intake for DatagramIntake {
    const KIND: &'static str = "datagram";

    fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }

    fn next_job(&mut self) -> io::Result<Option<Job>> {
        let (size, peer) = match self.socket.recv_from(&mut self.buffer) {
            Ok(received) => received,
            Err(error)
                if matches!(
                    error.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                return Ok(None);
            }
            Err(error) => return Err(error),
        };
        let datagram = self.buffer.get(..size).unwrap_or_default().to_vec();
        let socket = Arc::clone(&self.socket);
        let handler = Arc::clone(&self.handler);
        Ok(Some(Box::new(move || {
            answer(&socket, handler.as_ref(), &datagram, peer);
        })))
    }
}

fn answer(socket: &UdpSocket, handler: &dyn DatagramHandler, datagram: &[u8], peer: SocketAddr) {
    let reply = handler.reply(datagram, peer);
    match socket.send_to(reply.as_bytes(), peer) {
        Ok(sent) => debug!(target: LISTENER_TARGET, %peer, bytes = sent, "datagram reply sent"),
        Err(error) => warn!(
            target: LISTENER_TARGET,
            %peer,
            error = %error,
            "failed to send datagram reply"
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Condvar, Mutex};
    use std::thread;

    use rstest::rstest;

    use super::*;
    use crate::transport::test_utils::EchoHandler;

    fn client() -> UdpSocket {
        let client = UdpSocket::bind(("127.0.0.1", 0)).expect("client socket");
        client
            .set_read_timeout(Some(Duration::from_secs(2)))
            .expect("client timeout");
        client
    }

    #[rstest]
    fn replies_to_each_sender() {
        let listener =
            DatagramListener::bind(&SocketEndpoint::udp("127.0.0.1", 0)).expect("bind udp");
        let addr = listener.local_addr().expect("local address");
        let handle = listener.start(Arc::new(EchoHandler), 2).expect("start");

        let first = client();
        let second = client();
        first.send_to(b"ping", addr).expect("send");
        second.send_to(b"pong", addr).expect("send");

        let mut reply = [0_u8; 64];
        let (size, from) = first.recv_from(&mut reply).expect("first reply");
        assert_eq!(from, addr);
        assert_eq!(reply.get(..size), Some(&b"echo: ping"[..]));
        let (size, _) = second.recv_from(&mut reply).expect("second reply");
        assert_eq!(reply.get(..size), Some(&b"echo: pong"[..]));

        handle.shutdown();
        handle.join().expect("join listener");
    }

    /// Blocks every reply until released, counting calls.
    #[derive(Default)]
    struct GatedHandler {
        calls: AtomicUsize,
        open: Mutex<bool>,
        opened: Condvar,
    }

    impl GatedHandler {
        fn release(&self) {
            if let Ok(mut open) = self.open.lock() {
                *open = true;
                self.opened.notify_all();
            }
        }
    }

    impl DatagramHandler for GatedHandler {
        fn reply(&self, _datagram: &[u8], _peer: SocketAddr) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(open) = self.open.lock() {
                let _released = self.opened.wait_while(open, |open| !*open);
            }
            String::from("done")
        }
    }

    #[rstest]
    fn flood_is_bounded_by_the_worker_pool() {
        let listener =
            DatagramListener::bind(&SocketEndpoint::udp("127.0.0.1", 0)).expect("bind udp");
        let addr = listener.local_addr().expect("local address");
        let handler = Arc::new(GatedHandler::default());
        let handle = listener
            .start(Arc::clone(&handler) as Arc<dyn DatagramHandler>, 1)
            .expect("start");

        let sender = client();
        for _ in 0..20 {
            sender.send_to(b"x", addr).expect("send");
        }
        thread::sleep(Duration::from_millis(300));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);

        handler.release();
        handle.shutdown();
        handle.join().expect("join listener");
        assert!(handler.calls.load(Ordering::SeqCst) <= 5);
    }

    #[rstest]
    fn rejects_stream_endpoints() {
        let error = DatagramListener::bind(&SocketEndpoint::tcp("127.0.0.1", 0))
            .expect_err("tcp endpoint");
        assert!(matches!(
            error,
            ListenerError::WrongTransport {
                kind: "datagram",
                ..
            }
        ));
    }
}

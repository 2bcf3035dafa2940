//! Socket listeners for the stream and datagram endpoints.
//!
//! Both listeners bind to configured endpoints and run the same poll loop on a
//! background thread, handing each request to a bounded worker pool until
//! their [`ListenerHandle`] is shut down.

mod datagram;
mod errors;
mod handler;
mod listener;
mod pool;
mod serve;
#[cfg(test)]
mod test_utils;

use std::net::{SocketAddr, ToSocketAddrs};

pub(crate) use self::datagram::{DatagramHandler, DatagramListener};
pub(crate) use self::errors::ListenerError;
pub(crate) use self::handler::{ConnectionHandler, ConnectionStream, ReadOutcome, read_message};
pub(crate) use self::listener::StreamListener;
pub(crate) use self::serve::ListenerHandle;
#[cfg(test)]
pub(crate) use self::test_utils::{CountingHandler, EchoHandler};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");

/// Resolves `host:port` to the first address returned by the system resolver.
fn resolve(host: &str, port: u16) -> Result<SocketAddr, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    addrs.next().ok_or_else(|| ListenerError::ResolveEmpty {
        host: host.to_owned(),
        port,
    })
}

//! Request handler shared by the stream and datagram listeners.
//!
//! [`Dispatcher`] turns one raw request into one textual reply. Every failure
//! on the request path becomes the reply text; nothing is sent to the client
//! except that reply.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::services::Services;
use crate::transport::{
    ConnectionHandler, ConnectionStream, DatagramHandler, ReadOutcome, read_message,
};

use super::errors::DispatchError;
use super::request::{Envelope, decode_request};
use super::response::ResponseWriter;
use super::router::{CommandRouter, DISPATCH_TARGET, Header};

/// Size and timing bounds applied to incoming requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    /// Largest accepted request in bytes.
    pub max_bytes: usize,
    /// Stream idle time that ends a buffered request.
    pub idle_timeout: std::time::Duration,
}

impl RequestLimits {
    /// Reads the limits from the daemon configuration.
    #[must_use]
    pub fn from_config(config: &courier_config::Config) -> Self {
        Self {
            max_bytes: config.max_request_bytes(),
            idle_timeout: config.read_timeout(),
        }
    }
}

/// Decodes requests, executes commands and renders replies.
#[derive(Debug)]
pub struct Dispatcher {
    router: CommandRouter,
    limits: RequestLimits,
    connections: AtomicU64,
}

impl Dispatcher {
    /// Creates a dispatcher over the given collaborators.
    #[must_use]
    pub fn new(services: Services, limits: RequestLimits) -> Self {
        Self {
            router: CommandRouter::new(services),
            limits,
            connections: AtomicU64::new(0),
        }
    }

    /// Parses `buffer`, routes it by header and executes the command.
    ///
    /// # Errors
    ///
    /// Returns the first error met while reading the envelope, matching the
    /// header, decoding the body or running the collaborator.
    pub fn dispatch(&self, buffer: &str) -> Result<String, DispatchError> {
        let envelope = Envelope::parse(buffer)?;
        let header = Header::parse(envelope.header)?;
        self.router.route(header, envelope.body)
    }

    /// Produces the reply for raw request bytes, logging the outcome.
    pub fn respond(&self, bytes: &[u8]) -> String {
        let connection = self.next_connection();
        match self.reply_to(bytes) {
            Ok(reply) => {
                info!(
                    target: DISPATCH_TARGET,
                    connection,
                    bytes = bytes.len(),
                    "request handled"
                );
                reply
            }
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    connection,
                    client_error = error.is_client_error(),
                    %error,
                    "request failed"
                );
                error.to_string()
            }
        }
    }

    fn reply_to(&self, bytes: &[u8]) -> Result<String, DispatchError> {
        if bytes.len() > self.limits.max_bytes {
            return Err(DispatchError::request_too_large(
                bytes.len(),
                self.limits.max_bytes,
            ));
        }
        let buffer = decode_request(bytes)?;
        debug!(target: DISPATCH_TARGET, length = buffer.len(), "decoded request");
        self.dispatch(buffer)
    }

    fn next_connection(&self) -> u64 {
        self.connections.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn serve(&self, mut stream: ConnectionStream) -> Result<(), DispatchError> {
        let peer = stream.peer();
        stream.set_read_timeout(Some(self.limits.idle_timeout))?;
        match read_message(&mut stream, self.limits.max_bytes)? {
            ReadOutcome::Message(bytes) => {
                let reply = self.respond(&bytes);
                ResponseWriter::new(&mut stream).write_reply(&reply)
            }
            ReadOutcome::Empty => {
                debug!(target: DISPATCH_TARGET, %peer, "client sent no request");
                Ok(())
            }
            ReadOutcome::TooLarge { size } => {
                let error = DispatchError::request_too_large(size, self.limits.max_bytes);
                warn!(target: DISPATCH_TARGET, %peer, %error, "request rejected");
                ResponseWriter::new(&mut stream).write_error(&error)
            }
        }
    }
}

impl ConnectionHandler for Dispatcher {
    fn handle(&self, stream: ConnectionStream) {
        if let Err(error) = self.serve(stream) {
            warn!(target: DISPATCH_TARGET, %error, "connection failed");
        }
    }
}

impl DatagramHandler for Dispatcher {
    fn reply(&self, datagram: &[u8], peer: SocketAddr) -> String {
        debug!(target: DISPATCH_TARGET, %peer, "datagram received");
        self.respond(datagram)
    }
}

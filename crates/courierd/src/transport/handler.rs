//! Connection handling abstractions for the stream and datagram listeners.
//!
//! A stream connection carries exactly one message. Clients are not required
//! to frame it: the message ends when the client half-closes the connection,
//! when the stream goes idle after data has arrived, or when the configured
//! size limit is exceeded.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::net::UnixStream;

/// Number of idle periods to wait for the first byte before giving up.
const FIRST_BYTE_PERIODS: u32 = 20;
const CHUNK_SIZE: usize = 1024;

/// Stream types accepted by the stream listener.
pub(crate) enum ConnectionStream {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl ConnectionStream {
    /// Applies a read timeout to the underlying socket.
    pub(crate) fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.set_read_timeout(timeout),
            #[cfg(unix)]
            Self::Unix(stream) => stream.set_read_timeout(timeout),
        }
    }

    /// Human-readable peer description for logs.
    pub(crate) fn peer(&self) -> String {
        match self {
            Self::Tcp(stream) => stream
                .peer_addr()
                .map_or_else(|_| String::from("tcp:unknown"), |addr| addr.to_string()),
            #[cfg(unix)]
            Self::Unix(_) => String::from("unix"),
        }
    }
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Self::Unix(stream) => stream.flush(),
        }
    }
}

/// Handles accepted stream connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection. Implementations should avoid panicking.
    fn handle(&self, stream: ConnectionStream);
}

/// Result of reading one message from a stream.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ReadOutcome {
    /// A complete message.
    Message(Vec<u8>),
    /// The peer closed or stayed silent without sending anything.
    Empty,
    /// The peer sent more than the limit; `size` bytes were read.
    TooLarge { size: usize },
}

/// Reads one unframed message of at most `max_bytes` from `stream`.
///
/// The caller sets the stream's read timeout; each expiry counts as one idle
/// period.
pub(crate) fn read_message<R>(stream: &mut R, max_bytes: usize) -> io::Result<ReadOutcome>
where
    R: Read,
{
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; CHUNK_SIZE];
    let mut idle_periods = 0_u32;
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => return Ok(finish(buffer)),
            Ok(read) => {
                buffer.extend(chunk.iter().take(read));
                if buffer.len() > max_bytes {
                    return Ok(ReadOutcome::TooLarge { size: buffer.len() });
                }
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) if is_timeout(&error) => {
                if !buffer.is_empty() {
                    return Ok(ReadOutcome::Message(buffer));
                }
                idle_periods += 1;
                if idle_periods >= FIRST_BYTE_PERIODS {
                    return Ok(ReadOutcome::Empty);
                }
            }
            Err(error) => return Err(error),
        }
    }
}

fn finish(buffer: Vec<u8>) -> ReadOutcome {
    if buffer.is_empty() {
        ReadOutcome::Empty
    } else {
        ReadOutcome::Message(buffer)
    }
}

fn is_timeout(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

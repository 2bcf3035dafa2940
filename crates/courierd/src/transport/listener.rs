//! Stream listener for TCP and Unix socket endpoints.
//!
//! Courier serves exactly one stream endpoint per daemon. The socket accepts
//! in non-blocking mode so the shared poll loop can notice shutdown, and each
//! accepted connection becomes one pool job carrying one request.

use std::io;
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use courier_config::SocketEndpoint;

use super::pool::Job;
use super::serve::{self, Intake, ListenerHandle};
use super::{ConnectionHandler, ConnectionStream, ListenerError, resolve};

#[cfg(unix)]
use camino::Utf8Path;
#[cfg(unix)]
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::FileTypeExt;
#[cfg(unix)]
use std::os::unix::net::{UnixListener, UnixStream};

/// Pause between accept attempts while no client is waiting.
const ACCEPT_POLL: Duration = Duration::from_millis(25);

/// Listener bound to the configured stream endpoint.
#[derive(Debug)]
pub(crate) struct StreamListener {
    endpoint: SocketEndpoint,
    socket: StreamSocket,
}

#[derive(Debug)]
enum StreamSocket {
    Tcp(TcpListener),
    #[cfg(unix)]
    Unix(UnixListener),
}

impl StreamSocket {
    fn set_nonblocking(&self) -> io::Result<()> {
        match self {
            Self::Tcp(listener) => listener.set_nonblocking(true),
            #[cfg(unix)]
            Self::Unix(listener) => listener.set_nonblocking(true),
        }
    }

    fn accept(&self) -> io::Result<ConnectionStream> {
        match self {
            Self::Tcp(listener) => {
                let (stream, _) = listener.accept()?;
                stream.set_nonblocking(false)?;
                Ok(ConnectionStream::Tcp(stream))
            }
            #[cfg(unix)]
            Self::Unix(listener) => {
                let (stream, _) = listener.accept()?;
                stream.set_nonblocking(false)?;
                Ok(ConnectionStream::Unix(stream))
            }
        }
    }
}

impl StreamListener {
    /// Binds a `tcp://` or `unix://` endpoint.
    ///
    /// A leftover Unix socket file is reclaimed when no daemon answers on it.
    pub(crate) fn bind(endpoint: &SocketEndpoint) -> Result<Self, ListenerError> {
        let socket = match endpoint {
            SocketEndpoint::Tcp { host, port } => {
                let addr = resolve(host, *port)?;
                let listener = TcpListener::bind(addr)
                    .map_err(|source| ListenerError::BindTcp { addr, source })?;
                StreamSocket::Tcp(listener)
            }
            #[cfg(unix)]
            SocketEndpoint::Unix { path } => StreamSocket::Unix(bind_unix(path)?),
            #[cfg(not(unix))]
            SocketEndpoint::Unix { .. } => {
                return Err(ListenerError::UnsupportedUnix {
                    endpoint: endpoint.to_string(),
                });
            }
            SocketEndpoint::Udp { .. } => {
                return Err(ListenerError::WrongTransport {
                    endpoint: endpoint.to_string(),
                    kind: "stream",
                });
            }
        };
        Ok(Self {
            endpoint: endpoint.clone(),
            socket,
        })
    }

    #[cfg(test)]
    pub(crate) fn local_addr(&self) -> Option<std::net::SocketAddr> {
        match &self.socket {
            StreamSocket::Tcp(listener) => listener.local_addr().ok(),
            #[cfg(unix)]
            StreamSocket::Unix(_) => None,
        }
    }

    pub(crate) fn endpoint(&self) -> &SocketEndpoint {
        &self.endpoint
    }

    /// Serves connections with `handler` on `workers` pool threads.
    pub(crate) fn start(
        mut self,
        handler: Arc<dyn ConnectionHandler>,
        workers: usize,
    ) -> Result<ListenerHandle, ListenerError> {
        if let Err(source) = self.socket.set_nonblocking() {
            self.close();
            return Err(ListenerError::NonBlocking { source });
        }
        Ok(serve::spawn(StreamIntake { listener: self, handler }, workers))
    }

    fn close(&mut self) {
        #[cfg(unix)]
        if let SocketEndpoint::Unix { path } = &self.endpoint {
            remove_socket_file(path);
        }
    }
}

struct StreamIntake {
    listener: StreamListener,
    handler: Arc<dyn ConnectionHandler>,
}

impl Intake for StreamIntake {
    const KIND: &'static str = "stream";

    fn endpoint(&self) -> &SocketEndpoint {
        &self.listener.endpoint
    }

    fn next_job(&mut self) -> io::Result<Option<Job>> {
        match self.listener.socket.accept() {
            Ok(stream) => {
                let handler = Arc::clone(&self.handler);
                Ok(Some(Box::new(move || handler.handle(stream))))
            }
            Err(error) if error.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    fn close(&mut self) {
        self.listener.close();
    }
}

#[cfg(unix)]
fn bind_unix(path: &Utf8Path) -> Result<UnixListener, ListenerError> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_socket() => reclaim_stale_socket(path)?,
        Ok(_) => {
            return Err(ListenerError::UnixNotSocket {
                path: path.to_string(),
            });
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(ListenerError::UnixMetadata {
                path: path.to_string(),
                source,
            });
        }
    }
    UnixListener::bind(path).map_err(|source| ListenerError::BindUnix {
        path: path.to_string(),
        source,
    })
}

/// Removes a socket file whose daemon no longer accepts connections.
#[cfg(unix)]
fn reclaim_stale_socket(path: &Utf8Path) -> Result<(), ListenerError> {
    match UnixStream::connect(path) {
        Ok(_) => Err(ListenerError::UnixInUse {
            path: path.to_string(),
        }),
        Err(error)
            if matches!(
                error.kind(),
                io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound
            ) =>
        {
            fs::remove_file(path).map_err(|source| ListenerError::UnixCleanup {
                path: path.to_string(),
                source,
            })
        }
        Err(source) => Err(ListenerError::UnixConnect {
            path: path.to_string(),
            source,
        }),
    }
}

#[cfg(unix)]
fn remove_socket_file(path: &Utf8Path) {
    if let Err(error) = fs::remove_file(path)
        && error.kind() != io::ErrorKind::NotFound
    {
        tracing::warn!(
            target: super::LISTENER_TARGET,
            error = %error,
            path = %path,
            "failed to remove unix socket file"
        );
    }
}

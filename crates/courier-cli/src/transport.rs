//! Socket transport helpers for the courier CLI.
//!
//! A stream request is written in full and the write half is closed so the
//! daemon sees the end of the message; the reply is read until the daemon
//! closes the connection. A datagram request is one packet answered by one
//! packet.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use courier_config::{Config, SocketEndpoint};

#[cfg(unix)]
use std::os::unix::net::UnixStream;

#[cfg(unix)]
use socket2::{Domain, SockAddr, Socket, Type};

use crate::cli::Transport;
use crate::errors::AppError;

pub(crate) const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);
/// Mail delivery blocks the reply, so this exceeds the daemon's HTTP timeout.
pub(crate) const REPLY_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_DATAGRAM_BYTES: usize = 65_507;

pub(crate) enum Connection {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Connection {
    fn set_read_timeout(&self, timeout: Duration) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.set_read_timeout(Some(timeout)),
            #[cfg(unix)]
            Self::Unix(stream) => stream.set_read_timeout(Some(timeout)),
        }
    }

    fn finish_request(&self) -> io::Result<()> {
        match self {
            Self::Tcp(stream) => stream.shutdown(Shutdown::Write),
            #[cfg(unix)]
            Self::Unix(stream) => stream.shutdown(Shutdown::Write),
        }
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Self::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for Connection {
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

/// Sends `request` over the selected transport and returns the reply text.
pub(crate) fn send_request(
    transport: Transport,
    config: &Config,
    request: &str,
) -> Result<String, AppError> {
    match transport {
        Transport::Stream => send_stream(config.stream_socket(), request),
        Transport::Datagram => send_datagram(config.datagram_socket(), request),
    }
}

fn send_stream(endpoint: &SocketEndpoint, request: &str) -> Result<String, AppError> {
    let mut connection = connect(endpoint)?;
    connection
        .set_read_timeout(REPLY_TIMEOUT)
        .map_err(AppError::ReadResponse)?;
    connection
        .write_all(request.as_bytes())
        .and_then(|()| connection.flush())
        .and_then(|()| connection.finish_request())
        .map_err(AppError::SendRequest)?;
    let mut reply = String::new();
    connection
        .read_to_string(&mut reply)
        .map_err(AppError::ReadResponse)?;
    Ok(reply)
}

pub(crate) fn connect(endpoint: &SocketEndpoint) -> Result<Connection, AppError> {
    match endpoint {
        SocketEndpoint::Tcp { host, port } => {
            let address = resolve(endpoint, host, *port)?;
            TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT)
                .map(Connection::Tcp)
                .map_err(|source| AppError::Connect {
                    endpoint: endpoint.to_string(),
                    source,
                })
        }
        SocketEndpoint::Unix { path } => {
            #[cfg(unix)]
            {
                connect_unix(path.as_str()).map_err(|source| AppError::Connect {
                    endpoint: endpoint.to_string(),
                    source,
                })
            }

            #[cfg(not(unix))]
            {
                let _ = path;
                Err(AppError::UnsupportedUnixTransport(endpoint.to_string()))
            }
        }
        SocketEndpoint::Udp { .. } => Err(AppError::WrongTransport {
            endpoint: endpoint.to_string(),
            expected: "stream",
        }),
    }
}

fn send_datagram(endpoint: &SocketEndpoint, request: &str) -> Result<String, AppError> {
    let SocketEndpoint::Udp { host, port } = endpoint else {
        return Err(AppError::WrongTransport {
            endpoint: endpoint.to_string(),
            expected: "datagram",
        });
    };
    let address = resolve(endpoint, host, *port)?;
    let local: SocketAddr = if address.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0_u16; 8], 0))
    };
    let socket = UdpSocket::bind(local).map_err(AppError::Bind)?;
    socket
        .set_read_timeout(Some(REPLY_TIMEOUT))
        .map_err(AppError::ReadResponse)?;
    socket
        .send_to(request.as_bytes(), address)
        .map_err(AppError::SendRequest)?;

    let mut buffer = vec![0_u8; MAX_DATAGRAM_BYTES];
    let (size, _) = socket
        .recv_from(&mut buffer)
        .map_err(AppError::ReadResponse)?;
    buffer.truncate(size);
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn resolve(endpoint: &SocketEndpoint, host: &str, port: u16) -> Result<SocketAddr, AppError> {
    (host, port)
        .to_socket_addrs()
        .and_then(|mut addrs| {
            addrs.next().ok_or_else(|| {
                io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses")
            })
        })
        .map_err(|source| AppError::Resolve {
            endpoint: endpoint.to_string(),
            source,
        })
}

#[cfg(unix)]
fn connect_unix(path: &str) -> io::Result<Connection> {
    let socket = Socket::new(Domain::UNIX, Type::STREAM, None)?;
    let address = SockAddr::unix(path)?;
    socket.connect_timeout(&address, CONNECTION_TIMEOUT)?;
    let stream: UnixStream = socket.into();
    Ok(Connection::Unix(stream))
}

use std::fmt;
use std::fs::DirBuilder;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

/// Declarative configuration for a listening or connecting socket.
///
/// Deserializes from either a URL string such as `tcp://127.0.0.1:8080`
/// (the form environment variables and flags use) or a table tagged by
/// `transport`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum SocketEndpoint {
    /// Unix domain stream socket.
    Unix {
        /// Filesystem path of the socket.
        path: Utf8PathBuf,
    },
    /// TCP stream socket.
    Tcp {
        /// Host name or address.
        host: String,
        /// Port number.
        port: u16,
    },
    /// UDP datagram socket.
    Udp {
        /// Host name or address.
        host: String,
        /// Port number.
        port: u16,
    },
}

impl SocketEndpoint {
    /// Builds a Unix domain socket endpoint.
    #[must_use]
    pub fn unix(path: impl Into<Utf8PathBuf>) -> Self {
        Self::Unix { path: path.into() }
    }

    /// Builds a TCP socket endpoint.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::Tcp {
            host: host.into(),
            port,
        }
    }

    /// Builds a UDP socket endpoint.
    #[must_use]
    pub fn udp(host: impl Into<String>, port: u16) -> Self {
        Self::Udp {
            host: host.into(),
            port,
        }
    }

    /// Returns `true` when the endpoint carries datagrams rather than a stream.
    #[must_use]
    pub const fn is_datagram(&self) -> bool {
        matches!(self, Self::Udp { .. })
    }

    /// Returns the Unix socket path when the endpoint uses the Unix transport.
    #[must_use]
    pub fn unix_path(&self) -> Option<&Utf8Path> {
        match self {
            Self::Unix { path } => Some(path.as_ref()),
            Self::Tcp { .. } | Self::Udp { .. } => None,
        }
    }

    /// Returns `host:port` for network endpoints.
    #[must_use]
    pub fn network_address(&self) -> Option<String> {
        match self {
            Self::Tcp { host, port } | Self::Udp { host, port } => Some(format!("{host}:{port}")),
            Self::Unix { .. } => None,
        }
    }

    /// Ensures a Unix socket's parent directory exists with restrictive
    /// permissions. Network endpoints need no preparation.
    ///
    /// # Errors
    ///
    /// Returns [`SocketPreparationError`] when the path has no parent or the
    /// directory cannot be created.
    pub fn prepare_filesystem(&self) -> Result<(), SocketPreparationError> {
        let Some(path) = self.unix_path() else {
            return Ok(());
        };
        let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) else {
            return Err(SocketPreparationError::MissingParent {
                path: path.to_path_buf(),
            });
        };

        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }

        if let Err(source) = builder.create(parent.as_std_path())
            && source.kind() != std::io::ErrorKind::AlreadyExists
        {
            return Err(SocketPreparationError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            });
        }

        Ok(())
    }
}

impl fmt::Display for SocketEndpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix { path } => write!(formatter, "unix://{path}"),
            Self::Tcp { host, port } => write!(formatter, "tcp://{host}:{port}"),
            Self::Udp { host, port } => write!(formatter, "udp://{host}:{port}"),
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
enum TaggedEndpoint {
    Unix { path: Utf8PathBuf },
    Tcp { host: String, port: u16 },
    Udp { host: String, port: u16 },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EndpointRepr {
    Url(String),
    Tagged(TaggedEndpoint),
}

impl<'de> Deserialize<'de> for SocketEndpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match EndpointRepr::deserialize(deserializer)? {
            EndpointRepr::Url(text) => text.parse().map_err(serde::de::Error::custom),
            EndpointRepr::Tagged(TaggedEndpoint::Unix { path }) => Ok(Self::Unix { path }),
            EndpointRepr::Tagged(TaggedEndpoint::Tcp { host, port }) => Ok(Self::Tcp { host, port }),
            EndpointRepr::Tagged(TaggedEndpoint::Udp { host, port }) => Ok(Self::Udp { host, port }),
        }
    }
}

impl FromStr for SocketEndpoint {
    type Err = SocketParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(input)?;
        match url.scheme() {
            "unix" => {
                let path = url.path();
                if path.is_empty() {
                    return Err(SocketParseError::MissingUnixPath(input.to_owned()));
                }
                Ok(Self::unix(path))
            }
            "tcp" => {
                let (host, port) = host_and_port(&url, input)?;
                Ok(Self::tcp(host, port))
            }
            "udp" => {
                let (host, port) = host_and_port(&url, input)?;
                Ok(Self::udp(host, port))
            }
            other => Err(SocketParseError::UnsupportedScheme(other.to_owned())),
        }
    }
}

fn host_and_port<'u>(url: &'u Url, input: &str) -> Result<(&'u str, u16), SocketParseError> {
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| SocketParseError::MissingHost(input.to_owned()))?;
    let port = url
        .port()
        .ok_or_else(|| SocketParseError::MissingPort(input.to_owned()))?;
    Ok((host, port))
}

/// Errors encountered while parsing a [`SocketEndpoint`] from text.
#[derive(Debug, Error)]
pub enum SocketParseError {
    /// Scheme was not recognised.
    #[error("unsupported socket scheme '{0}'")]
    UnsupportedScheme(String),
    /// Host name was missing.
    #[error("missing host in '{0}'")]
    MissingHost(String),
    /// Port was missing from the address.
    #[error("missing port in '{0}'")]
    MissingPort(String),
    /// Unix socket path was absent.
    #[error("missing Unix socket path in '{0}'")]
    MissingUnixPath(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

/// Errors raised when preparing socket directories.
#[derive(Debug, Error)]
pub enum SocketPreparationError {
    /// Parent directory is missing when creating a Unix socket path.
    #[error("socket path '{path}' has no parent directory")]
    MissingParent {
        /// The socket path.
        path: Utf8PathBuf,
    },
    /// Failed to create or adjust socket directories.
    #[error("failed to create socket directory '{path}': {source}")]
    CreateDirectory {
        /// The directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

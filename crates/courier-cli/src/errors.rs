//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use courier_wire::WireError;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to compose request: {0}")]
    Compose(#[source] WireError),
    #[error("failed to read request from stdin: {0}")]
    ReadInput(#[source] io::Error),
    #[error("raw requires a request on stdin")]
    MissingRawInput,
    #[error("endpoint {endpoint} cannot carry {expected} requests")]
    WrongTransport {
        endpoint: String,
        expected: &'static str,
    },
    #[error("failed to resolve daemon address {endpoint}: {source}")]
    Resolve { endpoint: String, source: io::Error },
    #[error("failed to connect to daemon at {endpoint}: {source}")]
    Connect { endpoint: String, source: io::Error },
    #[cfg(not(unix))]
    #[error("platform does not support Unix sockets: {0}")]
    UnsupportedUnixTransport(String),
    #[error("failed to open datagram socket: {0}")]
    Bind(#[source] io::Error),
    #[error("failed to send request to daemon: {0}")]
    SendRequest(#[source] io::Error),
    #[error("failed to read response from daemon: {0}")]
    ReadResponse(#[source] io::Error),
    #[error("failed to write reply: {0}")]
    WriteReply(#[source] io::Error),
}

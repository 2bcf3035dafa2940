//! Shared configuration for the courier daemon and client.
//!
//! [`Config`] is loaded through `ortho_config`, which layers built-in
//! defaults, an optional `courier.toml` (located with `--config-path` or
//! `COURIER_CONFIG_PATH`), `COURIER_*` environment variables and command-line
//! flags, in increasing order of precedence.

mod defaults;
mod logging;
mod socket;

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_DATAGRAM_PORT, DEFAULT_FILES_DIR, DEFAULT_HOST, DEFAULT_LOG_FILTER,
    DEFAULT_MAIL_API_URL, DEFAULT_MAIL_SENDER_NAME, DEFAULT_MAX_REQUEST_BYTES,
    DEFAULT_READ_TIMEOUT_MS, DEFAULT_STREAM_PORT, DEFAULT_WORKER_THREADS, default_datagram_socket, default_files_dir,
    default_log_filter, default_log_filter_string, default_log_format, default_mail_api_url,
    default_mail_sender_name, default_stream_socket,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Flags that configure the client rather than select its command.
pub const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--stream-socket",
    "--datagram-socket",
    "--log-filter",
    "--log-format",
    "--read-timeout-ms",
];

/// Runtime configuration shared by `courierd` and `courier`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "COURIER")]
pub struct Config {
    /// Endpoint of the stream listener (TCP or Unix socket).
    #[ortho_config(default = default_stream_socket())]
    pub stream_socket: SocketEndpoint,
    /// Endpoint of the datagram listener (UDP).
    #[ortho_config(default = default_datagram_socket())]
    pub datagram_socket: SocketEndpoint,
    /// Directory holding files created by `addfile`.
    #[ortho_config(default = default_files_dir())]
    pub files_dir: Utf8PathBuf,
    /// Largest request accepted on either transport.
    #[ortho_config(default = DEFAULT_MAX_REQUEST_BYTES)]
    pub max_request_bytes: u64,
    /// Idle time after which a buffered stream request is dispatched.
    #[ortho_config(default = DEFAULT_READ_TIMEOUT_MS)]
    pub read_timeout_ms: u64,
    /// Requests each listener serves at once; further requests wait in a
    /// short backlog and are dropped when it is full.
    #[ortho_config(default = DEFAULT_WORKER_THREADS)]
    pub worker_threads: usize,
    /// `tracing` filter directive.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log record format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// MailerSend API endpoint.
    #[ortho_config(default = default_mail_api_url())]
    pub mail_api_url: String,
    /// MailerSend API token. Mail is disabled when absent.
    pub mail_api_key: Option<String>,
    /// Domain used for the `noreply@` sender address. Mail is disabled when
    /// absent.
    pub mail_domain: Option<String>,
    /// Display name of the sender.
    #[ortho_config(default = default_mail_sender_name())]
    pub mail_sender_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stream_socket: default_stream_socket(),
            datagram_socket: default_datagram_socket(),
            files_dir: default_files_dir(),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            worker_threads: DEFAULT_WORKER_THREADS,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            mail_api_url: default_mail_api_url(),
            mail_api_key: None,
            mail_domain: None,
            mail_sender_name: default_mail_sender_name(),
        }
    }
}

/// Credentials needed to deliver mail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailCredentials<'a> {
    /// API endpoint.
    pub api_url: &'a str,
    /// Bearer token.
    pub api_key: &'a str,
    /// Sender domain.
    pub domain: &'a str,
    /// Sender display name.
    pub sender_name: &'a str,
}

impl Config {
    /// Stream endpoint.
    #[must_use]
    pub const fn stream_socket(&self) -> &SocketEndpoint {
        &self.stream_socket
    }

    /// Datagram endpoint.
    #[must_use]
    pub const fn datagram_socket(&self) -> &SocketEndpoint {
        &self.datagram_socket
    }

    /// `tracing` filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log record format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Stream idle timeout as a [`Duration`]; zero is raised to one millisecond.
    #[must_use]
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms.max(1))
    }

    /// Worker threads per listener; zero is raised to one.
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        self.worker_threads.max(1)
    }

    /// Request size limit as a `usize`, saturating on narrow targets.
    #[must_use]
    pub fn max_request_bytes(&self) -> usize {
        usize::try_from(self.max_request_bytes).unwrap_or(usize::MAX)
    }

    /// Returns mail credentials when both the API key and domain are set.
    #[must_use]
    pub fn mail_credentials(&self) -> Option<MailCredentials<'_>> {
        let api_key = self.mail_api_key.as_deref().filter(|key| !key.is_empty())?;
        let domain = self.mail_domain.as_deref().filter(|domain| !domain.is_empty())?;
        Some(MailCredentials {
            api_url: &self.mail_api_url,
            api_key,
            domain,
            sender_name: &self.mail_sender_name,
        })
    }
}

use camino::Utf8PathBuf;

use crate::logging::LogFormat;
use crate::socket::SocketEndpoint;

/// Default TCP port for the stream listener.
pub const DEFAULT_STREAM_PORT: u16 = 8080;

/// Default UDP port for the datagram listener.
pub const DEFAULT_DATAGRAM_PORT: u16 = 8081;

/// Address both listeners bind by default.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Directory, relative to the working directory, holding stored files.
pub const DEFAULT_FILES_DIR: &str = "files";

/// Largest request accepted, matching the largest UDP payload.
pub const DEFAULT_MAX_REQUEST_BYTES: u64 = 65_507;

/// Idle time after which a stream request is considered complete.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 500;

/// Worker threads serving each listener.
pub const DEFAULT_WORKER_THREADS: usize = 8;

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// MailerSend API endpoint used when none is configured.
pub const DEFAULT_MAIL_API_URL: &str = "https://api.mailersend.com/v1/email";

/// Display name placed in the `from` field of outgoing mail.
pub const DEFAULT_MAIL_SENDER_NAME: &str = "Courier";

/// Default stream endpoint: `tcp://127.0.0.1:8080`.
#[must_use]
pub fn default_stream_socket() -> SocketEndpoint {
    SocketEndpoint::tcp(DEFAULT_HOST, DEFAULT_STREAM_PORT)
}

/// Default datagram endpoint: `udp://127.0.0.1:8081`.
#[must_use]
pub fn default_datagram_socket() -> SocketEndpoint {
    SocketEndpoint::udp(DEFAULT_HOST, DEFAULT_DATAGRAM_PORT)
}

/// Default storage directory.
#[must_use]
pub fn default_files_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_FILES_DIR)
}

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Owned MailerSend endpoint.
#[must_use]
pub fn default_mail_api_url() -> String {
    DEFAULT_MAIL_API_URL.to_owned()
}

/// Owned sender display name.
#[must_use]
pub fn default_mail_sender_name() -> String {
    DEFAULT_MAIL_SENDER_NAME.to_owned()
}

//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use courier_config::{Config, SocketEndpoint};

use crate::bootstrap::ConfigLoader;

/// Loader that places the stream socket and files directory in a temporary
/// directory and binds the datagram listener to an ephemeral port.
pub struct TestConfigLoader {
    dir: TempDir,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temporary directory");
        Self { dir }
    }

    /// Configuration rooted in the temporary directory.
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            stream_socket: SocketEndpoint::unix(self.stream_socket_path()),
            datagram_socket: SocketEndpoint::udp("127.0.0.1", 0),
            files_dir: self.files_dir(),
            ..Config::default()
        }
    }

    /// Path of the Unix stream socket.
    #[must_use]
    pub fn stream_socket_path(&self) -> Utf8PathBuf {
        self.path("run/courierd.sock")
    }

    /// Directory served by `addfile` and `removefile`.
    #[must_use]
    pub fn files_dir(&self) -> Utf8PathBuf {
        self.path("files")
    }

    fn path(&self, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.dir.path().join(name))
            .expect("temporary path was not valid UTF-8")
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config())
    }
}

/// Loader that intentionally fails by passing invalid CLI arguments.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("courierd"),
            OsString::from("--stream-socket"),
            OsString::from("invalid://socket"),
        ];
        Config::load_from_iter(args)
    }
}

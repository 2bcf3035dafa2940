//! Flat file storage for the `addfile` and `removefile` commands.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::info;

use super::SERVICES_TARGET;

/// Errors raised by a [`FileStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file to remove does not exist.
    #[error("file not found: {name}")]
    NotFound {
        /// The requested file name.
        name: String,
    },
    /// The name would escape the storage directory.
    #[error("invalid filename: {name}")]
    InvalidName {
        /// The rejected file name.
        name: String,
    },
    /// The filesystem operation failed.
    #[error("failed to {action} '{path}': {source}")]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// Path involved.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Creates and removes named files.
pub trait FileStore: Send + Sync {
    /// Writes `content` to `name`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the file cannot be written.
    fn create(&self, name: &str, content: &str) -> Result<(), StorageError>;

    /// Deletes `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when the file is absent.
    fn remove(&self, name: &str) -> Result<(), StorageError>;
}

/// [`FileStore`] backed by a single directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: Utf8PathBuf,
}

impl DirectoryStore {
    /// Stores files under `root`, which is created on first write.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<Utf8PathBuf, StorageError> {
        let invalid = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(StorageError::InvalidName {
                name: name.to_owned(),
            });
        }
        Ok(self.root.join(name))
    }
}

impl FileStore for DirectoryStore {
    fn create(&self, name: &str, content: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.root).map_err(|source| StorageError::Io {
            action: "create directory",
            path: self.root.clone(),
            source,
        })?;
        fs::write(&path, content).map_err(|source| StorageError::Io {
            action: "write",
            path: path.clone(),
            source,
        })?;
        info!(
            target: SERVICES_TARGET,
            file = %path,
            bytes = content.len(),
            "file stored"
        );
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(target: SERVICES_TARGET, file = %path, "file removed");
                Ok(())
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Err(StorageError::NotFound {
                name: name.to_owned(),
            }),
            Err(source) => Err(StorageError::Io {
                action: "remove",
                path,
                source,
            }),
        }
    }
}

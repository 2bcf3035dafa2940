//! `addfile` and `removefile` commands.

use courier_wire::{Fragment, ShapeRules, read_fields};

use crate::dispatch::errors::DispatchError;
use crate::services::FileStore;

pub(crate) const FILE_ADDED: &str = "File added successfully";
pub(crate) const FILE_REMOVED: &str = "File removed successfully";

/// Rejects names that would leave the store's directory.
fn checked_filename(name: &str) -> Result<&str, DispatchError> {
    if name.contains(['/', '\\']) {
        return Err(DispatchError::path_traversal(name));
    }
    Ok(name)
}

/// Decoded `addfile` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddFileCommand<'a> {
    /// Name of the file inside the store.
    pub filename: &'a str,
    /// Text written to the file.
    pub content: &'a str,
}

impl<'a> AddFileCommand<'a> {
    /// Reads `filename` and `content` from the body.
    ///
    /// # Errors
    ///
    /// Fails on malformed bodies and on filenames containing a path separator.
    pub fn decode(body: Fragment<'a>) -> Result<Self, DispatchError> {
        let fields = read_fields(body, 0, &ShapeRules::scalars(), &["filename", "content"])?;
        Ok(Self {
            filename: checked_filename(fields.scalar("filename")?)?,
            content: fields.scalar("content")?,
        })
    }

    /// Writes the file, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Propagates the store's error.
    pub fn execute(&self, store: &dyn FileStore) -> Result<String, DispatchError> {
        store.create(self.filename, self.content)?;
        Ok(FILE_ADDED.to_owned())
    }
}

/// Decoded `removefile` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveFileCommand<'a> {
    /// Name of the file inside the store.
    pub filename: &'a str,
}

impl<'a> RemoveFileCommand<'a> {
    /// Reads `filename` from the body.
    ///
    /// # Errors
    ///
    /// Fails on malformed bodies and on filenames containing a path separator.
    pub fn decode(body: Fragment<'a>) -> Result<Self, DispatchError> {
        let fields = read_fields(body, 0, &ShapeRules::scalars(), &["filename"])?;
        Ok(Self {
            filename: checked_filename(fields.scalar("filename")?)?,
        })
    }

    /// Deletes the file.
    ///
    /// # Errors
    ///
    /// Propagates the store's error, including its not-found error.
    pub fn execute(&self, store: &dyn FileStore) -> Result<String, DispatchError> {
        store.remove(self.filename)?;
        Ok(FILE_REMOVED.to_owned())
    }
}

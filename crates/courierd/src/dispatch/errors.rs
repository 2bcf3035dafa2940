//! Error types for request decoding and command dispatch.
//!
//! Every variant renders as the reply text sent back to the client, so the
//! messages are phrased for the sender of the request.

use std::io;

use thiserror::Error;

use courier_wire::WireError;

use crate::services::{MailError, StorageError};

/// Errors surfaced while decoding or executing a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request text is malformed.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// The `header` value names no known command.
    #[error("unknown header: {header}")]
    UnknownHeader {
        /// The header as sent.
        header: String,
    },

    /// A field holds a value outside its permitted set.
    #[error("invalid '{field}' field value {value}, expected: {}", allowed.join(", "))]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Value as sent.
        value: String,
        /// Accepted values.
        allowed: &'static [&'static str],
    },

    /// A filename contains a path separator.
    #[error("invalid filename: {filename}")]
    PathTraversalRejected {
        /// The rejected name.
        filename: String,
    },

    /// The file store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Mail delivery failed.
    #[error(transparent)]
    Mail(#[from] MailError),

    /// The request bytes are not UTF-8.
    #[error("request is not valid UTF-8 at byte {position}")]
    NotUtf8 {
        /// Offset of the first invalid byte.
        position: usize,
    },

    /// The request exceeds the configured size limit.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Bytes received before giving up.
        size: usize,
        /// Configured limit.
        max_size: usize,
    },

    /// Reading the request or writing the reply failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DispatchError {
    /// Creates an unknown header error.
    pub fn unknown_header(header: impl Into<String>) -> Self {
        Self::UnknownHeader {
            header: header.into(),
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        field: &'static str,
        value: impl Into<String>,
        allowed: &'static [&'static str],
    ) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
            allowed,
        }
    }

    /// Creates a path traversal error.
    pub fn path_traversal(filename: impl Into<String>) -> Self {
        Self::PathTraversalRejected {
            filename: filename.into(),
        }
    }

    /// Creates a request too large error.
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Returns `true` when the error stems from the request text rather than a
    /// collaborator.
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Wire(_)
                | Self::UnknownHeader { .. }
                | Self::InvalidValue { .. }
                | Self::PathTraversalRejected { .. }
                | Self::NotUtf8 { .. }
                | Self::RequestTooLarge { .. }
        )
    }
}

//! Header routing for command dispatch.
//!
//! The envelope's `header` literal selects one of the command decoders. Header
//! matching is exact; unknown headers become an error reply.

use courier_wire::Fragment;
use tracing::debug;

use crate::services::Services;

use super::commands::{AddFileCommand, MailCommand, MorseCommand, RemoveFileCommand};
use super::errors::DispatchError;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Known command headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    /// Morse conversion.
    Morse,
    /// File creation.
    AddFile,
    /// File removal.
    RemoveFile,
    /// Mail delivery.
    Mail,
}

impl Header {
    /// Parses a header literal.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownHeader`] for anything but the four
    /// command names.
    pub fn parse(value: &str) -> Result<Self, DispatchError> {
        match value {
            "morse" => Ok(Self::Morse),
            "addfile" => Ok(Self::AddFile),
            "removefile" => Ok(Self::RemoveFile),
            "mail" => Ok(Self::Mail),
            _ => Err(DispatchError::unknown_header(value)),
        }
    }

    /// Returns the wire literal.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morse => "morse",
            Self::AddFile => "addfile",
            Self::RemoveFile => "removefile",
            Self::Mail => "mail",
        }
    }
}

/// Routes decoded envelopes to their commands.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    services: Services,
}

impl CommandRouter {
    /// Creates a router over the given collaborators.
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Decodes `body` for `header` and executes the command.
    ///
    /// # Errors
    ///
    /// Returns the decoder's or collaborator's error.
    pub fn route(&self, header: Header, body: Fragment<'_>) -> Result<String, DispatchError> {
        debug!(
            target: DISPATCH_TARGET,
            header = header.as_str(),
            body_offset = body.base(),
            "routing request"
        );
        match header {
            Header::Morse => {
                let command = MorseCommand::decode(body)?;
                Ok(command.execute(self.services.morse.as_ref()))
            }
            Header::AddFile => AddFileCommand::decode(body)?.execute(self.services.files.as_ref()),
            Header::RemoveFile => {
                RemoveFileCommand::decode(body)?.execute(self.services.files.as_ref())
            }
            Header::Mail => MailCommand::decode(body)?.execute(self.services.mail.as_ref()),
        }
    }
}

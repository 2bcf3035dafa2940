//! Per-command body decoders.
//!
//! Each decoder re-reads the `body` fragment with its own field list and shape
//! rules, then invokes one collaborator. Nothing is executed until the whole
//! body has been read.

mod files;
mod mail;
mod morse;

pub use self::files::{AddFileCommand, RemoveFileCommand};
pub use self::mail::MailCommand;
pub use self::morse::{MorseCommand, Target};

#[cfg(test)]
pub(crate) use self::files::{FILE_ADDED, FILE_REMOVED};
#[cfg(test)]
pub(crate) use self::mail::MAIL_SENT;

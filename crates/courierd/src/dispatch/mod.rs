//! Request dispatch for the courier wire format.
//!
//! A request is one `header`/`body` envelope:
//!
//! ```text
//! header: "addfile",
//! body: {
//!     filename: "notes.txt",
//!     content: "remember the milk"
//! }
//! ```
//!
//! The dispatcher reads the envelope, routes on the exact `header` literal to
//! one of the command decoders (`morse`, `addfile`, `removefile`, `mail`) and
//! answers with a single line of text: the command's result, or the error
//! that stopped it. Error positions always refer to the original request
//! buffer.

mod commands;
mod errors;
mod handler;
mod request;
mod response;
mod router;

pub use self::commands::{AddFileCommand, MailCommand, MorseCommand, RemoveFileCommand, Target};
pub use self::errors::DispatchError;
pub use self::handler::{Dispatcher, RequestLimits};
pub use self::request::{Envelope, decode_request};
pub use self::router::Header;

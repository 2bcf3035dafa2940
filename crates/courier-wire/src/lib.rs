//! Reader and composer for the courier text wire format.
//!
//! A courier message is a flat record of `key: value` pairs where a value is
//! either a double-quoted string, a bare run terminated by a comma, or a
//! brace-delimited nested object:
//!
//! ```text
//! header: "mail",
//! body: {
//!     subject: "hello",
//!     message: "hi there",
//!     to: { name: "Ada", email: "ada@example.com" }
//! }
//! ```
//!
//! The format has no numbers, arrays, or escape sequences. Every error carries
//! the absolute byte offset into the request buffer, however deeply the
//! failing field is nested, because readers work on [`Fragment`]s that know
//! their own base offset.
//!
//! # Example
//!
//! ```
//! use courier_wire::{Fragment, ShapeRules, read_fields};
//!
//! let buffer = r#"header: "morse", body: { message: "sos", to: "morse" }"#;
//! let envelope = read_fields(
//!     Fragment::new(buffer),
//!     0,
//!     &ShapeRules::objects(&["body"]),
//!     &["header", "body"],
//! )?;
//! assert_eq!(envelope.scalar("header")?, "morse");
//!
//! let body = read_fields(
//!     envelope.object("body")?,
//!     0,
//!     &ShapeRules::scalars(),
//!     &["message", "to"],
//! )?;
//! assert_eq!(body.scalar("message")?, "sos");
//! # Ok::<(), courier_wire::WireError>(())
//! ```

pub mod compose;
mod error;
mod field;
mod fragment;
mod record;
pub mod scanner;

pub use error::{ShapeKind, WireError};
pub use field::{Field, ReadField, Shape, read_field};
pub use fragment::Fragment;
pub use record::{FieldSet, ShapeRules, ShapeValidator, read_fields};

#[cfg(test)]
mod tests;

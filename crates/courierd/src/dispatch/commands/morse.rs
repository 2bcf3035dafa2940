//! `morse` command: converts between plain text and Morse code.

use courier_wire::{Fragment, ShapeRules, read_fields};

use crate::dispatch::errors::DispatchError;
use crate::services::MorseCodec;

const FIELDS: &[&str] = &["message", "to"];
const TARGETS: &[&str] = &["morse", "text"];

/// Conversion direction selected by the `to` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Plain text to Morse code.
    Morse,
    /// Morse code to plain text.
    Text,
}

impl Target {
    fn parse(value: &str) -> Result<Self, DispatchError> {
        match value {
            "morse" => Ok(Self::Morse),
            "text" => Ok(Self::Text),
            other => Err(DispatchError::invalid_value("to", other, TARGETS)),
        }
    }
}

/// Decoded `morse` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorseCommand<'a> {
    /// Text to convert.
    pub message: &'a str,
    /// Conversion direction.
    pub target: Target,
}

impl<'a> MorseCommand<'a> {
    /// Reads `message` and `to` from the body.
    ///
    /// # Errors
    ///
    /// Fails on malformed bodies and with [`DispatchError::InvalidValue`] when
    /// `to` is neither `morse` nor `text`.
    pub fn decode(body: Fragment<'a>) -> Result<Self, DispatchError> {
        let fields = read_fields(body, 0, &ShapeRules::scalars(), FIELDS)?;
        Ok(Self {
            message: fields.scalar("message")?,
            target: Target::parse(fields.scalar("to")?)?,
        })
    }

    /// Converts the message.
    pub fn execute(&self, codec: &dyn MorseCodec) -> String {
        match self.target {
            Target::Morse => codec.encode(self.message),
            Target::Text => codec.decode(self.message),
        }
    }
}

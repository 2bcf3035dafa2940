//! `mail` command: delivers a message through the configured sender.

use courier_wire::{Fragment, ShapeRules, read_fields};

use crate::dispatch::errors::DispatchError;
use crate::services::{Mail, MailSender};

pub(crate) const MAIL_SENT: &str = "Mail sent successfully";

const BODY_SHAPES: ShapeRules<'static> = ShapeRules::objects(&["to"]);

/// Decoded `mail` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MailCommand<'a> {
    /// Subject line.
    pub subject: &'a str,
    /// Plain-text message.
    pub message: &'a str,
    /// Recipient display name.
    pub to_name: &'a str,
    /// Recipient address.
    pub to_email: &'a str,
}

impl<'a> MailCommand<'a> {
    /// Reads `subject`, `message` and the nested `to` recipient.
    ///
    /// # Errors
    ///
    /// Fails when any field is missing or malformed, or when `to` is not an
    /// object holding `name` and `email`.
    pub fn decode(body: Fragment<'a>) -> Result<Self, DispatchError> {
        let fields = read_fields(body, 0, &BODY_SHAPES, &["subject", "message", "to"])?;
        let recipient = read_fields(
            fields.object("to")?,
            0,
            &ShapeRules::scalars(),
            &["name", "email"],
        )?;
        Ok(Self {
            subject: fields.scalar("subject")?,
            message: fields.scalar("message")?,
            to_name: recipient.scalar("name")?,
            to_email: recipient.scalar("email")?,
        })
    }

    /// Sends the mail and waits for the outcome.
    ///
    /// # Errors
    ///
    /// Propagates the sender's error.
    pub fn execute(&self, sender: &dyn MailSender) -> Result<String, DispatchError> {
        sender.send(&Mail {
            subject: self.subject.to_owned(),
            message: self.message.to_owned(),
            to_name: self.to_name.to_owned(),
            to_email: self.to_email.to_owned(),
        })?;
        Ok(MAIL_SENT.to_owned())
    }
}

//! Turns parsed commands into request text.

use std::io::Read;

use courier_wire::compose::{MessageBuilder, ObjectBuilder};

use crate::cli::CliCommand;
use crate::errors::AppError;

/// Builds the request for `command`; `raw` requests are read from `stdin`.
pub(crate) fn compose_request<R>(command: &CliCommand, stdin: &mut R) -> Result<String, AppError>
where
    R: Read,
{
    let message = match command {
        CliCommand::Morse { message, to } => MessageBuilder::new("morse")
            .field("message", message)
            .field("to", to.as_str()),
        CliCommand::AddFile { filename, content } => MessageBuilder::new("addfile")
            .field("filename", filename)
            .field("content", content),
        CliCommand::RemoveFile { filename } => {
            MessageBuilder::new("removefile").field("filename", filename)
        }
        CliCommand::Mail {
            subject,
            message,
            to_name,
            to_email,
        } => MessageBuilder::new("mail")
            .field("subject", subject)
            .field("message", message)
            .object(
                "to",
                ObjectBuilder::new()
                    .field("name", to_name)
                    .field("email", to_email),
            ),
        CliCommand::Raw => return read_raw(stdin),
    };
    message.build().map_err(AppError::Compose)
}

fn read_raw<R>(stdin: &mut R) -> Result<String, AppError>
where
    R: Read,
{
    let mut request = String::new();
    stdin
        .read_to_string(&mut request)
        .map_err(AppError::ReadInput)?;
    if request.trim().is_empty() {
        return Err(AppError::MissingRawInput);
    }
    Ok(request)
}

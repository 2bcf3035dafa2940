//! CLI argument definitions for the courier client.

use clap::{Parser, Subcommand, ValueEnum};

/// Listener the request is sent to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum Transport {
    /// The stream endpoint (TCP or Unix socket).
    #[default]
    Stream,
    /// The datagram endpoint (UDP).
    Datagram,
}

/// Conversion direction for the `morse` command.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum MorseTarget {
    /// Encode text as Morse code.
    #[default]
    Morse,
    /// Decode Morse code to text.
    Text,
}

impl MorseTarget {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Morse => "morse",
            Self::Text => "text",
        }
    }
}

/// Command-line interface for the courier client.
#[derive(Parser, Debug)]
#[command(name = "courier", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// Listener that receives the request.
    #[arg(long, value_enum, default_value_t = Transport::Stream)]
    pub(crate) transport: Transport,
    /// The request to send.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Requests understood by the daemon.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Converts a message to or from Morse code.
    Morse {
        /// Text or Morse code to convert.
        message: String,
        /// Conversion direction.
        #[arg(long, value_enum, default_value_t = MorseTarget::Morse)]
        to: MorseTarget,
    },
    /// Stores a file in the daemon's files directory.
    AddFile {
        /// Name of the file, without directories.
        filename: String,
        /// File content.
        content: String,
    },
    /// Deletes a file from the daemon's files directory.
    RemoveFile {
        /// Name of the file, without directories.
        filename: String,
    },
    /// Sends an email through the daemon.
    Mail {
        /// Subject line.
        #[arg(long)]
        subject: String,
        /// Plain text body.
        #[arg(long)]
        message: String,
        /// Recipient display name.
        #[arg(long)]
        to_name: String,
        /// Recipient address.
        #[arg(long)]
        to_email: String,
    },
    /// Sends a request read verbatim from stdin.
    Raw,
}

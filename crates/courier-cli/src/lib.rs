//! Command-line client for the courier daemon.
//!
//! The runtime splits configuration flags from the command, loads
//! [`courier_config::Config`], composes the request with
//! [`courier_wire::compose`] and sends it to the stream or datagram listener.
//! The reply is printed on stdout; failures go to stderr with a non-zero exit
//! status.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::process::ExitCode;

use clap::Parser;

mod cli;
mod command;
mod config;
mod errors;
mod transport;

use cli::Cli;
use command::compose_request;
use config::{ConfigLoader, OrthoConfigLoader, command_arguments, split_config_arguments};
use errors::AppError;
use transport::send_request;

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, R: Read, W: Write, E: Write> {
    pub(crate) stdin: &'a mut R,
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, R: Read, W: Write, E: Write> IoStreams<'a, R, W, E> {
    pub(crate) fn new(stdin: &'a mut R, stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdin, stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
pub(crate) fn run_with_loader<I, R, W, E, L>(
    args: I,
    io: &mut IoStreams<'_, R, W, E>,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let result = execute(&args, io, loader).and_then(|reply| {
        writeln!(io.stdout, "{reply}")
            .and_then(|()| io.stdout.flush())
            .map_err(AppError::WriteReply)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(io.stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<R, W, E, L>(
    args: &[OsString],
    io: &mut IoStreams<'_, R, W, E>,
    loader: &L,
) -> Result<String, AppError>
where
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let split = split_config_arguments(args);
    let cli = Cli::try_parse_from(command_arguments(args, &split)).map_err(AppError::CliUsage)?;
    let config = loader.load(&split.config_arguments)?;
    let request = compose_request(&cli.command, &mut *io.stdin)?;
    send_request(cli.transport, &config, &request)
}

#[cfg(test)]
mod tests;

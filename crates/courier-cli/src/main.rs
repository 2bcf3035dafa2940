//! CLI entrypoint for the courier client.
//!
//! The binary delegates to [`courier_cli::run`], which loads configuration,
//! composes the request and prints the daemon's reply.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    courier_cli::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr)
}

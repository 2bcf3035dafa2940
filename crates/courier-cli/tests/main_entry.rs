//! Integration tests for the `courier` binary entry point.
//!
//! Verifies usage errors and transport failures surface on stderr with a
//! failing exit status.

use std::net::TcpListener;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn missing_command_exits_with_usage() {
    let mut command = cargo_bin_cmd!("courier");
    command.assert().failure().stderr(contains("Usage"));
}

#[test]
fn unreachable_daemon_exits_with_failure() {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("reserve port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let mut command = cargo_bin_cmd!("courier");
    command
        .env("COURIER_STREAM_SOCKET", format!("tcp://127.0.0.1:{port}"))
        .args(["morse", "sos"]);
    command
        .assert()
        .failure()
        .stderr(contains("failed to connect to daemon"));
}

#[test]
fn unrepresentable_values_are_refused() {
    let mut command = cargo_bin_cmd!("courier");
    command.args(["add-file", "notes.txt", "say \"hi\""]);
    command
        .assert()
        .failure()
        .stderr(contains("failed to compose request"));
}

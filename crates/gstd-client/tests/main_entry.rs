//! Integration tests for the `gstd-client` binary entry point.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

#[test]
fn version_flag_succeeds() {
    let mut command = cargo_bin_cmd!("gstd-client");
    command.arg("--version");
    command
        .assert()
        .success()
        .stdout(contains(concat!("gstd-client ", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn invalid_port_exits_with_failure() {
    let mut command = cargo_bin_cmd!("gstd-client");
    command.args(["--port", "not-a-port"]);
    command.assert().failure().stderr(contains("invalid value"));
}

#[test]
fn unknown_command_is_reported_without_failing() {
    let mut command = cargo_bin_cmd!("gstd-client");
    command.args(["--port", "1", "bogus", "p0"]);
    command
        .assert()
        .success()
        .stderr(contains("No such command `bogus'"));
}

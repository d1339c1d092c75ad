//! Harness for driving the client runtime with captured streams.

mod fake_daemon;

use std::ffi::OsString;
use std::io::Cursor;
use std::process::ExitCode;

pub(crate) use fake_daemon::{FakeDaemon, Reply};

use crate::{CancellationToken, run_with_token};

/// Output of one client run.
pub(crate) struct Captured {
    pub(crate) exit: ExitCode,
    pub(crate) stdout: String,
    pub(crate) stderr: String,
}

/// Runs the client with `args` after the program name and `input` on stdin.
///
/// No signal handler is installed.
pub(crate) fn run_client(args: &[String], input: &str) -> Captured {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let argv = std::iter::once(OsString::from("gstd-client")).chain(args.iter().map(OsString::from));
    let exit = run_with_token(
        argv,
        Cursor::new(input.to_owned()),
        &mut stdout,
        &mut stderr,
        Some(CancellationToken::new()),
    );
    Captured {
        exit,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }
}

/// Options pointing the client at a loopback port.
pub(crate) fn loopback(port: u16) -> Vec<String> {
    vec![
        "-a".to_owned(),
        "127.0.0.1".to_owned(),
        "-p".to_owned(),
        port.to_string(),
    ]
}

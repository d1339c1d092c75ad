//! Binary entry point for the gstd command-line client.

use std::io::{self, BufReader, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    gstd_client::run(
        std::env::args_os(),
        BufReader::new(io::stdin()),
        &mut stdout,
        &mut stderr,
    )
}

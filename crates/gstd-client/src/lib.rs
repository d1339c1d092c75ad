//! Command-line client for the gstd command server.
//!
//! The client runs a script (`-f`), a single command given on the command
//! line, an interactive session, or a combination of these in that order.
//! Every remote command opens its own connection, sends one request and
//! prints the JSON response. Output goes through injected writers so the
//! runtime can be exercised from tests.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod errors;
mod history;
mod repl;
mod shell;
mod transport;

use cli::Cli;
use commands::CommandRegistry;
pub use errors::AppError;
use history::History;
pub use repl::CancellationToken;
use repl::run_interactive;
use shell::{Flow, Shell};
use transport::Transport;

/// Runs the client with the provided arguments, input and output streams.
///
/// Interactive sessions install a SIGINT handler that ends the session
/// between lines. The exit code is non-zero only when the options do not
/// parse; failing commands are reported on `stderr`.
#[must_use]
pub fn run<I, R, W, E>(args: I, input: R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead + Send + 'static,
    W: Write,
    E: Write,
{
    run_with_token(args, input, stdout, stderr, None)
}

pub(crate) fn run_with_token<I, R, W, E>(
    args: I,
    input: R,
    stdout: &mut W,
    stderr: &mut E,
    token: Option<CancellationToken>,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: BufRead + Send + 'static,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            let _ = write!(stderr, "{}", AppError::CliUsage(error));
            return ExitCode::FAILURE;
        }
    };

    if cli.version {
        let _ = writeln!(stdout, "gstd-client {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let registry = match CommandRegistry::standard() {
        Ok(registry) => registry,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            return ExitCode::FAILURE;
        }
    };
    let history = if cli.interactive() {
        let path = cli.history.clone().or_else(History::default_path);
        History::load(path).unwrap_or_else(|error| {
            let _ = writeln!(stderr, "{error}");
            History::detached()
        })
    } else {
        History::detached()
    };
    let transport = Transport::new(cli.endpoint(), cli.timeout());
    let mut shell = Shell::new(registry, transport, history, cli.quiet(), stdout, stderr);

    let mut flow = Flow::Continue;
    if let Some(file) = cli.file.as_deref() {
        flow = shell.source_script(file);
    }
    if flow == Flow::Continue
        && let Some(line) = cli.command_line()
    {
        flow = shell.execute_line(&line);
    }
    if flow == Flow::Continue && cli.interactive() {
        interact(&mut shell, input, token);
    }
    ExitCode::SUCCESS
}

fn interact<R, W, E>(shell: &mut Shell<'_, W, E>, input: R, token: Option<CancellationToken>)
where
    R: BufRead + Send + 'static,
    W: Write,
    E: Write,
{
    let token = match token.map_or_else(CancellationToken::install, Ok) {
        Ok(token) => token,
        Err(error) => {
            shell.report(&error);
            CancellationToken::new()
        }
    };
    let session = shell
        .banner()
        .and_then(|()| run_interactive(shell, input, &token));
    if let Err(error) = session {
        shell.report(&error);
    }
    if let Err(error) = shell.save_history() {
        shell.report(&error);
    }
}

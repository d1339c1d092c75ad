//! Error types for the client runtime.

use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures surfaced to the operator on stderr.
///
/// None of these change the exit code once options have parsed; only
/// [`AppError::CliUsage`] does.
#[derive(Debug, Error)]
pub enum AppError {
    /// The command line could not be parsed.
    #[error("{0}")]
    CliUsage(clap::Error),
    /// The daemon host name did not resolve.
    #[error("failed to resolve daemon address {endpoint}: {source}")]
    Resolve {
        /// Endpoint as configured.
        endpoint: String,
        /// Resolver failure.
        source: io::Error,
    },
    /// The daemon refused or did not answer the connection.
    #[error("failed to connect to daemon at {endpoint}: {source}")]
    Connect {
        /// Endpoint as configured.
        endpoint: String,
        /// Socket failure.
        source: io::Error,
    },
    /// Writing the request failed.
    #[error("failed to send request to daemon: {0}")]
    SendRequest(io::Error),
    /// Reading the response failed.
    #[error("failed to read response from daemon: {0}")]
    ReadResponse(io::Error),
    /// The response grew past the accepted size without a sentinel.
    #[error("daemon response exceeds {limit} bytes")]
    ResponseTooLarge {
        /// Largest accepted body.
        limit: usize,
    },
    /// The daemon closed the connection without replying.
    #[error("daemon closed the connection without a response")]
    MissingResponse,
    /// The response body was not UTF-8 text.
    #[error("daemon response is not UTF-8: {0}")]
    ResponseEncoding(std::string::FromUtf8Error),
    /// The response body was not a response envelope.
    #[error("failed to decode daemon response: {0}")]
    DecodeResponse(serde_json::Error),
    /// Writing to the output streams failed.
    #[error("failed to write output: {0}")]
    Output(io::Error),
    /// Reading standard input failed.
    #[error("failed to read input: {0}")]
    Input(io::Error),
    /// A script could not be opened or read.
    #[error("failed to read script {path}: {source}")]
    Source {
        /// Script path as given.
        path: String,
        /// Filesystem failure.
        source: io::Error,
    },
    /// Scripts sourced each other too deeply.
    #[error("scripts nested deeper than {limit} levels")]
    SourceDepth {
        /// Deepest nesting allowed.
        limit: usize,
    },
    /// The history file could not be read or written.
    #[error("failed to access history file {path}: {source}")]
    History {
        /// History path.
        path: String,
        /// Filesystem failure.
        source: io::Error,
    },
    /// A shell command could not be started.
    #[error("failed to run `{program}': {source}")]
    Shell {
        /// Program name.
        program: String,
        /// Spawn failure.
        source: io::Error,
    },
    /// A shell command ran but failed.
    #[error("`{command}' exited with {status}")]
    ShellStatus {
        /// Command line as typed.
        command: String,
        /// Exit status of the child.
        status: ExitStatus,
    },
    /// A local command was invoked without its argument.
    #[error("missing argument, usage: {usage}")]
    MissingArgument {
        /// Usage line of the command.
        usage: &'static str,
    },
    /// The first word of a line names no command.
    #[error("No such command `{0}'")]
    UnknownCommand(String),
    /// Two table entries share a name.
    #[error("command `{0}' is registered twice")]
    DuplicateCommand(&'static str),
    /// The interrupt handler could not be installed.
    #[error("failed to install interrupt handler: {0}")]
    Signal(io::Error),
}

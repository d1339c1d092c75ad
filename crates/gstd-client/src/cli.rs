//! Command-line options for the gstd client.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use gstd_config::{DEFAULT_ADDRESS, DEFAULT_PORT, Endpoint};

/// Seconds a single connect, write or read may take before failing.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Interactive client for the gstd command server.
#[derive(Parser, Debug)]
#[command(
    name = "gstd-client",
    about = "gst-launch under steroids",
    override_usage = "gstd-client [OPTIONS] [COMMANDS]..."
)]
pub(crate) struct Cli {
    /// Don't print startup headers.
    #[arg(short, long)]
    pub(crate) quiet: bool,
    /// Execute the commands in a script.
    #[arg(short, long, value_name = "SCRIPT")]
    pub(crate) file: Option<PathBuf>,
    /// Enter interactive mode after executing the command line.
    #[arg(short, long)]
    pub(crate) interactive: bool,
    /// Port of the command server.
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub(crate) port: u16,
    /// Host name or IP address of the command server.
    #[arg(short, long, default_value = DEFAULT_ADDRESS)]
    pub(crate) address: String,
    /// Print the client version and exit.
    #[arg(short = 'v', long)]
    pub(crate) version: bool,
    /// Seconds allowed for each connect, write and read; 0 waits forever.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub(crate) timeout: u64,
    /// History file; defaults to `~/.gstc_history`.
    #[arg(long, value_name = "PATH")]
    pub(crate) history: Option<PathBuf>,
    /// A single command, joined with spaces and executed once.
    #[arg(
        value_name = "COMMANDS",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) commands: Vec<String>,
}

impl Cli {
    /// Interactive mode is entered on request or when there is nothing else
    /// to run.
    pub(crate) fn interactive(&self) -> bool {
        self.interactive || (self.file.is_none() && self.commands.is_empty())
    }

    /// Scripts and command-line commands imply quiet output.
    pub(crate) fn quiet(&self) -> bool {
        self.quiet || self.file.is_some() || !self.commands.is_empty()
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        (self.timeout > 0).then(|| Duration::from_secs(self.timeout))
    }

    pub(crate) fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.address.clone(), self.port)
    }

    pub(crate) fn command_line(&self) -> Option<String> {
        (!self.commands.is_empty()).then(|| self.commands.join(" "))
    }
}

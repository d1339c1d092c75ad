//! Daemon process lifecycle: bind, serve, wait for a signal, tear down.

mod errors;
mod launch;
mod shutdown;

pub use errors::LaunchError;
pub use launch::{RunningDaemon, run_daemon, run_daemon_with, start};
pub use shutdown::{ShutdownError, ShutdownSignal, SystemShutdownSignal};

pub(crate) const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");

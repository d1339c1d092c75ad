//! The gstd command daemon.
//!
//! The daemon keeps a tree of named resources in memory (a session holding
//! pipelines, pipelines holding elements, elements holding typed property
//! values) and lets remote callers manipulate it through four verbs: create,
//! read, update and delete. Each TCP connection carries exactly one request
//! line and one JSON response, see [`gstd_types::framing`].
//!
//! Startup follows a fixed sequence: load [`gstd_config::Config`], install
//! structured telemetry, bind the listener and report readiness through a
//! [`HealthReporter`]. A termination signal stops the listener and tears down
//! every pipeline before the process exits.
//!
//! Media processing itself sits behind the [`engine::MediaEngine`] trait.
//! The bundled [`engine::SimulatedEngine`] validates launch descriptions
//! against a built-in element catalogue and accepts every state change.

mod bootstrap;
pub mod dispatch;
pub mod engine;
mod health;
mod lexer;
pub mod object;
mod process;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use lexer::LexError;
pub use process::{
    LaunchError, RunningDaemon, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon,
    run_daemon_with, start,
};
pub use telemetry::{TelemetryError, TelemetryHandle, initialise as initialise_telemetry};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;

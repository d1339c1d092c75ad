//! Launch sequencing and runtime orchestration.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::bootstrap::{ConfigLoader, Daemon, SystemConfigLoader, bootstrap_with};
use crate::dispatch::DispatchConnectionHandler;
use crate::engine::{MediaEngine, SimulatedEngine};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::object::{ResourceObject, Session};
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Runs the daemon with the production collaborators until a signal arrives.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap, binding or signal handling fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(
        &SystemConfigLoader,
        Arc::new(StructuredHealthReporter::new()),
        Arc::new(SimulatedEngine::new()),
        &SystemShutdownSignal,
    )
}

/// Runs the daemon with injected collaborators.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap, binding or signal handling fails.
pub fn run_daemon_with(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    engine: Arc<dyn MediaEngine>,
    shutdown: &dyn ShutdownSignal,
) -> Result<(), LaunchError> {
    let daemon = bootstrap_with(loader, reporter, engine)?;
    let running = start(daemon)?;
    let waited = shutdown.wait();
    running.stop()?;
    waited?;
    Ok(())
}

/// Binds the configured endpoint and starts serving commands.
///
/// # Errors
///
/// Returns [`LaunchError::Listen`] when the endpoint cannot be bound.
pub fn start(daemon: Daemon) -> Result<RunningDaemon, LaunchError> {
    let endpoint = daemon.config().endpoint();
    info!(target: PROCESS_TARGET, %endpoint, "starting daemon runtime");
    let listener = SocketListener::bind(&endpoint)?;
    let local_addr = listener
        .local_addr()
        .map_err(|source| ListenerError::LocalAddr { source })?;
    let handler = Arc::new(DispatchConnectionHandler::new(daemon.router()));
    let listener = listener.start(handler)?;
    let reporter = daemon.reporter();
    reporter.listener_ready(local_addr);
    Ok(RunningDaemon {
        local_addr,
        listener,
        session: Arc::clone(daemon.session()),
        reporter,
    })
}

/// A daemon accepting connections on a background thread.
pub struct RunningDaemon {
    local_addr: SocketAddr,
    listener: ListenerHandle,
    session: Arc<Session>,
    reporter: Arc<dyn HealthReporter>,
}

impl std::fmt::Debug for RunningDaemon {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RunningDaemon")
            .field("local_addr", &self.local_addr)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl RunningDaemon {
    /// Address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Root of the resource tree being served.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Stops accepting connections, then tears down every pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::Listen`] when the accept thread panicked; the
    /// pipelines are torn down regardless.
    pub fn stop(self) -> Result<(), LaunchError> {
        self.reporter.shutdown_requested();
        self.listener.shutdown();
        let joined = self.listener.join();
        let pipelines = self.session.pipeline_count();
        self.session.destroy();
        self.reporter.shutdown_completed(pipelines);
        joined?;
        Ok(())
    }
}

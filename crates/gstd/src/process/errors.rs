use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::transport::ListenerError;

use super::shutdown::ShutdownError;

/// Errors that stop the daemon from starting or shutting down cleanly.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration or telemetry failed.
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    /// The listener could not be bound, started or joined.
    #[error("listener failed: {0}")]
    Listen(#[from] ListenerError),
    /// Waiting for the shutdown signal failed.
    #[error(transparent)]
    Shutdown(#[from] ShutdownError),
}

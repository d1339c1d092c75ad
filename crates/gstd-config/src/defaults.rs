use crate::endpoint::Endpoint;
use crate::logging::LogFormat;

/// Default host the daemon binds to and the client connects to.
pub const DEFAULT_ADDRESS: &str = "localhost";

/// Default TCP port for the command protocol.
pub const DEFAULT_PORT: u16 = 5000;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default host as an owned value (serde and ortho defaults need allocation).
pub fn default_address() -> String {
    DEFAULT_ADDRESS.to_owned()
}

/// Default TCP port.
pub const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Default log filter expression used by the daemon.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Endpoint assembled from the default address and port.
pub fn default_endpoint() -> Endpoint {
    Endpoint::new(DEFAULT_ADDRESS, DEFAULT_PORT)
}

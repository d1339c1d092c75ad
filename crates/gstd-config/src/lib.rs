//! Shared configuration for the gstd daemon.
//!
//! Values are layered by `ortho_config`: built-in defaults first, then a
//! configuration file passed with `--config-path` (or `GSTD_CONFIG_PATH`),
//! then `GSTD_*` environment variables, and finally command-line flags.

mod defaults;
mod endpoint;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_ADDRESS, DEFAULT_LOG_FILTER, DEFAULT_PORT, default_address, default_endpoint,
    default_log_filter, default_log_format, default_port,
};
pub use endpoint::{Endpoint, EndpointParseError};
pub use logging::{LogFormat, LogFormatParseError};

use defaults::default_log_filter_string;

/// Daemon configuration resolved from defaults, files, environment and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "GSTD")]
pub struct Config {
    /// Host or IP address the command server binds to.
    #[serde(default = "default_address")]
    #[ortho_config(default = default_address())]
    pub address: String,
    /// TCP port the command server binds to.
    #[serde(default = "default_port")]
    #[ortho_config(default = default_port())]
    pub port: u16,
    /// Tracing filter expression, for example `info` or `gstd=debug`.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of the structured log stream.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Endpoint the command server binds to.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.address.clone(), self.port)
    }

    /// Returns the configured tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_localhost_5000() {
        let config = Config::default();
        assert_eq!(config.endpoint(), default_endpoint());
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.log_format(), LogFormat::Json);
    }
}

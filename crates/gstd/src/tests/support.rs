//! Shared harness for daemon tests: configuration loaders, a recording
//! health reporter and a raw protocol client.

use std::ffi::OsString;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, bail};
use gstd_config::Config;
use gstd_types::Response;
use gstd_types::framing::{self, RESPONSE_SENTINEL};
use ortho_config::{OrthoConfig, OrthoError};

use crate::bootstrap::{BootstrapError, ConfigLoader, StaticConfigLoader, bootstrap_with};
use crate::engine::SimulatedEngine;
use crate::health::HealthReporter;
use crate::process::{RunningDaemon, start};

/// Configuration binding an ephemeral loopback port.
pub fn loopback_config() -> Config {
    Config {
        address: "127.0.0.1".to_owned(),
        port: 0,
        log_filter: "warn".to_owned(),
        ..Config::default()
    }
}

/// Loader that fails by passing an unparsable port on the command line.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("gstd"),
            OsString::from("--port"),
            OsString::from("not-a-port"),
        ];
        Config::load_from_iter(args)
    }
}

/// Lifecycle events seen by [`RecordingHealthReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed,
    ListenerReady,
    ShutdownRequested,
    ShutdownCompleted(usize),
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, _error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed);
    }

    fn listener_ready(&self, _addr: SocketAddr) {
        self.record(HealthEvent::ListenerReady);
    }

    fn shutdown_requested(&self) {
        self.record(HealthEvent::ShutdownRequested);
    }

    fn shutdown_completed(&self, pipelines: usize) {
        self.record(HealthEvent::ShutdownCompleted(pipelines));
    }
}

/// Boots a daemon on an ephemeral port with the simulated engine.
pub fn start_daemon(reporter: Arc<RecordingHealthReporter>) -> anyhow::Result<RunningDaemon> {
    let loader = StaticConfigLoader::new(loopback_config());
    let daemon = bootstrap_with(&loader, reporter, Arc::new(SimulatedEngine::new()))?;
    Ok(start(daemon)?)
}

/// Sends one request over a fresh connection and decodes the response.
pub fn exchange(addr: SocketAddr, verb: &str, argument: &str) -> anyhow::Result<Response> {
    let mut stream = TcpStream::connect(addr).context("connect to daemon")?;
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.write_all(&framing::encode_request(verb, argument))?;
    stream.flush()?;

    let mut raw = Vec::new();
    stream
        .read_to_end(&mut raw)
        .context("read response")?;
    if raw.pop() != Some(RESPONSE_SENTINEL) {
        bail!("response was not terminated by the sentinel");
    }
    serde_json::from_slice(&raw).context("decode response")
}

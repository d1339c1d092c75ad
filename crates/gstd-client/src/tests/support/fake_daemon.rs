//! Fake command server for client tests.
//!
//! Accepts any number of connections until stopped, records each request
//! and either answers it or hangs up.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use gstd_types::Response;
use gstd_types::framing::RESPONSE_SENTINEL;
use serde_json::json;

/// How the fake daemon answers a request.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Reply {
    /// A success response whose payload is the request.
    Echo,
    /// Close the connection without writing anything.
    HangUp,
    /// Send this body unchanged, followed by the sentinel.
    Verbatim(&'static str),
}

pub(crate) struct FakeDaemon {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeDaemon {
    /// Spawns a fake daemon on an ephemeral loopback port.
    pub(crate) fn spawn(reply: Reply) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake daemon")?;
        listener
            .set_nonblocking(true)
            .context("fake daemon nonblocking")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let stop = Arc::new(AtomicBool::new(false));
        let handle = {
            let requests = Arc::clone(&requests);
            let stop = Arc::clone(&stop);
            thread::spawn(move || Self::serve(&listener, reply, &requests, &stop))
        };
        Ok(Self {
            port,
            requests,
            stop,
            handle: Some(handle),
        })
    }

    pub(crate) fn port(&self) -> u16 {
        self.port
    }

    /// Stops the daemon and returns every request it received, in order.
    pub(crate) fn take_requests(&mut self) -> Result<Vec<String>> {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake daemon thread panicked"))?
                .context("fake daemon failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve(
        listener: &TcpListener,
        reply: Reply,
        requests: &Mutex<Vec<String>>,
        stop: &AtomicBool,
    ) -> Result<()> {
        while !stop.load(Ordering::SeqCst) {
            match listener.accept() {
                Ok((stream, _)) => Self::answer(stream, reply, requests)?,
                Err(ref error) if error.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(error) => return Err(error).context("accept connection"),
            }
        }
        Ok(())
    }

    fn answer(stream: TcpStream, reply: Reply, requests: &Mutex<Vec<String>>) -> Result<()> {
        stream
            .set_nonblocking(false)
            .context("blocking client stream")?;
        let mut line = String::new();
        BufReader::new(stream.try_clone().context("clone stream")?)
            .read_line(&mut line)
            .context("read request")?;
        requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?
            .push(line.clone());
        match reply {
            Reply::HangUp => Ok(()),
            Reply::Echo => {
                let response = Response::success(json!(line.trim_end()));
                let body = serde_json::to_vec_pretty(&response).context("encode response")?;
                Self::send(stream, body)
            }
            Reply::Verbatim(text) => Self::send(stream, text.as_bytes().to_vec()),
        }
    }

    fn send(mut stream: TcpStream, mut body: Vec<u8>) -> Result<()> {
        body.push(RESPONSE_SENTINEL);
        stream.write_all(&body).context("write response")?;
        stream.flush().context("flush response")
    }
}

impl Drop for FakeDaemon {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

//! Connection handling abstractions for the listener.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// An accepted client connection.
#[derive(Debug)]
pub(crate) struct ConnectionStream(TcpStream);

impl ConnectionStream {
    pub(crate) fn new(stream: TcpStream) -> Self {
        Self(stream)
    }

    pub(crate) fn set_read_timeout(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.0.set_read_timeout(timeout)
    }
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// Handles accepted connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Serves one connection, then lets it close. Implementations should
    /// avoid panicking.
    fn handle(&self, stream: ConnectionStream);
}

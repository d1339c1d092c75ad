//! Connection handler that serves one request per connection.

use std::io::{self, Read};
use std::time::Duration;

use gstd_types::framing::{MAX_REQUEST_BYTES, REQUEST_TERMINATOR};
use tracing::{debug, warn};

use crate::transport::{ConnectionHandler, ConnectionStream};

use super::errors::DispatchError;
use super::request::CommandRequest;
use super::response::ResponseWriter;
use super::router::{CommandRouter, DISPATCH_TARGET};

/// Quiet period after which a request without a terminator is complete.
pub(crate) const REQUEST_IDLE_TIMEOUT: Duration = Duration::from_millis(100);

/// A request source whose reads can be bounded once data has arrived.
pub(crate) trait RequestStream: Read {
    /// Bounds every later read to `idle`.
    fn bound_reads(&mut self, idle: Duration) -> io::Result<()>;
}

impl RequestStream for ConnectionStream {
    fn bound_reads(&mut self, idle: Duration) -> io::Result<()> {
        self.set_read_timeout(Some(idle))
    }
}

/// Reads a request line, routes it and writes the response.
#[derive(Debug)]
pub(crate) struct DispatchConnectionHandler {
    router: CommandRouter,
}

impl DispatchConnectionHandler {
    pub(crate) fn new(router: CommandRouter) -> Self {
        Self { router }
    }

    fn dispatch(&self, mut stream: ConnectionStream) {
        let request_bytes = match read_request_line(&mut stream) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                if let Err(error) = ResponseWriter::new(&mut stream).write_error(&error) {
                    debug!(target: DISPATCH_TARGET, %error, "failed to report read error");
                }
                return;
            }
        };

        let mut writer = ResponseWriter::new(&mut stream);
        let outcome = match CommandRequest::parse(&request_bytes) {
            Ok(request) => writer.write_response(&self.router.dispatch(&request)),
            Err(error) => {
                warn!(target: DISPATCH_TARGET, %error, "malformed request");
                writer.write_error(&error)
            }
        };
        if let Err(error) = outcome {
            warn!(target: DISPATCH_TARGET, %error, "failed to write response");
        }
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.dispatch(stream);
    }
}

/// Reads one request bounded by [`MAX_REQUEST_BYTES`].
///
/// The request ends at the terminator, at EOF, or once the client has sent
/// data and then stays quiet for [`REQUEST_IDLE_TIMEOUT`]. Returns `Ok(None)`
/// if the client disconnects without sending data.
fn read_request_line(stream: &mut impl RequestStream) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 1024];

    loop {
        let bytes_read = match read_with_retry(stream, &mut chunk) {
            Ok(bytes_read) => bytes_read,
            Err(error) if !buffer.is_empty() && is_idle(&error) => {
                debug!(target: DISPATCH_TARGET, "request ended by client going quiet");
                return Ok(Some(buffer));
            }
            Err(error) => return Err(error.into()),
        };
        if bytes_read == 0 {
            return Ok((!buffer.is_empty()).then_some(buffer));
        }
        if buffer.is_empty() {
            stream.bound_reads(REQUEST_IDLE_TIMEOUT)?;
        }
        let received = chunk.get(..bytes_read).unwrap_or_default();
        if let Some(end) = received.iter().position(|byte| *byte == REQUEST_TERMINATOR) {
            buffer.extend_from_slice(received.get(..=end).unwrap_or_default());
            enforce_limit(buffer.len())?;
            return Ok(Some(buffer));
        }
        buffer.extend_from_slice(received);
        enforce_limit(buffer.len())?;
    }
}

fn is_idle(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

fn read_with_retry(stream: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
}

fn enforce_limit(size: usize) -> Result<(), DispatchError> {
    if size > MAX_REQUEST_BYTES {
        return Err(DispatchError::request_too_large(size, MAX_REQUEST_BYTES));
    }
    Ok(())
}

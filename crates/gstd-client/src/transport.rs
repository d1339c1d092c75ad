//! One connection per request to the command server.
//!
//! Every exchange opens a fresh TCP connection, writes the request, closes
//! the write half, reads until the response sentinel and closes the
//! connection whether or not the exchange succeeded.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use gstd_config::Endpoint;
use gstd_types::Response;
use gstd_types::framing::{self, MAX_RESPONSE_BYTES, RESPONSE_SENTINEL};

use crate::AppError;

/// Connections opened and closed so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConnectionStats {
    pub(crate) opened: usize,
    pub(crate) closed: usize,
}

#[derive(Debug)]
pub(crate) struct Transport {
    endpoint: Endpoint,
    timeout: Option<Duration>,
    connection: Option<TcpStream>,
    stats: ConnectionStats,
}

impl Transport {
    pub(crate) fn new(endpoint: Endpoint, timeout: Option<Duration>) -> Self {
        Self {
            endpoint,
            timeout,
            connection: None,
            stats: ConnectionStats::default(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn stats(&self) -> ConnectionStats {
        self.stats
    }

    #[cfg(test)]
    pub(crate) const fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Sends `verb argument` and returns the response body as received,
    /// once it is known to decode as a [`Response`].
    ///
    /// The transport holds no connection afterwards, on success or failure.
    pub(crate) fn exchange(&mut self, verb: &str, argument: &str) -> Result<String, AppError> {
        let outcome = self.round_trip(verb, argument);
        self.disconnect();
        outcome
    }

    fn round_trip(&mut self, verb: &str, argument: &str) -> Result<String, AppError> {
        let stream = self.connect()?;
        stream
            .write_all(&framing::encode_request(verb, argument))
            .and_then(|()| stream.flush())
            .and_then(|()| stream.shutdown(Shutdown::Write))
            .map_err(AppError::SendRequest)?;
        let body = read_response(stream, MAX_RESPONSE_BYTES)?;
        let text = String::from_utf8(body).map_err(AppError::ResponseEncoding)?;
        serde_json::from_str::<Response>(&text).map_err(AppError::DecodeResponse)?;
        Ok(text)
    }

    fn connect(&mut self) -> Result<&mut TcpStream, AppError> {
        let endpoint = self.endpoint.to_string();
        let address = self
            .endpoint
            .resolve()
            .map_err(|source| AppError::Resolve {
                endpoint: endpoint.clone(),
                source,
            })?;
        let stream = match self.timeout {
            Some(timeout) => TcpStream::connect_timeout(&address, timeout),
            None => TcpStream::connect(address),
        }
        .map_err(|source| AppError::Connect {
            endpoint: endpoint.clone(),
            source,
        })?;
        self.stats.opened += 1;
        let stream = self.connection.insert(stream);
        stream
            .set_read_timeout(self.timeout)
            .and_then(|()| stream.set_write_timeout(self.timeout))
            .map_err(|source| AppError::Connect { endpoint, source })?;
        Ok(stream)
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.connection.take() {
            // The peer may already have closed its side.
            let _ = stream.shutdown(Shutdown::Both);
            self.stats.closed += 1;
        }
    }
}

/// Reads a response body up to the sentinel or EOF, at most `limit` bytes.
fn read_response(reader: &mut impl Read, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut body = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let bytes_read = match reader.read(&mut chunk) {
            Ok(bytes_read) => bytes_read,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(AppError::ReadResponse(error)),
        };
        if bytes_read == 0 {
            break;
        }
        let received = chunk.get(..bytes_read).unwrap_or_default();
        let sentinel = received.iter().position(|byte| *byte == RESPONSE_SENTINEL);
        let payload = match sentinel {
            Some(end) => received.get(..end).unwrap_or_default(),
            None => received,
        };
        body.extend_from_slice(payload);
        if body.len() > limit {
            return Err(AppError::ResponseTooLarge { limit });
        }
        if sentinel.is_some() {
            return Ok(body);
        }
    }
    if body.is_empty() {
        return Err(AppError::MissingResponse);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::net::TcpListener;

    use gstd_types::ReturnCode;
    use rstest::rstest;

    use super::*;
    use crate::tests::support::{FakeDaemon, Reply};

    /// Yields at most `step` bytes per read.
    struct Trickle {
        inner: Cursor<Vec<u8>>,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let len = buf.len().min(self.step);
            self.inner.read(&mut buf[..len])
        }
    }

    #[test]
    fn split_reads_are_joined_until_the_sentinel() {
        let mut reader = Trickle {
            inner: Cursor::new(b"{\"code\":0}\0trailing".to_vec()),
            step: 3,
        };
        let body = read_response(&mut reader, MAX_RESPONSE_BYTES).expect("body read");
        assert_eq!(body, b"{\"code\":0}".to_vec());
    }

    #[test]
    fn eof_without_sentinel_ends_the_body() {
        let mut reader = Cursor::new(b"{}".to_vec());
        let body = read_response(&mut reader, MAX_RESPONSE_BYTES).expect("body read");
        assert_eq!(body, b"{}".to_vec());
    }

    #[test]
    fn silent_close_is_a_missing_response() {
        let result = read_response(&mut Cursor::new(Vec::new()), MAX_RESPONSE_BYTES);
        assert!(matches!(result, Err(AppError::MissingResponse)));
    }

    #[rstest]
    #[case(b"123456789\0".to_vec())]
    #[case(b"123456789".to_vec())]
    fn oversized_bodies_are_rejected(#[case] bytes: Vec<u8>) {
        let result = read_response(&mut Cursor::new(bytes), 8);
        assert!(matches!(result, Err(AppError::ResponseTooLarge { limit: 8 })));
    }

    #[test]
    fn exchange_sends_the_bare_request_and_decodes_the_reply() {
        let mut daemon = FakeDaemon::spawn(Reply::Echo).expect("fake daemon starts");
        let mut transport = Transport::new(
            Endpoint::new("127.0.0.1", daemon.port()),
            Some(Duration::from_secs(5)),
        );

        let text = transport
            .exchange("read", "p0/state")
            .expect("exchange succeeds");
        let response: Response = serde_json::from_str(&text).expect("body decodes");

        assert_eq!(response.code, ReturnCode::Ok);
        assert_eq!(response.response, serde_json::json!("read p0/state"));
        assert!(!transport.is_connected());
        let requests = daemon.take_requests().expect("requests recorded");
        assert_eq!(requests, vec!["read p0/state".to_owned()]);
    }

    #[rstest]
    #[case(Reply::Echo)]
    #[case(Reply::HangUp)]
    fn every_call_opens_and_closes_one_connection(#[case] reply: Reply) {
        let mut daemon = FakeDaemon::spawn(reply).expect("fake daemon starts");
        let mut transport = Transport::new(
            Endpoint::new("127.0.0.1", daemon.port()),
            Some(Duration::from_secs(5)),
        );

        for _ in 0..3 {
            let _ = transport.exchange("list_pipelines", "");
            assert!(!transport.is_connected());
        }

        assert_eq!(transport.stats(), ConnectionStats { opened: 3, closed: 3 });
        assert_eq!(daemon.take_requests().expect("requests recorded").len(), 3);
    }

    #[test]
    fn hang_up_is_reported_as_missing_response() {
        let daemon = FakeDaemon::spawn(Reply::HangUp).expect("fake daemon starts");
        let mut transport = Transport::new(Endpoint::new("127.0.0.1", daemon.port()), None);
        let result = transport.exchange("read", "pipelines");
        assert!(matches!(result, Err(AppError::MissingResponse)));
    }

    #[test]
    fn refused_connection_leaves_transport_unconnected() {
        let port = TcpListener::bind(("127.0.0.1", 0))
            .and_then(|listener| listener.local_addr())
            .expect("ephemeral port")
            .port();
        let mut transport = Transport::new(
            Endpoint::new("127.0.0.1", port),
            Some(Duration::from_secs(1)),
        );

        let result = transport.exchange("read", "pipelines");

        assert!(matches!(result, Err(AppError::Connect { .. })));
        assert!(!transport.is_connected());
        assert_eq!(transport.stats(), ConnectionStats::default());
    }
}

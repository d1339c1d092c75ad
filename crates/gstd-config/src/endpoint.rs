use std::fmt;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// TCP endpoint of the command protocol.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Builds an endpoint from host and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Resolves the endpoint to the first IPv4 or IPv6 socket address.
    pub fn resolve(&self) -> io::Result<SocketAddr> {
        let mut addrs = (self.host.as_str(), self.port).to_socket_addrs()?;
        addrs
            .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
            .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "tcp://{}:{}", self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.contains("://") {
            return parse_url(input);
        }
        let (host, port) = input
            .rsplit_once(':')
            .ok_or_else(|| EndpointParseError::MissingPort(input.to_owned()))?;
        if host.is_empty() {
            return Err(EndpointParseError::MissingHost(input.to_owned()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| EndpointParseError::InvalidPort(input.to_owned()))?;
        Ok(Self::new(host, port))
    }
}

fn parse_url(input: &str) -> Result<Endpoint, EndpointParseError> {
    let url = Url::parse(input)?;
    if url.scheme() != "tcp" {
        return Err(EndpointParseError::UnsupportedScheme(url.scheme().to_owned()));
    }
    let host = url
        .host_str()
        .ok_or_else(|| EndpointParseError::MissingHost(input.to_owned()))?;
    let port = url
        .port()
        .ok_or_else(|| EndpointParseError::MissingPort(input.to_owned()))?;
    Ok(Endpoint::new(host, port))
}

/// Errors encountered while parsing an [`Endpoint`] from text.
#[derive(Debug, Error)]
pub enum EndpointParseError {
    /// Scheme was not `tcp`.
    #[error("unsupported endpoint scheme '{0}'")]
    UnsupportedScheme(String),
    /// Host name was missing.
    #[error("missing host in '{0}'")]
    MissingHost(String),
    /// Port was missing from the address.
    #[error("missing port in '{0}'")]
    MissingPort(String),
    /// Port was not a number in range.
    #[error("invalid port in '{0}'")]
    InvalidPort(String),
    /// URL failed to parse.
    #[error(transparent)]
    Url(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn display_uses_tcp_scheme() {
        let endpoint = Endpoint::new("localhost", 5000);
        assert_eq!(endpoint.to_string(), "tcp://localhost:5000");
    }

    #[rstest]
    #[case("tcp://127.0.0.1:9000", "127.0.0.1", 9000)]
    #[case("localhost:5000", "localhost", 5000)]
    fn parses_supported_forms(#[case] input: &str, #[case] host: &str, #[case] port: u16) {
        let endpoint: Endpoint = input.parse().expect("endpoint should parse");
        assert_eq!(endpoint, Endpoint::new(host, port));
    }

    #[rstest]
    #[case("unix:///tmp/gstd.sock")]
    #[case("localhost")]
    #[case(":5000")]
    #[case("localhost:http")]
    fn rejects_malformed_input(#[case] input: &str) {
        assert!(input.parse::<Endpoint>().is_err(), "{input} should not parse");
    }

    #[test]
    fn resolves_loopback() {
        let addr = Endpoint::new("127.0.0.1", 5000)
            .resolve()
            .expect("loopback resolves");
        assert_eq!(addr.port(), 5000);
    }
}

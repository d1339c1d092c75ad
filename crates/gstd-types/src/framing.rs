//! Framing constants for the request/response exchange.
//!
//! A request is `<verb> <argument-string>` with nothing appended. The daemon
//! takes the request as complete at the first [`REQUEST_TERMINATOR`], when
//! the client closes its write half, or when the client goes quiet after
//! sending data. A response is the JSON envelope followed by
//! [`RESPONSE_SENTINEL`]; the daemon closes the connection afterwards.

/// Byte ending a request early when a client chooses to send it.
pub const REQUEST_TERMINATOR: u8 = b'\n';

/// Byte terminating a response body. JSON text never contains a raw NUL.
pub const RESPONSE_SENTINEL: u8 = 0;

/// Largest request the daemon accepts, terminator included.
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Largest response body a client accepts, sentinel excluded.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Builds the request for a verb and its argument string.
///
/// The verb and argument are joined by exactly one space; an empty argument
/// still produces the separating space.
#[must_use]
pub fn encode_request(verb: &str, argument: &str) -> Vec<u8> {
    let mut request = Vec::with_capacity(verb.len() + argument.len() + 1);
    request.extend_from_slice(verb.as_bytes());
    request.push(b' ');
    request.extend_from_slice(argument.as_bytes());
    request
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_joins_verb_and_argument_with_one_space() {
        let line = encode_request("read", "p0/state");
        assert_eq!(line, b"read p0/state".to_vec());
    }

    #[test]
    fn empty_argument_keeps_separator() {
        let line = encode_request("list_pipelines", "");
        assert_eq!(line, b"list_pipelines ".to_vec());
    }
}

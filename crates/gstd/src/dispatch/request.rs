//! Parsing of raw request lines.

use super::errors::DispatchError;

/// A request split into its verb and raw argument string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    verb: String,
    argument: String,
}

impl CommandRequest {
    /// Parses a request line.
    ///
    /// Surrounding whitespace, including the line terminator, is ignored. The
    /// verb ends at the first whitespace; the argument string is everything
    /// after it, quoting untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::MalformedRequest`] if the line is empty or
    /// not valid UTF-8.
    pub fn parse(line: &[u8]) -> Result<Self, DispatchError> {
        let text = std::str::from_utf8(line)
            .map_err(|error| DispatchError::malformed(format!("request is not UTF-8: {error}")))?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty request line"));
        }
        let (verb, argument) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));
        Ok(Self {
            verb: verb.to_owned(),
            argument: argument.trim_start().to_owned(),
        })
    }

    /// The command verb.
    #[must_use]
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The raw argument string.
    #[must_use]
    pub fn argument(&self) -> &str {
        &self.argument
    }
}

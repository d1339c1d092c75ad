//! Error types for request parsing and dispatch.

use std::io;

use gstd_types::ReturnCode;
use thiserror::Error;

use crate::lexer::LexError;
use crate::object::ResourceError;

/// Errors surfaced while turning a request line into a response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request line was empty or not UTF-8.
    #[error("malformed request: {message}")]
    MalformedRequest {
        /// Explanation of the problem.
        message: String,
    },

    /// The argument string had unbalanced quoting.
    #[error("malformed arguments: {0}")]
    Syntax(#[from] LexError),

    /// The verb is neither a primitive nor an alias.
    #[error("unknown command '{verb}'")]
    UnknownCommand {
        /// Verb as received.
        verb: String,
    },

    /// A positional argument of the verb was absent.
    #[error("{verb} requires {what}")]
    MissingArgument {
        /// Verb being parsed.
        verb: &'static str,
        /// Name of the absent argument.
        what: &'static str,
    },

    /// Arguments had the wrong arity or shape.
    #[error("invalid arguments: {message}")]
    InvalidArguments {
        /// Explanation of the problem.
        message: String,
    },

    /// The request line exceeded the size limit.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Bytes received before giving up.
        size: usize,
        /// Configured limit.
        max_size: usize,
    },

    /// IO error during read or write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Response serialisation failed.
    #[error("failed to serialise response: {0}")]
    SerializeResponse(#[from] serde_json::Error),

    /// The resource tree rejected the operation.
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl DispatchError {
    /// Return code reported to the client for this error.
    #[must_use]
    pub const fn return_code(&self) -> ReturnCode {
        match self {
            Self::MalformedRequest { .. } | Self::Syntax(_) | Self::UnknownCommand { .. } => {
                ReturnCode::BadCommand
            }
            Self::MissingArgument { .. } => ReturnCode::NullArgument,
            Self::InvalidArguments { .. } | Self::RequestTooLarge { .. } => {
                ReturnCode::BadArgument
            }
            Self::Io(_) | Self::SerializeResponse(_) => ReturnCode::InternalError,
            Self::Resource(error) => error.code(),
        }
    }

    /// Creates a malformed request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Creates an invalid arguments error.
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            message: message.into(),
        }
    }

    /// Creates a request too large error.
    #[must_use]
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }
}

//! Failures surfaced by resource operations.

use gstd_types::ReturnCode;
use thiserror::Error;

use crate::engine::EngineError;

use super::flags::Verb;

/// Error produced by a create, read, update or delete call.
///
/// Every variant maps onto exactly one [`ReturnCode`] through
/// [`ResourceError::code`].
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A required argument was not supplied.
    #[error("missing {what}")]
    MissingArgument {
        /// Name of the absent argument.
        what: &'static str,
    },
    /// An argument was malformed, of the wrong arity, or out of range.
    #[error("{message}")]
    InvalidArgument {
        /// Explanation of the problem.
        message: String,
    },
    /// A property value did not match the property's kind.
    #[error("invalid value '{value}' for property '{property}': expected {expected}")]
    InvalidValue {
        /// Property being written.
        property: String,
        /// Rejected text.
        value: String,
        /// Description of the accepted values.
        expected: String,
    },
    /// The object has no property with this name.
    #[error("no property '{property}' on {object}")]
    UnknownProperty {
        /// Name of the addressed object.
        object: String,
        /// Requested property.
        property: String,
    },
    /// The named child is absent from the collection.
    #[error("no {collection} entry named '{name}'")]
    ChildNotFound {
        /// Collection that was searched.
        collection: String,
        /// Requested child name.
        name: String,
    },
    /// The object was destroyed while a request still referenced it.
    #[error("{name} has been destroyed")]
    Detached {
        /// Name of the destroyed object.
        name: String,
    },
    /// A child with this name already exists.
    #[error("{name} already exists")]
    AlreadyExists {
        /// Conflicting name.
        name: String,
    },
    /// The property flags do not include the verb.
    #[error("cannot {verb} property '{property}'")]
    NotPermitted {
        /// Rejected verb.
        verb: Verb,
        /// Property the verb targeted.
        property: String,
    },
    /// The media engine rejected the request.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The object's lock was poisoned by a panicking holder.
    #[error("lock poisoned on {name}")]
    Poisoned {
        /// Name of the affected object.
        name: String,
    },
    /// An internal invariant did not hold.
    #[error("{message}")]
    Internal {
        /// Explanation of the broken invariant.
        message: String,
    },
}

impl ResourceError {
    /// Builds an [`ResourceError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Builds an [`ResourceError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Builds a [`ResourceError::ChildNotFound`].
    pub fn child_not_found(collection: &str, name: &str) -> Self {
        Self::ChildNotFound {
            collection: collection.to_owned(),
            name: name.to_owned(),
        }
    }

    /// Return code sent to the caller for this error.
    #[must_use]
    pub const fn code(&self) -> ReturnCode {
        match self {
            Self::MissingArgument { .. } => ReturnCode::NullArgument,
            Self::InvalidArgument { .. } | Self::InvalidValue { .. } => ReturnCode::BadArgument,
            Self::UnknownProperty { .. } | Self::ChildNotFound { .. } | Self::Detached { .. } => {
                ReturnCode::NotFound
            }
            Self::AlreadyExists { .. } => ReturnCode::AlreadyExists,
            Self::NotPermitted { .. } => ReturnCode::NotPermitted,
            Self::Engine(error) => error.code(),
            Self::Poisoned { .. } | Self::Internal { .. } => ReturnCode::InternalError,
        }
    }
}

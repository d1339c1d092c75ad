//! The closed set of outcomes produced by resource operations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a create, read, update, or delete call.
///
/// The numeric values are part of the wire protocol and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ReturnCode {
    /// The operation completed.
    Ok,
    /// A required argument was not supplied.
    NullArgument,
    /// An argument had the wrong type, arity, or range.
    BadArgument,
    /// The command was malformed or not recognised.
    BadCommand,
    /// The addressed resource or property does not exist.
    NotFound,
    /// A resource with the requested name already exists.
    AlreadyExists,
    /// The pipeline description could not be parsed.
    BadDescription,
    /// The property flags do not allow the requested verb.
    NotPermitted,
    /// The media engine refused a state change.
    StateChangeFailed,
    /// An internal invariant was violated.
    InternalError,
}

impl ReturnCode {
    /// Every code in wire order.
    pub const ALL: [Self; 10] = [
        Self::Ok,
        Self::NullArgument,
        Self::BadArgument,
        Self::BadCommand,
        Self::NotFound,
        Self::AlreadyExists,
        Self::BadDescription,
        Self::NotPermitted,
        Self::StateChangeFailed,
        Self::InternalError,
    ];

    /// Returns the numeric wire value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::NullArgument => 1,
            Self::BadArgument => 2,
            Self::BadCommand => 3,
            Self::NotFound => 4,
            Self::AlreadyExists => 5,
            Self::BadDescription => 6,
            Self::NotPermitted => 7,
            Self::StateChangeFailed => 8,
            Self::InternalError => 9,
        }
    }

    /// Human-readable description sent alongside the numeric code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "Success",
            Self::NullArgument => "Required argument is missing",
            Self::BadArgument => "Bad argument",
            Self::BadCommand => "Bad command",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::BadDescription => "Bad pipeline description",
            Self::NotPermitted => "Operation not permitted on property",
            Self::StateChangeFailed => "Failed to change pipeline state",
            Self::InternalError => "Internal error",
        }
    }

    /// Returns true for [`ReturnCode::Ok`].
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} ({})", self.description(), self.as_u8())
    }
}

impl From<ReturnCode> for u8 {
    fn from(code: ReturnCode) -> Self {
        code.as_u8()
    }
}

/// Error returned when a numeric value is not a known [`ReturnCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidReturnCode(pub u8);

impl fmt::Display for InvalidReturnCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "unknown return code {}", self.0)
    }
}

impl std::error::Error for InvalidReturnCode {}

impl TryFrom<u8> for ReturnCode {
    type Error = InvalidReturnCode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_u8() == value)
            .ok_or(InvalidReturnCode(value))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn wire_values_are_dense_and_ordered() {
        for (index, code) in ReturnCode::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(code.as_u8()), index);
        }
    }

    #[rstest]
    #[case(0, ReturnCode::Ok)]
    #[case(4, ReturnCode::NotFound)]
    #[case(7, ReturnCode::NotPermitted)]
    #[case(9, ReturnCode::InternalError)]
    fn decodes_known_values(#[case] value: u8, #[case] expected: ReturnCode) {
        assert_eq!(ReturnCode::try_from(value), Ok(expected));
    }

    #[test]
    fn rejects_unknown_values() {
        assert_eq!(ReturnCode::try_from(42), Err(InvalidReturnCode(42)));
    }

    #[test]
    fn display_includes_numeric_value() {
        assert_eq!(ReturnCode::NotFound.to_string(), "Resource not found (4)");
    }
}

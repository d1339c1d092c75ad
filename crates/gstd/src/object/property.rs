//! Property descriptors and typed values.

use std::fmt;

use serde::Serialize;

use super::error::ResourceError;
use super::flags::PropertyFlags;

/// Value domain of a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyKind {
    /// `true`/`false`, also `yes`/`no` and `1`/`0`.
    Boolean,
    /// Signed integer within an inclusive range.
    Integer {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// Floating point number within an inclusive range.
    Double {
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// Free text.
    String,
    /// One of a fixed set of nicks.
    Enumeration(&'static [&'static str]),
    /// Named children rather than a scalar value.
    Collection,
}

impl PropertyKind {
    /// Parses `text` into a value of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidValue`] when the text is mistyped or
    /// out of range, and [`ResourceError::InvalidArgument`] for collections,
    /// which hold no scalar value.
    pub fn parse(self, property: &str, text: &str) -> Result<PropertyValue, ResourceError> {
        let invalid = || ResourceError::InvalidValue {
            property: property.to_owned(),
            value: text.to_owned(),
            expected: self.to_string(),
        };
        match self {
            Self::Boolean => match text.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(PropertyValue::Boolean(true)),
                "false" | "no" | "0" => Ok(PropertyValue::Boolean(false)),
                _ => Err(invalid()),
            },
            Self::Integer { min, max } => text
                .parse::<i64>()
                .ok()
                .filter(|value| (min..=max).contains(value))
                .map(PropertyValue::Integer)
                .ok_or_else(invalid),
            Self::Double { min, max } => text
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && (min..=max).contains(value))
                .map(PropertyValue::Double)
                .ok_or_else(invalid),
            Self::String => Ok(PropertyValue::Text(text.to_owned())),
            Self::Enumeration(nicks) => nicks
                .iter()
                .find(|nick| nick.eq_ignore_ascii_case(text))
                .map(|nick| PropertyValue::Text((*nick).to_owned()))
                .ok_or_else(invalid),
            Self::Collection => Err(ResourceError::invalid_argument(format!(
                "'{property}' is a collection and holds no value"
            ))),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => formatter.write_str("a boolean"),
            Self::Integer { min, max } => write!(formatter, "an integer in [{min}, {max}]"),
            Self::Double { min, max } => write!(formatter, "a number in [{min}, {max}]"),
            Self::String => formatter.write_str("a string"),
            Self::Enumeration(nicks) => write!(formatter, "one of {}", nicks.join(", ")),
            Self::Collection => formatter.write_str("a collection"),
        }
    }
}

/// Scalar property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Boolean value.
    Boolean(bool),
    /// Integer value.
    Integer(i64),
    /// Floating point value.
    Double(f64),
    /// String or enumeration nick.
    Text(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(value) => write!(formatter, "{value}"),
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Double(value) => write!(formatter, "{value}"),
            Self::Text(value) => formatter.write_str(value),
        }
    }
}

/// Static description of one property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDescriptor {
    /// Property name as addressed in paths.
    pub name: &'static str,
    /// Value domain.
    pub kind: PropertyKind,
    /// Verbs the property accepts.
    pub flags: PropertyFlags,
    /// Initial value in text form; empty for computed properties.
    pub default: &'static str,
}

impl PropertyDescriptor {
    /// Builds a descriptor.
    #[must_use]
    pub const fn new(
        name: &'static str,
        kind: PropertyKind,
        flags: PropertyFlags,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            flags,
            default,
        }
    }

    /// Parses `text` against this descriptor.
    ///
    /// # Errors
    ///
    /// See [`PropertyKind::parse`].
    pub fn parse(&self, text: &str) -> Result<PropertyValue, ResourceError> {
        self.kind.parse(self.name, text)
    }

    /// Parses the default value.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Internal`] when the built-in default does not
    /// match the declared kind.
    pub fn default_value(&self) -> Result<PropertyValue, ResourceError> {
        self.parse(self.default).map_err(|error| {
            ResourceError::internal(format!("bad default for '{}': {error}", self.name))
        })
    }
}

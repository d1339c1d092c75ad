//! Launch description parsing.
//!
//! A description is a chain of element segments separated by `!`:
//! `videotestsrc pattern=ball ! queue ! fakesink name=out`. A segment whose
//! first token contains `/` is caps shorthand and becomes a `capsfilter`.
//! Elements without `name=` are called after their factory plus a counter
//! (`queue0`, `queue1`, ...).

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::lexer::{self, LexError};
use crate::object::{PropertyValue, Verb, validate_name};

use super::catalog::{FactorySpec, find_factory};

/// An element the engine will instantiate.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBlueprint {
    /// Unique name within the pipeline.
    pub name: String,
    /// Factory the element is built from.
    pub factory: &'static FactorySpec,
    /// Property values given in the description.
    pub overrides: Vec<(&'static str, PropertyValue)>,
}

/// Reasons a launch description is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptionError {
    /// The description contained no elements.
    #[error("empty pipeline description")]
    Empty,
    /// Two `!` were adjacent, or the chain started or ended with `!`.
    #[error("missing element at link {position}")]
    EmptySegment {
        /// Zero-based index of the empty segment.
        position: usize,
    },
    /// Quoting or escaping was malformed.
    #[error("malformed description: {0}")]
    Syntax(#[from] LexError),
    /// No factory with this name exists.
    #[error("no element \"{factory}\"")]
    UnknownFactory {
        /// Requested factory.
        factory: String,
    },
    /// A segment token was not `property=value`.
    #[error("expected property=value, found '{token}'")]
    MissingValue {
        /// Offending token.
        token: String,
    },
    /// The factory has no such property.
    #[error("no property \"{property}\" in element \"{factory}\"")]
    UnknownProperty {
        /// Factory of the element.
        factory: String,
        /// Requested property.
        property: String,
    },
    /// The value was rejected by the property.
    #[error("could not set property \"{property}\": {message}")]
    InvalidProperty {
        /// Property being set.
        property: String,
        /// Explanation of the rejection.
        message: String,
    },
    /// `name=` carried an unusable name.
    #[error("invalid element name '{name}': {message}")]
    InvalidName {
        /// Rejected name.
        name: String,
        /// Explanation of the rejection.
        message: String,
    },
    /// Two elements share a name.
    #[error("duplicate element name '{name}'")]
    DuplicateName {
        /// Name used twice.
        name: String,
    },
    /// Adjacent elements lack compatible pads.
    #[error("could not link {upstream} to {downstream}")]
    Unlinkable {
        /// Element that should produce data.
        upstream: String,
        /// Element that should consume data.
        downstream: String,
    },
}

struct Segment {
    name: Option<String>,
    factory: &'static FactorySpec,
    overrides: Vec<(&'static str, PropertyValue)>,
}

/// Parses a launch description into element blueprints in link order.
///
/// # Errors
///
/// Returns a [`DescriptionError`] describing the first problem found.
pub fn parse_description(description: &str) -> Result<Vec<ElementBlueprint>, DescriptionError> {
    if description.trim().is_empty() {
        return Err(DescriptionError::Empty);
    }
    let segments = lexer::split_unquoted(description, '!')?
        .into_iter()
        .enumerate()
        .map(|(position, text)| parse_segment(position, text))
        .collect::<Result<Vec<_>, _>>()?;
    let blueprints = assign_names(segments)?;
    check_links(&blueprints)?;
    Ok(blueprints)
}

fn parse_segment(position: usize, text: &str) -> Result<Segment, DescriptionError> {
    let tokens = lexer::tokenize(text)?;
    let Some((head, settings)) = tokens.split_first() else {
        return Err(DescriptionError::EmptySegment { position });
    };
    if head.contains('/') {
        return caps_segment(&tokens);
    }
    let factory = find_factory(head).ok_or_else(|| DescriptionError::UnknownFactory {
        factory: head.clone(),
    })?;
    let mut segment = Segment {
        name: None,
        factory,
        overrides: Vec::new(),
    };
    for setting in settings {
        apply_setting(&mut segment, setting)?;
    }
    Ok(segment)
}

fn caps_segment(tokens: &[String]) -> Result<Segment, DescriptionError> {
    let factory = find_factory("capsfilter").ok_or_else(|| DescriptionError::UnknownFactory {
        factory: "capsfilter".to_owned(),
    })?;
    Ok(Segment {
        name: None,
        factory,
        overrides: vec![("caps", PropertyValue::Text(tokens.join(" ")))],
    })
}

fn apply_setting(segment: &mut Segment, setting: &str) -> Result<(), DescriptionError> {
    let (key, value) = setting
        .split_once('=')
        .ok_or_else(|| DescriptionError::MissingValue {
            token: setting.to_owned(),
        })?;
    if key == "name" {
        validate_name(value).map_err(|error| DescriptionError::InvalidName {
            name: value.to_owned(),
            message: error.to_string(),
        })?;
        segment.name = Some(value.to_owned());
        return Ok(());
    }
    let descriptor = segment
        .factory
        .properties
        .iter()
        .find(|descriptor| descriptor.name == key)
        .ok_or_else(|| DescriptionError::UnknownProperty {
            factory: segment.factory.name.to_owned(),
            property: key.to_owned(),
        })?;
    if !descriptor.flags.allows(Verb::Update) {
        return Err(DescriptionError::InvalidProperty {
            property: key.to_owned(),
            message: "property is not writable".to_owned(),
        });
    }
    let parsed = descriptor
        .parse(value)
        .map_err(|error| DescriptionError::InvalidProperty {
            property: key.to_owned(),
            message: error.to_string(),
        })?;
    segment.overrides.retain(|(name, _)| *name != descriptor.name);
    segment.overrides.push((descriptor.name, parsed));
    Ok(())
}

fn assign_names(segments: Vec<Segment>) -> Result<Vec<ElementBlueprint>, DescriptionError> {
    let mut taken = HashSet::new();
    for name in segments.iter().filter_map(|segment| segment.name.as_deref()) {
        if !taken.insert(name.to_owned()) {
            return Err(DescriptionError::DuplicateName {
                name: name.to_owned(),
            });
        }
    }
    let mut counters: HashMap<&'static str, usize> = HashMap::new();
    let blueprints = segments
        .into_iter()
        .map(|segment| {
            let name = segment.name.unwrap_or_else(|| {
                let counter = counters.entry(segment.factory.name).or_default();
                loop {
                    let candidate = format!("{}{}", segment.factory.name, counter);
                    *counter += 1;
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                }
            });
            ElementBlueprint {
                name,
                factory: segment.factory,
                overrides: segment.overrides,
            }
        })
        .collect();
    Ok(blueprints)
}

fn check_links(blueprints: &[ElementBlueprint]) -> Result<(), DescriptionError> {
    for pair in blueprints.windows(2) {
        if let [upstream, downstream] = pair
            && !(upstream.factory.pads.has_src() && downstream.factory.pads.has_sink())
        {
            return Err(DescriptionError::Unlinkable {
                upstream: upstream.name.clone(),
                downstream: downstream.name.clone(),
            });
        }
    }
    Ok(())
}

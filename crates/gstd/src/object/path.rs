//! Resolution of slash-separated resource paths.
//!
//! `p0`, `pipelines/p0` and `/pipelines/p0` all name pipeline `p0`. After
//! the pipeline, segments alternate between collection and child name
//! (`p0/elements/src`). A single trailing segment names a property of the
//! object reached so far.

use std::fmt;
use std::sync::Arc;

use super::error::ResourceError;
use super::resource::ResourceObject;
use super::session::SESSION_NAME;

/// What a path points at.
pub enum Target {
    /// A whole object; reads render its description.
    Object(Arc<dyn ResourceObject>),
    /// A property of an object.
    Property(Arc<dyn ResourceObject>, String),
}

impl fmt::Debug for Target {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(object) => formatter.debug_tuple("Object").field(&object.name()).finish(),
            Self::Property(object, property) => formatter
                .debug_tuple("Property")
                .field(&object.name())
                .field(property)
                .finish(),
        }
    }
}

/// Walks `uri` from `root`, taking one lock at a time.
///
/// # Errors
///
/// Returns [`ResourceError::InvalidArgument`] for empty segments and
/// [`ResourceError::ChildNotFound`] when a step is missing.
pub fn resolve(root: &Arc<dyn ResourceObject>, uri: &str) -> Result<Target, ResourceError> {
    let trimmed = uri.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Target::Object(Arc::clone(root)));
    }
    let segments = trimmed.split('/').collect::<Vec<_>>();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(ResourceError::invalid_argument(format!(
            "empty segment in path '{uri}'"
        )));
    }

    let mut rest = segments.as_slice();
    if let [SESSION_NAME, tail @ ..] = rest {
        if tail.is_empty() {
            return Ok(Target::Property(Arc::clone(root), SESSION_NAME.to_owned()));
        }
        rest = tail;
    }
    let mut current = Arc::clone(root);
    if let [name, tail @ ..] = rest {
        current = current.child(SESSION_NAME, name)?;
        rest = tail;
    }
    loop {
        match rest {
            [] => return Ok(Target::Object(current)),
            [property] => return Ok(Target::Property(current, (*property).to_owned())),
            [collection, name, tail @ ..] => {
                current = current.child(collection, name)?;
                rest = tail;
            }
        }
    }
}

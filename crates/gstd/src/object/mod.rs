//! The server-resident resource tree.
//!
//! A [`Session`] owns pipelines, a [`Pipeline`] owns elements and an
//! [`Element`] owns property values. Every node guards its own state with a
//! mutex held for the whole of a create, read, update or delete call, and
//! records the resulting [`gstd_types::ReturnCode`]. Multi-object operations
//! lock parents before children; path resolution takes one lock at a time.

mod base;
mod element;
mod error;
mod flags;
mod path;
mod pipeline;
mod property;
mod resource;
mod session;

pub use self::base::ObjectBase;
pub use self::element::Element;
pub use self::error::ResourceError;
pub use self::flags::{PropertyFlags, Verb};
pub use self::path::{Target, resolve};
pub use self::pipeline::Pipeline;
pub use self::property::{PropertyDescriptor, PropertyKind, PropertyValue};
pub use self::resource::{Resource, ResourceKind, ResourceObject};
pub use self::session::Session;

pub(crate) const OBJECT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::object");

/// Sentinel used for objects created without an explicit name.
pub const UNSET_NAME: &str = "unset";

/// Names that collide with path keywords.
pub const RESERVED_NAMES: &[&str] = &[UNSET_NAME, "pipelines", "elements", "properties"];

/// Checks that `name` can address a child in a path.
///
/// # Errors
///
/// Returns [`ResourceError::MissingArgument`] for an empty name and
/// [`ResourceError::InvalidArgument`] for names containing `/` or whitespace
/// or matching a reserved word.
pub fn validate_name(name: &str) -> Result<(), ResourceError> {
    if name.is_empty() {
        return Err(ResourceError::MissingArgument { what: "name" });
    }
    if name.contains(|ch: char| ch == '/' || ch.is_whitespace()) {
        return Err(ResourceError::invalid_argument(format!(
            "name '{name}' must not contain '/' or whitespace"
        )));
    }
    if RESERVED_NAMES.contains(&name) {
        return Err(ResourceError::invalid_argument(format!(
            "name '{name}' is reserved"
        )));
    }
    Ok(())
}

//! Permission bits attached to every property descriptor.

use bitflags::bitflags;
use serde::Serialize;
use strum::{Display, EnumString};

bitflags! {
    /// Verbs a property accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// Children may be created through the property.
        const CREATE = 1 << 0;
        /// The value may be read.
        const READ = 1 << 1;
        /// The value may be replaced.
        const UPDATE = 1 << 2;
        /// Children may be deleted through the property.
        const DELETE = 1 << 3;
    }
}

impl PropertyFlags {
    /// Read-only value.
    pub const READ_ONLY: Self = Self::READ;
    /// Readable and updatable value.
    pub const READ_WRITE: Self = Self::READ.union(Self::UPDATE);
    /// Child collection supporting create, list and delete.
    pub const COLLECTION: Self = Self::CREATE.union(Self::READ).union(Self::DELETE);

    /// Returns true when `verb` is permitted.
    #[must_use]
    pub const fn allows(self, verb: Verb) -> bool {
        self.contains(verb.flag())
    }

    /// Flag names joined by `|`, as shown in object descriptions.
    #[must_use]
    pub fn label(self) -> String {
        self.iter_names()
            .map(|(name, _)| name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// The four resource verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    /// Build a child.
    Create,
    /// Observe a value.
    Read,
    /// Replace a value.
    Update,
    /// Destroy a child.
    Delete,
}

impl Verb {
    /// Flag that must be present for the verb to run.
    #[must_use]
    pub const fn flag(self) -> PropertyFlags {
        match self {
            Self::Create => PropertyFlags::CREATE,
            Self::Read => PropertyFlags::READ,
            Self::Update => PropertyFlags::UPDATE,
            Self::Delete => PropertyFlags::DELETE,
        }
    }
}

//! The media engine the resource tree configures.
//!
//! The engine is opaque to the resources: it turns a launch description into
//! element blueprints and accepts or refuses state changes. The daemon ships
//! [`SimulatedEngine`], which understands the built-in element catalogue and
//! accepts every state change.

mod catalog;
mod launch;
mod simulated;

use gstd_types::ReturnCode;
use serde::Serialize;
use strum::{Display, EnumString};
use thiserror::Error;

pub use self::catalog::{FactorySpec, PadLayout, factories, find_factory};
pub use self::launch::{DescriptionError, ElementBlueprint, parse_description};
pub use self::simulated::SimulatedEngine;

pub(crate) const ENGINE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::engine");

/// Pipeline states, in the order a pipeline passes through them.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    /// Initial state; no resources allocated.
    #[default]
    Null,
    /// Resources allocated, not processing.
    Ready,
    /// Prerolled, clock stopped.
    Paused,
    /// Processing.
    Playing,
}

impl PipelineState {
    /// State nicks in ascending order.
    pub const NICKS: &'static [&'static str] = &["null", "ready", "paused", "playing"];
}

/// Errors surfaced by a [`MediaEngine`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// The launch description could not be turned into elements.
    #[error(transparent)]
    Description(#[from] DescriptionError),
    /// The engine refused a state change.
    #[error("pipeline '{pipeline}' failed to reach state {state}: {reason}")]
    StateChange {
        /// Pipeline that was asked to change.
        pipeline: String,
        /// Requested state.
        state: PipelineState,
        /// Explanation from the engine.
        reason: String,
    },
    /// The engine's pipeline table was poisoned by a panicking holder.
    #[error("engine pipeline table poisoned")]
    Poisoned,
}

impl EngineError {
    /// Return code reported for this error.
    #[must_use]
    pub const fn code(&self) -> ReturnCode {
        match self {
            Self::Description(_) => ReturnCode::BadDescription,
            Self::StateChange { .. } => ReturnCode::StateChangeFailed,
            Self::Poisoned => ReturnCode::InternalError,
        }
    }
}

/// Backend that builds and drives pipelines.
#[cfg_attr(test, mockall::automock)]
pub trait MediaEngine: Send + Sync {
    /// Builds the elements of a new pipeline from its launch description.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Description`] for malformed descriptions.
    fn launch(&self, pipeline: &str, description: &str)
    -> Result<Vec<ElementBlueprint>, EngineError>;

    /// Moves a pipeline to `state`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StateChange`] when the engine refuses.
    fn set_state(&self, pipeline: &str, state: PipelineState) -> Result<(), EngineError>;

    /// Forgets a pipeline that has been destroyed.
    fn release(&self, pipeline: &str);
}

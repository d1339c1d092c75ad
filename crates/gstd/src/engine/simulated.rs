//! Engine that models pipelines without processing media.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::launch::{ElementBlueprint, parse_description};
use super::{ENGINE_TARGET, EngineError, MediaEngine, PipelineState};

/// Engine backed by the built-in element catalogue.
///
/// Every state change succeeds. The engine remembers the last state of each
/// live pipeline so callers can inspect what was requested.
#[derive(Debug, Default)]
pub struct SimulatedEngine {
    pipelines: Mutex<HashMap<String, PipelineState>>,
}

impl SimulatedEngine {
    /// Builds an engine with no pipelines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn pipelines(&self) -> Result<MutexGuard<'_, HashMap<String, PipelineState>>, EngineError> {
        self.pipelines.lock().map_err(|_| EngineError::Poisoned)
    }

    #[cfg(test)]
    pub(crate) fn state_of(&self, pipeline: &str) -> Option<PipelineState> {
        self.pipelines()
            .ok()
            .and_then(|pipelines| pipelines.get(pipeline).copied())
    }

    #[cfg(test)]
    pub(crate) fn live_pipelines(&self) -> usize {
        self.pipelines().map_or(0, |pipelines| pipelines.len())
    }
}

impl MediaEngine for SimulatedEngine {
    fn launch(
        &self,
        pipeline: &str,
        description: &str,
    ) -> Result<Vec<ElementBlueprint>, EngineError> {
        let blueprints = parse_description(description)?;
        self.pipelines()?
            .insert(pipeline.to_owned(), PipelineState::Null);
        info!(
            target: ENGINE_TARGET,
            pipeline,
            elements = blueprints.len(),
            "pipeline launched"
        );
        Ok(blueprints)
    }

    fn set_state(&self, pipeline: &str, state: PipelineState) -> Result<(), EngineError> {
        self.pipelines()?.insert(pipeline.to_owned(), state);
        debug!(target: ENGINE_TARGET, pipeline, %state, "state changed");
        Ok(())
    }

    fn release(&self, pipeline: &str) {
        match self.pipelines() {
            Ok(mut pipelines) => {
                pipelines.remove(pipeline);
                debug!(target: ENGINE_TARGET, pipeline, "pipeline released");
            }
            Err(error) => warn!(target: ENGINE_TARGET, pipeline, %error, "pipeline not released"),
        }
    }
}

//! Pipelines: named element chains driven through the media engine.

use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::engine::{MediaEngine, PipelineState};

use super::OBJECT_TARGET;
use super::base::ObjectBase;
use super::element::Element;
use super::error::ResourceError;
use super::flags::PropertyFlags;
use super::property::{PropertyDescriptor, PropertyKind, PropertyValue};
use super::resource::{Resource, ResourceKind, ResourceObject};

const PIPELINE_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::new("name", PropertyKind::String, PropertyFlags::READ_ONLY, ""),
    PropertyDescriptor::new(
        "description",
        PropertyKind::String,
        PropertyFlags::READ_ONLY,
        "",
    ),
    PropertyDescriptor::new(
        "state",
        PropertyKind::Enumeration(PipelineState::NICKS),
        PropertyFlags::READ_WRITE,
        "null",
    ),
    PropertyDescriptor::new(
        "elements",
        PropertyKind::Collection,
        PropertyFlags::READ_ONLY,
        "",
    ),
];

/// Mutable part of a pipeline.
#[derive(Debug)]
pub struct PipelineInner {
    state: PipelineState,
    elements: Vec<Arc<Element>>,
}

/// A pipeline owned by the session.
pub struct Pipeline {
    base: ObjectBase<PipelineInner>,
    description: String,
    engine: Arc<dyn MediaEngine>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Pipeline")
            .field("base", &self.base)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Asks the engine to build `description` and wraps the result.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Engine`] when the description is rejected.
    pub fn launch(
        name: &str,
        description: &str,
        engine: Arc<dyn MediaEngine>,
    ) -> Result<Self, ResourceError> {
        let blueprints = engine.launch(name, description)?;
        let elements = blueprints
            .into_iter()
            .map(|blueprint| Element::from_blueprint(blueprint).map(Arc::new))
            .collect::<Result<Vec<_>, _>>();
        let elements = match elements {
            Ok(elements) => elements,
            Err(error) => {
                engine.release(name);
                return Err(error);
            }
        };
        info!(
            target: OBJECT_TARGET,
            pipeline = name,
            elements = elements.len(),
            "pipeline created"
        );
        Ok(Self {
            base: ObjectBase::new(name, PipelineInner {
                state: PipelineState::Null,
                elements,
            }),
            description: description.to_owned(),
            engine,
        })
    }
}

impl Resource for Pipeline {
    type State = PipelineInner;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Pipeline
    }

    fn base(&self) -> &ObjectBase<Self::State> {
        &self.base
    }

    fn descriptors(&self) -> Vec<&PropertyDescriptor> {
        PIPELINE_PROPERTIES.iter().collect()
    }

    fn on_read(
        &self,
        state: &Self::State,
        property: &PropertyDescriptor,
    ) -> Result<Value, ResourceError> {
        match property.name {
            "name" => Ok(json!(self.base.name())),
            "description" => Ok(json!(self.description)),
            "state" => Ok(json!(state.state)),
            "elements" => Ok(json!(
                state
                    .elements
                    .iter()
                    .map(|element| element.name())
                    .collect::<Vec<_>>()
            )),
            other => Err(ResourceError::internal(format!(
                "pipeline property '{other}' has no reader"
            ))),
        }
    }

    fn on_update(
        &self,
        state: &mut Self::State,
        property: &PropertyDescriptor,
        value: PropertyValue,
    ) -> Result<(), ResourceError> {
        if property.name != "state" {
            return Err(ResourceError::internal(format!(
                "pipeline property '{}' has no writer",
                property.name
            )));
        }
        let target = value
            .to_string()
            .parse::<PipelineState>()
            .map_err(|error| ResourceError::invalid_argument(error.to_string()))?;
        self.engine.set_state(self.base.name(), target)?;
        info!(
            target: OBJECT_TARGET,
            pipeline = self.base.name(),
            from = %state.state,
            to = %target,
            "pipeline state changed"
        );
        state.state = target;
        Ok(())
    }

    fn child(
        &self,
        state: &Self::State,
        collection: &str,
        name: &str,
    ) -> Option<Arc<dyn ResourceObject>> {
        if collection != "elements" {
            return None;
        }
        state
            .elements
            .iter()
            .find(|element| element.name() == name)
            .map(|element| Arc::clone(element) as Arc<dyn ResourceObject>)
    }

    fn teardown(&self, state: &mut Self::State) -> Vec<Arc<dyn ResourceObject>> {
        let name = self.base.name();
        if state.state != PipelineState::Null {
            if let Err(error) = self.engine.set_state(name, PipelineState::Null) {
                warn!(
                    target: OBJECT_TARGET,
                    pipeline = name,
                    %error,
                    "failed to stop pipeline during teardown"
                );
            }
            state.state = PipelineState::Null;
        }
        self.engine.release(name);
        state
            .elements
            .drain(..)
            .map(|element| element as Arc<dyn ResourceObject>)
            .collect()
    }
}

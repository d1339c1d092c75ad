//! The session: root of the tree and owner of every pipeline.

use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};
use tracing::info;

use crate::engine::MediaEngine;

use super::base::ObjectBase;
use super::error::ResourceError;
use super::flags::PropertyFlags;
use super::pipeline::Pipeline;
use super::property::{PropertyDescriptor, PropertyKind};
use super::resource::{Resource, ResourceKind, ResourceObject};
use super::{OBJECT_TARGET, validate_name};

/// Name of the root object, also the name of its collection.
pub const SESSION_NAME: &str = "pipelines";

const SESSION_PROPERTIES: &[PropertyDescriptor] = &[PropertyDescriptor::new(
    "pipelines",
    PropertyKind::Collection,
    PropertyFlags::COLLECTION,
    "",
)];

/// Root of the resource tree.
pub struct Session {
    base: ObjectBase<Vec<Arc<Pipeline>>>,
    engine: Arc<dyn MediaEngine>,
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Builds an empty session driving `engine`.
    #[must_use]
    pub fn new(engine: Arc<dyn MediaEngine>) -> Self {
        Self {
            base: ObjectBase::new(SESSION_NAME, Vec::new()),
            engine,
        }
    }

    /// Number of live pipelines.
    #[must_use]
    pub fn pipeline_count(&self) -> usize {
        self.base.peek(|pipelines| Ok(pipelines.len())).unwrap_or(0)
    }
}

impl Resource for Session {
    type State = Vec<Arc<Pipeline>>;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Session
    }

    fn base(&self) -> &ObjectBase<Self::State> {
        &self.base
    }

    fn descriptors(&self) -> Vec<&PropertyDescriptor> {
        SESSION_PROPERTIES.iter().collect()
    }

    fn on_create(
        &self,
        state: &mut Self::State,
        _property: &PropertyDescriptor,
        args: &[String],
    ) -> Result<(), ResourceError> {
        let (name, description) = match args {
            [] => return Err(ResourceError::MissingArgument { what: "pipeline name" }),
            [_] => {
                return Err(ResourceError::MissingArgument {
                    what: "pipeline description",
                });
            }
            [name, description @ ..] => (name, description.join(" ")),
        };
        validate_name(name)?;
        if state.iter().any(|pipeline| pipeline.name() == name.as_str()) {
            return Err(ResourceError::AlreadyExists {
                name: name.clone(),
            });
        }
        let pipeline = Pipeline::launch(name, &description, Arc::clone(&self.engine))?;
        state.push(Arc::new(pipeline));
        Ok(())
    }

    fn on_read(
        &self,
        state: &Self::State,
        _property: &PropertyDescriptor,
    ) -> Result<Value, ResourceError> {
        Ok(json!(
            state
                .iter()
                .map(|pipeline| pipeline.name())
                .collect::<Vec<_>>()
        ))
    }

    fn on_delete(
        &self,
        state: &mut Self::State,
        property: &PropertyDescriptor,
        name: &str,
    ) -> Result<Arc<dyn ResourceObject>, ResourceError> {
        let position = state
            .iter()
            .position(|pipeline| pipeline.name() == name)
            .ok_or_else(|| ResourceError::child_not_found(property.name, name))?;
        let removed = state.remove(position);
        info!(target: OBJECT_TARGET, pipeline = name, "pipeline deleted");
        Ok(removed as Arc<dyn ResourceObject>)
    }

    fn child(
        &self,
        state: &Self::State,
        collection: &str,
        name: &str,
    ) -> Option<Arc<dyn ResourceObject>> {
        if collection != SESSION_NAME {
            return None;
        }
        state
            .iter()
            .find(|pipeline| pipeline.name() == name)
            .map(|pipeline| Arc::clone(pipeline) as Arc<dyn ResourceObject>)
    }

    fn teardown(&self, state: &mut Self::State) -> Vec<Arc<dyn ResourceObject>> {
        state
            .drain(..)
            .map(|pipeline| pipeline as Arc<dyn ResourceObject>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use gstd_types::ReturnCode;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::engine::SimulatedEngine;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[fixture]
    fn engine() -> Arc<SimulatedEngine> {
        Arc::new(SimulatedEngine::new())
    }

    #[fixture]
    fn session(engine: Arc<SimulatedEngine>) -> Session {
        Session::new(engine)
    }

    #[rstest]
    fn create_then_read_description_round_trips(session: Session) {
        session
            .create("pipelines", &args(&["p0", "videotestsrc ! fakesink"]))
            .expect("create succeeds");
        let pipeline = ResourceObject::child(&session, "pipelines", "p0").expect("p0 exists");
        assert_eq!(
            pipeline.read("description").ok(),
            Some(json!("videotestsrc ! fakesink"))
        );
        assert_eq!(session.read("pipelines").ok(), Some(json!(["p0"])));
    }

    #[rstest]
    fn duplicate_names_are_rejected(session: Session) {
        let create = args(&["p0", "fakesrc ! fakesink"]);
        session.create("pipelines", &create).expect("first create succeeds");
        let result = session.create("pipelines", &create);
        assert!(matches!(result, Err(ResourceError::AlreadyExists { .. })));
        assert_eq!(session.last_code(), ReturnCode::AlreadyExists);
        assert_eq!(session.pipeline_count(), 1);
    }

    #[rstest]
    #[case(&[], ReturnCode::NullArgument)]
    #[case(&["p0"], ReturnCode::NullArgument)]
    #[case(&["unset", "fakesrc ! fakesink"], ReturnCode::BadArgument)]
    #[case(&["p0", "nosuchsrc ! fakesink"], ReturnCode::BadDescription)]
    fn create_failures_leave_no_pipeline(
        session: Session,
        #[case] values: &[&str],
        #[case] expected: ReturnCode,
    ) {
        assert!(session.create("pipelines", &args(values)).is_err());
        assert_eq!(session.last_code(), expected);
        assert_eq!(session.pipeline_count(), 0);
    }

    #[rstest]
    fn deleting_missing_pipeline_leaves_siblings(session: Session) {
        session
            .create("pipelines", &args(&["p0", "fakesrc ! fakesink"]))
            .expect("create succeeds");
        let result = session.delete("pipelines", "p1");
        assert!(result.is_err());
        assert_eq!(session.last_code(), ReturnCode::NotFound);
        assert_eq!(session.read("pipelines").ok(), Some(json!(["p0"])));
    }

    #[rstest]
    fn delete_destroys_the_subtree(engine: Arc<SimulatedEngine>) {
        let session = Session::new(Arc::clone(&engine) as Arc<dyn MediaEngine>);
        session
            .create("pipelines", &args(&["p0", "fakesrc ! fakesink"]))
            .expect("create succeeds");
        let pipeline = ResourceObject::child(&session, "pipelines", "p0").expect("p0 exists");
        pipeline
            .update("state", &args(&["playing"]))
            .expect("play succeeds");

        session.delete("pipelines", "p0").expect("delete succeeds");

        assert_eq!(session.last_code(), ReturnCode::Ok);
        assert!(pipeline.read("state").is_err());
        assert_eq!(pipeline.last_code(), ReturnCode::NotFound);
        assert_eq!(engine.live_pipelines(), 0);
    }

    #[rstest]
    fn collection_verbs_are_gated(session: Session) {
        let result = session.update("pipelines", &args(&["x"]));
        assert!(matches!(result, Err(ResourceError::NotPermitted { .. })));
        assert_eq!(session.last_code(), ReturnCode::NotPermitted);
    }

    #[rstest]
    fn describe_names_the_root(session: Session) {
        let document = session.describe().expect("describe succeeds");
        assert_eq!(
            document,
            json!({
                "name": "pipelines",
                "type": "session",
                "properties": {"pipelines": []},
                "access": {"pipelines": "CREATE|READ|DELETE"},
            })
        );
    }
}

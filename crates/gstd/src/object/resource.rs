//! The resource contract and its lock-holding front end.

use std::sync::Arc;

use gstd_types::ReturnCode;
use serde::Serialize;
use serde_json::{Map, Value, json};
use strum::Display;
use tracing::debug;

use super::OBJECT_TARGET;
use super::base::ObjectBase;
use super::error::ResourceError;
use super::flags::{PropertyFlags, Verb};
use super::property::{PropertyDescriptor, PropertyValue};

/// Kind tag of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Root holding the pipelines.
    Session,
    /// A pipeline built from a launch description.
    Pipeline,
    /// An element inside a pipeline.
    Element,
}

/// Behaviour a concrete resource supplies.
///
/// Implementors never lock anything themselves: the blanket
/// [`ResourceObject`] implementation acquires the object's lock, checks the
/// property flags and records the return code before and after calling the
/// `on_*` hooks. Hooks only run for verbs the property's flags allow.
pub trait Resource: Send + Sync + 'static {
    /// Mutable state guarded by the object's lock.
    type State: Send;

    /// Kind tag of the resource.
    fn kind(&self) -> ResourceKind;

    /// Shared name, lock and return-code storage.
    fn base(&self) -> &ObjectBase<Self::State>;

    /// Every property in display order.
    fn descriptors(&self) -> Vec<&PropertyDescriptor>;

    /// Looks up a property by name.
    fn descriptor(&self, property: &str) -> Option<&PropertyDescriptor> {
        self.descriptors()
            .into_iter()
            .find(|descriptor| descriptor.name == property)
    }

    /// Builds a child through a collection property.
    ///
    /// # Errors
    ///
    /// Implementations report argument, naming and engine failures.
    fn on_create(
        &self,
        _state: &mut Self::State,
        property: &PropertyDescriptor,
        _args: &[String],
    ) -> Result<(), ResourceError> {
        Err(unsupported(Verb::Create, property))
    }

    /// Reads the current value of a property.
    ///
    /// # Errors
    ///
    /// Implementations report unknown or unreadable properties.
    fn on_read(
        &self,
        state: &Self::State,
        property: &PropertyDescriptor,
    ) -> Result<Value, ResourceError>;

    /// Applies an already parsed value.
    ///
    /// # Errors
    ///
    /// Implementations report engine failures.
    fn on_update(
        &self,
        _state: &mut Self::State,
        property: &PropertyDescriptor,
        _value: PropertyValue,
    ) -> Result<(), ResourceError> {
        Err(unsupported(Verb::Update, property))
    }

    /// Detaches the named child and hands it back for destruction.
    ///
    /// # Errors
    ///
    /// Implementations report missing children.
    fn on_delete(
        &self,
        _state: &mut Self::State,
        property: &PropertyDescriptor,
        _name: &str,
    ) -> Result<Arc<dyn ResourceObject>, ResourceError> {
        Err(unsupported(Verb::Delete, property))
    }

    /// Returns the named child of a collection, if present.
    fn child(
        &self,
        _state: &Self::State,
        _collection: &str,
        _name: &str,
    ) -> Option<Arc<dyn ResourceObject>> {
        None
    }

    /// Releases the state and hands back the children to destroy next.
    fn teardown(&self, _state: &mut Self::State) -> Vec<Arc<dyn ResourceObject>> {
        Vec::new()
    }
}

fn unsupported(verb: Verb, property: &PropertyDescriptor) -> ResourceError {
    ResourceError::internal(format!(
        "property '{}' advertises {verb} without an implementation",
        property.name
    ))
}

/// Object-safe resource interface used by path resolution and dispatch.
pub trait ResourceObject: Send + Sync {
    /// Name of the resource.
    fn name(&self) -> &str;

    /// Kind tag of the resource.
    fn kind(&self) -> ResourceKind;

    /// Return code of the most recent CRUD call.
    fn last_code(&self) -> ReturnCode;

    /// Creates a child through `property`.
    ///
    /// # Errors
    ///
    /// Returns the error whose code was recorded as the last code.
    fn create(&self, property: &str, args: &[String]) -> Result<(), ResourceError>;

    /// Reads `property`.
    ///
    /// # Errors
    ///
    /// Returns the error whose code was recorded as the last code.
    fn read(&self, property: &str) -> Result<Value, ResourceError>;

    /// Replaces the value of `property` with the single argument in `args`.
    ///
    /// # Errors
    ///
    /// Returns the error whose code was recorded as the last code.
    fn update(&self, property: &str, args: &[String]) -> Result<(), ResourceError>;

    /// Deletes the child `name` from the collection `property`.
    ///
    /// # Errors
    ///
    /// Returns the error whose code was recorded as the last code.
    fn delete(&self, property: &str, name: &str) -> Result<(), ResourceError>;

    /// Observable state as a JSON document: readable property values plus
    /// the verbs each property accepts.
    ///
    /// # Errors
    ///
    /// Returns the error whose code was recorded as the last code.
    fn describe(&self) -> Result<Value, ResourceError>;

    /// Observable state rendered as pretty JSON text.
    ///
    /// # Errors
    ///
    /// Returns the error whose code was recorded as the last code.
    fn to_text(&self) -> Result<String, ResourceError> {
        let document = self.describe()?;
        serde_json::to_string_pretty(&document)
            .map_err(|error| ResourceError::internal(error.to_string()))
    }

    /// Resolves a child without recording a return code.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::ChildNotFound`] when no such child exists.
    fn child(&self, collection: &str, name: &str)
    -> Result<Arc<dyn ResourceObject>, ResourceError>;

    /// Destroys the object and its subtree, top-down.
    fn destroy(&self);
}

impl<R: Resource> ResourceObject for R {
    fn name(&self) -> &str {
        self.base().name()
    }

    fn kind(&self) -> ResourceKind {
        Resource::kind(self)
    }

    fn last_code(&self) -> ReturnCode {
        self.base()
            .last_code()
            .unwrap_or(ReturnCode::InternalError)
    }

    fn create(&self, property: &str, args: &[String]) -> Result<(), ResourceError> {
        self.base().call(|state| {
            let descriptor = permitted(self, property, Verb::Create)?;
            self.on_create(state, descriptor, args)
        })
    }

    fn read(&self, property: &str) -> Result<Value, ResourceError> {
        self.base().call(|state| {
            let descriptor = permitted(self, property, Verb::Read)?;
            self.on_read(state, descriptor)
        })
    }

    fn update(&self, property: &str, args: &[String]) -> Result<(), ResourceError> {
        self.base().call(|state| {
            let descriptor = permitted(self, property, Verb::Update)?;
            let value = match args {
                [] => return Err(ResourceError::MissingArgument { what: "value" }),
                [value] => descriptor.parse(value)?,
                _ => {
                    return Err(ResourceError::invalid_argument(format!(
                        "update expects one value, got {}",
                        args.len()
                    )));
                }
            };
            self.on_update(state, descriptor, value)
        })
    }

    fn delete(&self, property: &str, name: &str) -> Result<(), ResourceError> {
        self.base().call(|state| {
            let descriptor = permitted(self, property, Verb::Delete)?;
            if name.is_empty() {
                return Err(ResourceError::MissingArgument { what: "name" });
            }
            let removed = self.on_delete(state, descriptor, name)?;
            removed.destroy();
            Ok(())
        })
    }

    fn describe(&self) -> Result<Value, ResourceError> {
        self.base().call(|state| {
            let mut properties = Map::new();
            let mut access = Map::new();
            for descriptor in self.descriptors() {
                access.insert(descriptor.name.to_owned(), json!(descriptor.flags.label()));
                if descriptor.flags.contains(PropertyFlags::READ) {
                    let value = self.on_read(state, descriptor)?;
                    properties.insert(descriptor.name.to_owned(), value);
                }
            }
            Ok(json!({
                "name": self.base().name(),
                "type": Resource::kind(self),
                "properties": properties,
                "access": access,
            }))
        })
    }

    fn child(
        &self,
        collection: &str,
        name: &str,
    ) -> Result<Arc<dyn ResourceObject>, ResourceError> {
        self.base().peek(|state| {
            Resource::child(self, state, collection, name)
                .ok_or_else(|| ResourceError::child_not_found(collection, name))
        })
    }

    fn destroy(&self) {
        self.base().destroy(|state| {
            for child in self.teardown(state) {
                child.destroy();
            }
        });
        debug!(
            target: OBJECT_TARGET,
            kind = %Resource::kind(self),
            name = %self.base().name(),
            "subtree released"
        );
    }
}

fn permitted<'a, R: Resource + ?Sized>(
    resource: &'a R,
    property: &str,
    verb: Verb,
) -> Result<&'a PropertyDescriptor, ResourceError> {
    if property.is_empty() {
        return Err(ResourceError::MissingArgument { what: "property" });
    }
    let descriptor =
        resource
            .descriptor(property)
            .ok_or_else(|| ResourceError::UnknownProperty {
                object: resource.base().name().to_owned(),
                property: property.to_owned(),
            })?;
    if descriptor.flags.allows(verb) {
        Ok(descriptor)
    } else {
        Err(ResourceError::NotPermitted {
            verb,
            property: property.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::object::PropertyKind;

    static PROPERTIES: [PropertyDescriptor; 3] = [
        PropertyDescriptor::new("label", PropertyKind::String, PropertyFlags::READ_ONLY, "l"),
        PropertyDescriptor::new("secret", PropertyKind::String, PropertyFlags::UPDATE, ""),
        PropertyDescriptor::new(
            "children",
            PropertyKind::Collection,
            PropertyFlags::COLLECTION,
            "",
        ),
    ];

    /// Resource whose hooks record every verb that reaches them.
    struct Recorder {
        base: ObjectBase<()>,
        hooks: Mutex<Vec<Verb>>,
    }

    impl Recorder {
        fn hooks(&self) -> Vec<Verb> {
            self.hooks.lock().expect("hook log").clone()
        }

        fn record(&self, verb: Verb) {
            self.hooks.lock().expect("hook log").push(verb);
        }
    }

    impl Resource for Recorder {
        type State = ();

        fn kind(&self) -> ResourceKind {
            ResourceKind::Element
        }

        fn base(&self) -> &ObjectBase<()> {
            &self.base
        }

        fn descriptors(&self) -> Vec<&PropertyDescriptor> {
            PROPERTIES.iter().collect()
        }

        fn on_create(
            &self,
            _state: &mut (),
            _property: &PropertyDescriptor,
            _args: &[String],
        ) -> Result<(), ResourceError> {
            self.record(Verb::Create);
            Ok(())
        }

        fn on_read(&self, _state: &(), property: &PropertyDescriptor) -> Result<Value, ResourceError> {
            self.record(Verb::Read);
            Ok(json!(property.default))
        }

        fn on_update(
            &self,
            _state: &mut (),
            _property: &PropertyDescriptor,
            _value: PropertyValue,
        ) -> Result<(), ResourceError> {
            self.record(Verb::Update);
            Ok(())
        }

        fn on_delete(
            &self,
            _state: &mut (),
            property: &PropertyDescriptor,
            name: &str,
        ) -> Result<Arc<dyn ResourceObject>, ResourceError> {
            self.record(Verb::Delete);
            Err(ResourceError::child_not_found(property.name, name))
        }
    }

    #[fixture]
    fn recorder() -> Recorder {
        Recorder {
            base: ObjectBase::new("r0", ()),
            hooks: Mutex::new(Vec::new()),
        }
    }

    fn attempt(recorder: &Recorder, verb: Verb, property: &str) -> Result<(), ResourceError> {
        let args = ["x".to_owned()];
        match verb {
            Verb::Create => recorder.create(property, &args),
            Verb::Read => recorder.read(property).map(drop),
            Verb::Update => recorder.update(property, &args),
            Verb::Delete => recorder.delete(property, "x"),
        }
    }

    #[rstest]
    #[case(Verb::Create, "label")]
    #[case(Verb::Update, "label")]
    #[case(Verb::Delete, "label")]
    #[case(Verb::Read, "secret")]
    #[case(Verb::Update, "children")]
    fn denied_verbs_never_reach_a_hook(
        recorder: Recorder,
        #[case] verb: Verb,
        #[case] property: &str,
    ) {
        let result = attempt(&recorder, verb, property);

        assert!(matches!(result, Err(ResourceError::NotPermitted { .. })));
        assert_eq!(recorder.last_code(), ReturnCode::NotPermitted);
        assert!(recorder.hooks().is_empty());
    }

    #[rstest]
    #[case(Verb::Create, "children")]
    #[case(Verb::Read, "label")]
    #[case(Verb::Update, "secret")]
    #[case(Verb::Delete, "children")]
    fn permitted_verbs_reach_their_hook(
        recorder: Recorder,
        #[case] verb: Verb,
        #[case] property: &str,
    ) {
        let _ = attempt(&recorder, verb, property);
        assert_eq!(recorder.hooks(), vec![verb]);
    }

    #[rstest]
    fn describe_reports_access_for_every_property(recorder: Recorder) {
        let document = recorder.describe().expect("describe succeeds");
        assert_eq!(
            document,
            json!({
                "name": "r0",
                "type": "element",
                "properties": {"label": "l", "children": ""},
                "access": {
                    "label": "READ",
                    "secret": "UPDATE",
                    "children": "CREATE|READ|DELETE",
                },
            })
        );
        assert_eq!(recorder.hooks(), vec![Verb::Read, Verb::Read]);
    }
}

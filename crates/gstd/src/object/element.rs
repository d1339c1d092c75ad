//! Elements: leaves of the tree holding typed property values.

use serde_json::{Value, json};

use crate::engine::{ElementBlueprint, FactorySpec};

use super::base::ObjectBase;
use super::error::ResourceError;
use super::flags::PropertyFlags;
use super::property::{PropertyDescriptor, PropertyKind, PropertyValue};
use super::resource::{Resource, ResourceKind};

const ELEMENT_PROPERTIES: &[PropertyDescriptor] = &[
    PropertyDescriptor::new("name", PropertyKind::String, PropertyFlags::READ_ONLY, ""),
    PropertyDescriptor::new("factory", PropertyKind::String, PropertyFlags::READ_ONLY, ""),
    PropertyDescriptor::new(
        "properties",
        PropertyKind::Collection,
        PropertyFlags::READ_ONLY,
        "",
    ),
];

/// An element built from a factory, owned by a pipeline.
#[derive(Debug)]
pub struct Element {
    base: ObjectBase<Vec<(&'static str, PropertyValue)>>,
    factory: &'static FactorySpec,
}

impl Element {
    /// Builds an element with factory defaults overlaid by the blueprint.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Internal`] when a factory default does not
    /// parse.
    pub fn from_blueprint(blueprint: ElementBlueprint) -> Result<Self, ResourceError> {
        let mut values = blueprint
            .factory
            .properties
            .iter()
            .map(|descriptor| Ok((descriptor.name, descriptor.default_value()?)))
            .collect::<Result<Vec<_>, ResourceError>>()?;
        for (name, value) in blueprint.overrides {
            if let Some(slot) = values.iter_mut().find(|(existing, _)| *existing == name) {
                slot.1 = value;
            }
        }
        Ok(Self {
            base: ObjectBase::new(blueprint.name, values),
            factory: blueprint.factory,
        })
    }
}

impl Resource for Element {
    type State = Vec<(&'static str, PropertyValue)>;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Element
    }

    fn base(&self) -> &ObjectBase<Self::State> {
        &self.base
    }

    fn descriptors(&self) -> Vec<&PropertyDescriptor> {
        ELEMENT_PROPERTIES
            .iter()
            .chain(self.factory.properties)
            .collect()
    }

    fn on_read(
        &self,
        state: &Self::State,
        property: &PropertyDescriptor,
    ) -> Result<Value, ResourceError> {
        match property.name {
            "name" => Ok(json!(self.base.name())),
            "factory" => Ok(json!(self.factory.name)),
            "properties" => Ok(json!(
                self.factory
                    .properties
                    .iter()
                    .map(|descriptor| descriptor.name)
                    .collect::<Vec<_>>()
            )),
            other => state
                .iter()
                .find(|(name, _)| *name == other)
                .map(|(_, value)| json!(value))
                .ok_or_else(|| {
                    ResourceError::internal(format!("element property '{other}' has no value"))
                }),
        }
    }

    fn on_update(
        &self,
        state: &mut Self::State,
        property: &PropertyDescriptor,
        value: PropertyValue,
    ) -> Result<(), ResourceError> {
        let slot = state
            .iter_mut()
            .find(|(name, _)| *name == property.name)
            .ok_or_else(|| {
                ResourceError::internal(format!(
                    "element property '{}' has no value",
                    property.name
                ))
            })?;
        slot.1 = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gstd_types::ReturnCode;

    use super::*;
    use crate::engine::parse_description;
    use crate::object::ResourceObject;

    fn element(description: &str) -> Element {
        let blueprint = parse_description(description)
            .expect("description parses")
            .into_iter()
            .next()
            .expect("one element");
        Element::from_blueprint(blueprint).expect("element builds")
    }

    #[test]
    fn starts_from_defaults_and_overrides() {
        let element = element("videotestsrc pattern=ball");
        assert_eq!(element.read("pattern").ok(), Some(json!("ball")));
        assert_eq!(element.read("is-live").ok(), Some(json!(false)));
        assert_eq!(element.read("num-buffers").ok(), Some(json!(-1)));
    }

    #[test]
    fn lists_catalogue_properties() {
        let element = element("fakesink");
        assert_eq!(
            element.read("properties").ok(),
            Some(json!(["sync", "silent", "num-buffers"]))
        );
        assert_eq!(element.read("factory").ok(), Some(json!("fakesink")));
    }

    #[test]
    fn updates_writable_properties() {
        let element = element("audiotestsrc");
        element
            .update("freq", &["1000".to_owned()])
            .expect("update succeeds");
        assert_eq!(element.read("freq").ok(), Some(json!(1000.0)));
    }

    #[test]
    fn rejects_out_of_range_values_without_change() {
        let element = element("audiotestsrc");
        let result = element.update("volume", &["2".to_owned()]);
        assert!(result.is_err());
        assert_eq!(element.last_code(), ReturnCode::BadArgument);
        assert_eq!(element.read("volume").ok(), Some(json!(0.8)));
    }

    #[test]
    fn read_only_properties_refuse_updates() {
        let element = element("queue");
        let result = element.update("current-level-buffers", &["5".to_owned()]);
        assert!(result.is_err());
        assert_eq!(element.last_code(), ReturnCode::NotPermitted);
        let renamed = element.update("name", &["other".to_owned()]);
        assert!(renamed.is_err());
        assert_eq!(element.name(), "queue0");
    }

    #[test]
    fn unknown_properties_are_not_found() {
        let element = element("fakesink");
        assert!(element.read("colour").is_err());
        assert_eq!(element.last_code(), ReturnCode::NotFound);
    }
}

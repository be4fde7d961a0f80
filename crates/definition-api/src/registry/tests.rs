use serde_yaml::{Mapping, Value};

use super::*;
use crate::{BuildError, Configuration, Definition, DefinitionKind};

fn record(pairs: &[(&str, &str)]) -> Mapping {
    let mut mapping = Mapping::new();
    for (key, value) in pairs {
        mapping.insert(Value::from(*key), Value::from(*value));
    }
    mapping
}

struct UppercaseBuilder;

impl KindBuilder for UppercaseBuilder {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn build(
        &self,
        _configuration: &Configuration,
        attributes: Mapping,
    ) -> Result<Definition, BuildError> {
        let name = attributes
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_uppercase();
        Ok(Definition::new(name, "memory", attributes))
    }
}

#[test]
fn register_replaces_existing_kind_in_place() {
    let mut registry = KindRegistry::empty();
    registry.register(AttributeBuilder::new("memory"));
    registry.register(AttributeBuilder::new("xliff"));
    registry.register(UppercaseBuilder);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["memory", "xliff"]);

    let built = registry
        .builder("memory")
        .expect("memory builder")
        .build(&Configuration::new(), record(&[("name", "lower")]))
        .expect("built");
    assert_eq!(built.name(), "LOWER");
}

#[test]
fn lookup_of_unregistered_kind_returns_none() {
    let registry = KindRegistry::empty();
    assert!(registry.is_empty());
    assert!(registry.builder("memory").is_none());
    assert!(!registry.contains("memory"));
}

#[test]
fn definition_builder_dispatches_on_type() {
    let mut builder = DefinitionBuilder::default();
    builder.register_dictionary(AttributeBuilder::new("memory"));
    builder.register_job(AttributeBuilder::new("copy"));

    let configuration = Configuration::new();
    let dictionary = builder
        .build_dictionary(&configuration, record(&[("name", "d"), ("type", "memory")]))
        .expect("dictionary");
    let job = builder
        .build_job(&configuration, record(&[("name", "j"), ("type", "copy")]))
        .expect("job");

    assert_eq!(dictionary.name(), "d");
    assert_eq!(dictionary.kind(), "memory");
    assert_eq!(job.name(), "j");
    assert_eq!(job.kind(), "copy");
}

#[test]
fn unknown_type_is_reported_per_family() {
    let mut builder = DefinitionBuilder::default();
    builder.register_dictionary(AttributeBuilder::new("copy"));

    let err = builder
        .build_job(&Configuration::new(), record(&[("name", "j"), ("type", "copy")]))
        .unwrap_err();

    assert_eq!(err, BuildError::unknown_type(DefinitionKind::Job, "copy"));
    assert_eq!(err.to_string(), "unknown job type \"copy\"");
}

#[test]
fn missing_type_is_reported() {
    let builder = DefinitionBuilder::default();
    let err = builder
        .build_dictionary(&Configuration::new(), record(&[("name", "d")]))
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::MissingType {
            kind: DefinitionKind::Dictionary
        }
    );
}

#[test]
fn attribute_builder_checks_required_attributes() {
    let builder = AttributeBuilder::new("xliff").requiring(&["source_language", "target_language"]);

    let err = builder
        .build(
            &Configuration::new(),
            record(&[("name", "d"), ("type", "xliff"), ("source_language", "en")]),
        )
        .unwrap_err();
    assert_eq!(
        err,
        BuildError::MissingAttribute {
            attribute: "target_language"
        }
    );

    let definition = builder
        .build(
            &Configuration::new(),
            record(&[
                ("name", "d"),
                ("type", "xliff"),
                ("source_language", "en"),
                ("target_language", "de"),
            ]),
        )
        .expect("definition");
    assert_eq!(definition.str_attribute("target_language"), Some("de"));
}

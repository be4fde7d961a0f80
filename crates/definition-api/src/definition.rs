use std::fmt;

use serde_yaml::{Mapping, Value};

/// Ordered attribute record attached to a definition.
pub type Attributes = Mapping;

/// Attribute holding the authoritative definition name.
pub const NAME_ATTRIBUTE: &str = "name";
/// Attribute holding the type discriminator used to select a builder.
pub const TYPE_ATTRIBUTE: &str = "type";
/// Attribute receiving an explicit dictionary `name` once the mapping key takes over.
pub const DICTIONARY_ATTRIBUTE: &str = "dictionary";

/// The two families of definitions a configuration holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Dictionary,
    Job,
}

impl DefinitionKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dictionary => "dictionary",
            Self::Job => "job",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed record describing a dictionary or a translation job.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    name: String,
    kind: String,
    attributes: Attributes,
}

impl Definition {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            attributes,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `type` discriminator the definition was built from.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Return an attribute as a string slice when it holds a string.
    #[must_use]
    pub fn str_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }
}

/// Read a string attribute from a raw record.
#[must_use]
pub fn str_attribute<'a>(attributes: &'a Attributes, key: &str) -> Option<&'a str> {
    attributes.get(key).and_then(Value::as_str)
}

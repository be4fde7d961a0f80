use crate::configuration::Configuration;
use crate::definition::{Attributes, Definition, NAME_ATTRIBUTE, str_attribute};
use crate::error::BuildError;

/// Materialises definitions of a single `type`.
///
/// Implementations receive the configuration built so far so that they can
/// resolve references to definitions loaded earlier.
pub trait KindBuilder: Send + Sync {
    /// The `type` value this builder is registered under.
    fn kind(&self) -> &'static str;

    /// Build a definition from a validated attribute record.
    fn build(
        &self,
        configuration: &Configuration,
        attributes: Attributes,
    ) -> Result<Definition, BuildError>;
}

/// A builder that checks for required attributes and keeps the record as-is.
#[derive(Debug, Clone, Copy)]
pub struct AttributeBuilder {
    kind: &'static str,
    required: &'static [&'static str],
}

impl AttributeBuilder {
    #[must_use]
    pub const fn new(kind: &'static str) -> Self {
        Self { kind, required: &[] }
    }

    #[must_use]
    pub const fn requiring(mut self, required: &'static [&'static str]) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn required(&self) -> &'static [&'static str] {
        self.required
    }
}

impl KindBuilder for AttributeBuilder {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn build(
        &self,
        _configuration: &Configuration,
        attributes: Attributes,
    ) -> Result<Definition, BuildError> {
        if let Some(missing) = self
            .required
            .iter()
            .find(|attribute| !attributes.contains_key(**attribute))
        {
            return Err(BuildError::MissingAttribute {
                attribute: *missing,
            });
        }

        let name = str_attribute(&attributes, NAME_ATTRIBUTE)
            .ok_or(BuildError::MissingAttribute {
                attribute: NAME_ATTRIBUTE,
            })?
            .to_string();

        Ok(Definition::new(name, self.kind, attributes))
    }
}

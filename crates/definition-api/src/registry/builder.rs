use crate::configuration::Configuration;
use crate::definition::{Attributes, Definition, DefinitionKind, TYPE_ATTRIBUTE, str_attribute};
use crate::error::BuildError;

use super::{KindBuilder, KindRegistry};

/// Dispatches attribute records to the builder registered for their `type`.
#[derive(Clone, Default)]
pub struct DefinitionBuilder {
    dictionaries: KindRegistry,
    jobs: KindRegistry,
}

impl DefinitionBuilder {
    #[must_use]
    pub fn new(dictionaries: KindRegistry, jobs: KindRegistry) -> Self {
        Self { dictionaries, jobs }
    }

    pub fn register_dictionary<B>(&mut self, builder: B)
    where
        B: KindBuilder + 'static,
    {
        self.dictionaries.register(builder);
    }

    pub fn register_job<B>(&mut self, builder: B)
    where
        B: KindBuilder + 'static,
    {
        self.jobs.register(builder);
    }

    #[must_use]
    pub fn dictionaries(&self) -> &KindRegistry {
        &self.dictionaries
    }

    #[must_use]
    pub fn jobs(&self) -> &KindRegistry {
        &self.jobs
    }

    #[must_use]
    pub fn registry(&self, kind: DefinitionKind) -> &KindRegistry {
        match kind {
            DefinitionKind::Dictionary => &self.dictionaries,
            DefinitionKind::Job => &self.jobs,
        }
    }

    /// Build a dictionary definition from its attribute record.
    pub fn build_dictionary(
        &self,
        configuration: &Configuration,
        attributes: Attributes,
    ) -> Result<Definition, BuildError> {
        self.build(DefinitionKind::Dictionary, configuration, attributes)
    }

    /// Build a job definition from its attribute record.
    pub fn build_job(
        &self,
        configuration: &Configuration,
        attributes: Attributes,
    ) -> Result<Definition, BuildError> {
        self.build(DefinitionKind::Job, configuration, attributes)
    }

    fn build(
        &self,
        kind: DefinitionKind,
        configuration: &Configuration,
        attributes: Attributes,
    ) -> Result<Definition, BuildError> {
        let type_name = str_attribute(&attributes, TYPE_ATTRIBUTE)
            .ok_or(BuildError::MissingType { kind })?;
        let builder = self
            .registry(kind)
            .builder(type_name)
            .ok_or_else(|| BuildError::unknown_type(kind, type_name))?;
        builder.build(configuration, attributes)
    }
}

use indexmap::IndexMap;

use crate::definition::Definition;

/// Aggregate of every dictionary and job definition produced by one load.
///
/// Both collections keep the order in which a name was first defined. Setting
/// a definition under an existing name replaces it without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    dictionaries: IndexMap<String, Definition>,
    jobs: IndexMap<String, Definition>,
}

impl Configuration {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dictionary definition, replacing any previous one of the same name.
    pub fn set_dictionary(&mut self, definition: Definition) -> Option<Definition> {
        self.dictionaries
            .insert(definition.name().to_string(), definition)
    }

    /// Register a job definition, replacing any previous one of the same name.
    pub fn set_job(&mut self, definition: Definition) -> Option<Definition> {
        self.jobs.insert(definition.name().to_string(), definition)
    }

    #[must_use]
    pub fn dictionary(&self, name: &str) -> Option<&Definition> {
        self.dictionaries.get(name)
    }

    #[must_use]
    pub fn job(&self, name: &str) -> Option<&Definition> {
        self.jobs.get(name)
    }

    #[must_use]
    pub fn has_dictionary(&self, name: &str) -> bool {
        self.dictionaries.contains_key(name)
    }

    #[must_use]
    pub fn has_job(&self, name: &str) -> bool {
        self.jobs.contains_key(name)
    }

    /// Dictionary names in first-definition order.
    #[must_use]
    pub fn dictionary_names(&self) -> Vec<&str> {
        self.dictionaries.keys().map(String::as_str).collect()
    }

    /// Job names in first-definition order.
    #[must_use]
    pub fn job_names(&self) -> Vec<&str> {
        self.jobs.keys().map(String::as_str).collect()
    }

    pub fn dictionaries(&self) -> impl Iterator<Item = &Definition> {
        self.dictionaries.values()
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Definition> {
        self.jobs.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty() && self.jobs.is_empty()
    }
}

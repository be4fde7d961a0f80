//! Dictionary and job kinds shipped with the binary.

use i18n_jobs_definition_api::{AttributeBuilder, DefinitionBuilder};

/// Dictionaries held in memory for the duration of a run.
pub const MEMORY: AttributeBuilder = AttributeBuilder::new("memory");

/// Dictionaries backed by XLIFF files.
pub const XLIFF: AttributeBuilder = AttributeBuilder::new("xliff").requiring(&["path"]);

/// Dictionaries layered from other named dictionaries.
pub const COMPOUND: AttributeBuilder =
    AttributeBuilder::new("compound").requiring(&["dictionaries"]);

/// Jobs copying translations from one dictionary into another.
pub const COPY: AttributeBuilder = AttributeBuilder::new("copy").requiring(&["source", "target"]);

/// Jobs running other jobs in sequence.
pub const BATCH: AttributeBuilder = AttributeBuilder::new("batch").requiring(&["jobs"]);

/// A builder with every built-in kind registered.
#[must_use]
pub fn definition_builder() -> DefinitionBuilder {
    let mut builder = DefinitionBuilder::default();
    for kind in [MEMORY, XLIFF, COMPOUND] {
        builder.register_dictionary(kind);
    }
    for kind in [COPY, BATCH] {
        builder.register_job(kind);
    }
    builder
}

//! Shared interfaces between the configuration loader and the builders that
//! turn declarative dictionary and job records into definitions.
//!
//! The loader only depends on [`DefinitionBuilder`]; concrete kinds are
//! contributed by registering [`KindBuilder`] implementations.

pub mod configuration;
pub mod definition;
pub mod error;
pub mod registry;

pub use configuration::Configuration;
pub use definition::{
    Attributes, DICTIONARY_ATTRIBUTE, Definition, DefinitionKind, NAME_ATTRIBUTE, TYPE_ATTRIBUTE,
    str_attribute,
};
pub use error::BuildError;
pub use registry::{AttributeBuilder, DefinitionBuilder, KindBuilder, KindRegistry};

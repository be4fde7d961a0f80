//! Loader for hierarchical translation job configurations.
//!
//! A root document declares `dictionaries` and `jobs` and may `import` other
//! documents by path or glob pattern. [`ConfigurationLoader`] resolves the
//! import tree, rejects circular imports and hands every definition to a
//! [`DefinitionBuilder`], producing a single [`Configuration`].

pub mod app_dirs;
pub mod builtin;
pub mod error;
pub mod loader;
pub mod logging;

pub use error::{LoadError, Result};
pub use i18n_jobs_definition_api::{
    Attributes, Configuration, Definition, DefinitionBuilder, DefinitionKind, KindBuilder,
    KindRegistry,
};
pub use loader::{ConfigurationLoader, DocumentFormat, FileLocator};

//! Hierarchical loading of job configuration documents.
//!
//! A root document is located, parsed and validated; its `imports` are loaded
//! depth-first before its own `dictionaries` and `jobs` are handed to the
//! [`DefinitionBuilder`]. Each top-level [`ConfigurationLoader::load`] owns a
//! [`LoadingSet`] that detects circular imports.

mod definitions;
pub mod document;
pub mod glob;
mod imports;
pub mod loading;
pub mod locator;


use std::fs;
use std::path::{Path, PathBuf};

use i18n_jobs_definition_api::{Configuration, DefinitionBuilder};
use tracing::{debug, info};

pub use self::document::{DefinitionEntry, DocumentFormat, ImportEntry, RawDocument};
pub use self::glob::{ExclusionSet, GlobExpander, GlobMatch, GlobOptions};
pub use self::loading::LoadingSet;
pub use self::locator::FileLocator;
use crate::error::{LoadError, Result};

/// Entry point that turns a root resource into a [`Configuration`].
#[derive(Clone)]
pub struct ConfigurationLoader {
    locator: FileLocator,
    builder: DefinitionBuilder,
}

impl ConfigurationLoader {
    #[must_use]
    pub fn new(locator: FileLocator, builder: DefinitionBuilder) -> Self {
        Self { locator, builder }
    }

    #[must_use]
    pub fn locator(&self) -> &FileLocator {
        &self.locator
    }

    #[must_use]
    pub fn builder(&self) -> &DefinitionBuilder {
        &self.builder
    }

    /// Returns `true` when a document format can load `resource`.
    #[must_use]
    pub fn supports(&self, resource: &str, type_hint: Option<&str>) -> bool {
        DocumentFormat::resolve(resource, type_hint).is_some()
    }

    /// Load `resource` and everything it imports.
    pub fn load(&self, resource: &str) -> Result<Configuration> {
        self.load_with_type(resource, None)
    }

    /// Load `resource`, selecting the document format from `type_hint`.
    pub fn load_with_type(&self, resource: &str, type_hint: Option<&str>) -> Result<Configuration> {
        let format = DocumentFormat::resolve(resource, type_hint).ok_or_else(|| {
            LoadError::UnsupportedResource {
                resource: resource.to_string(),
                type_hint: type_hint.map(str::to_string),
            }
        })?;
        let path = self.locator.locate(resource, None)?;
        let id = identify(&path)?;

        let mut session = LoadSession::new(self);
        session.load_scoped(id, format)?;

        let configuration = session.configuration;
        info!(
            resource,
            dictionaries = configuration.dictionary_names().len(),
            jobs = configuration.job_names().len(),
            "configuration loaded"
        );
        Ok(configuration)
    }
}

/// State of one top-level load: the configuration built so far and the
/// documents currently in progress.
pub(crate) struct LoadSession<'a> {
    loader: &'a ConfigurationLoader,
    configuration: Configuration,
    loading: LoadingSet,
}

impl<'a> LoadSession<'a> {
    fn new(loader: &'a ConfigurationLoader) -> Self {
        Self {
            loader,
            configuration: Configuration::new(),
            loading: LoadingSet::new(),
        }
    }

    /// Load the document identified by `id` while it is marked as loading.
    fn load_scoped(&mut self, id: PathBuf, format: DocumentFormat) -> Result<()> {
        debug!(path = %id.display(), depth = self.loading.len(), "loading configuration file");
        self.loading.enter(id.clone());
        let result = self.load_document(&id, format);
        self.loading.leave(&id);
        debug!(path = %id.display(), ok = result.is_ok(), "left configuration file");
        result
    }

    fn load_document(&mut self, path: &Path, format: DocumentFormat) -> Result<()> {
        let document = document::read(path, format)?;
        let current_dir = path.parent();

        for entry in document.imports() {
            self.import(entry, path, current_dir)?;
        }

        self.collect_definitions(document)
    }
}

/// Canonical identifier of a located file.
fn identify(path: &Path) -> Result<PathBuf> {
    fs::canonicalize(path).map_err(|err| LoadError::unreadable(path, err))
}

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::document::{DocumentFormat, ImportEntry};
use super::glob::{self, ExclusionSet, GlobExpander, GlobOptions};
use super::{LoadSession, identify};
use crate::error::{LoadError, Result};

/// Type hint that only marks a resource as a pattern.
const GLOB_TYPE: &str = "glob";

impl LoadSession<'_> {
    /// Import one `imports` entry of the document at `source`.
    pub(super) fn import(
        &mut self,
        entry: &ImportEntry,
        source: &Path,
        current_dir: Option<&Path>,
    ) -> Result<()> {
        if !glob::is_glob(&entry.resource) {
            return self.import_single(
                &entry.resource,
                entry.type_hint.as_deref(),
                entry.ignore_errors,
                source,
                current_dir,
            );
        }

        let has_prefix = glob::has_directory_prefix(&entry.resource);
        let matched = match self.import_matches(entry, source, current_dir, has_prefix) {
            Ok(matched) => matched,
            Err(err) => return settle(Err(err), &entry.resource, source, entry.ignore_errors),
        };

        if matched > 0 || has_prefix {
            return Ok(());
        }

        self.import_single(
            &entry.resource,
            entry.type_hint.as_deref(),
            entry.ignore_errors,
            source,
            current_dir,
        )
    }

    /// Import every match of a glob entry and return how many were found.
    fn import_matches(
        &mut self,
        entry: &ImportEntry,
        source: &Path,
        current_dir: Option<&Path>,
        has_prefix: bool,
    ) -> Result<usize> {
        let loader = self.loader;
        let expander = GlobExpander::new(&loader.locator, current_dir);

        // A missing exclusion target leaves nothing to exclude.
        let mut excluded = ExclusionSet::default();
        for pattern in &entry.exclude {
            let options = GlobOptions {
                recursive: true,
                for_exclusion: true,
                ignore_errors: true,
                ..GlobOptions::default()
            };
            for found in expander.expand(pattern, options)?.into_matches() {
                excluded.insert(&found.path);
            }
        }

        let options = GlobOptions {
            ignore_errors: entry.ignore_errors || !has_prefix,
            excluded,
            ..GlobOptions::default()
        };
        let type_hint = entry
            .type_hint
            .as_deref()
            .filter(|hint| *hint != GLOB_TYPE);

        let mut matched = 0;
        for found in expander.expand(&entry.resource, options)?.into_matches() {
            trace!(pattern = %entry.resource, path = %found.path.display(), "glob match");
            matched += 1;
            let resource = found.path.to_string_lossy();
            self.import_single(&resource, type_hint, entry.ignore_errors, source, current_dir)?;
        }
        Ok(matched)
    }

    fn import_single(
        &mut self,
        resource: &str,
        type_hint: Option<&str>,
        ignore_errors: bool,
        source: &Path,
        current_dir: Option<&Path>,
    ) -> Result<()> {
        let result = self.import_resource(resource, type_hint, current_dir);
        settle(result, resource, source, ignore_errors)
    }

    fn import_resource(
        &mut self,
        resource: &str,
        type_hint: Option<&str>,
        current_dir: Option<&Path>,
    ) -> Result<()> {
        let format = DocumentFormat::resolve(resource, type_hint).ok_or_else(|| {
            LoadError::UnsupportedResource {
                resource: resource.to_string(),
                type_hint: type_hint.map(str::to_string),
            }
        })?;

        let mut candidates: Vec<PathBuf> = Vec::new();
        for path in self.loader.locator.locate_all(resource, current_dir)? {
            let id = identify(&path)?;
            if !candidates.contains(&id) {
                candidates.push(id);
            }
        }

        let Some(id) = candidates
            .iter()
            .find(|id| !self.loading.contains(id))
            .cloned()
        else {
            let reentered = candidates
                .last()
                .cloned()
                .unwrap_or_else(|| PathBuf::from(resource));
            return Err(LoadError::CircularImport {
                chain: self.loading.chain_to(&reentered),
            });
        };

        self.load_scoped(id, format)
    }
}

/// Apply the import error policy to the outcome of one import.
///
/// Circular imports always propagate. Other failures are dropped when the entry
/// asked to ignore errors, and otherwise wrapped once with the importing file.
fn settle(result: Result<()>, resource: &str, source: &Path, ignore_errors: bool) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_circular() => Err(err),
        Err(err) if ignore_errors => {
            debug!(resource, source = %source.display(), error = %err, "ignoring failed import");
            Ok(())
        }
        Err(err @ LoadError::ImportFailed { .. }) => Err(err),
        Err(err) => Err(LoadError::ImportFailed {
            resource: resource.to_string(),
            source_resource: Some(source.to_path_buf()),
            cause: Box::new(err),
        }),
    }
}

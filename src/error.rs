//! Errors produced while loading a job configuration.

use std::fmt;
use std::path::{Path, PathBuf};

use i18n_jobs_definition_api::{BuildError, DefinitionKind};
use thiserror::Error;

use crate::loader::DocumentFormat;

pub type Result<T, E = LoadError> = std::result::Result<T, E>;

/// Failure raised by the configuration loader.
///
/// Wrapper variants render their cause inline so that a single line names
/// both the root cause and the file responsible for it.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A literal resource or glob prefix does not exist in any searched location.
    #[error("the resource \"{resource}\" could not be found{}", searched_suffix(.searched))]
    ResourceNotFound {
        resource: String,
        searched: Vec<PathBuf>,
    },

    /// A resource was imported while it was still being loaded.
    #[error("circular import detected: {}", Chain(.chain))]
    CircularImport { chain: Vec<PathBuf> },

    /// A document does not have the expected structure.
    #[error("the config file \"{}\" is not valid: {reason}", .path.display())]
    StructureInvalid { path: PathBuf, reason: String },

    /// The raw file content is not valid in its declared format.
    #[error("the file \"{}\" does not contain valid {format}: {details}", .path.display())]
    ParseFailure {
        path: PathBuf,
        format: DocumentFormat,
        details: String,
    },

    /// A definition names a `type` without a registered builder.
    #[error("unknown {kind} type \"{type_name}\"")]
    UnknownDefinitionType {
        kind: DefinitionKind,
        type_name: String,
        path: PathBuf,
    },

    /// A registered builder rejected a definition.
    #[error("cannot build {kind} \"{name}\": {cause}")]
    DefinitionFailed {
        kind: DefinitionKind,
        name: String,
        path: PathBuf,
        cause: BuildError,
    },

    /// Any failure while collecting the definitions of one file.
    #[error("invalid configuration in \"{}\": {cause}", .path.display())]
    InvalidConfiguration { path: PathBuf, cause: Box<LoadError> },

    /// Any other failure while importing a resource.
    #[error("cannot import \"{resource}\"{}: {cause}", importer_suffix(.source_resource.as_deref()))]
    ImportFailed {
        resource: String,
        source_resource: Option<PathBuf>,
        cause: Box<LoadError>,
    },

    /// No document format handles the resource.
    #[error("unsupported configuration \"{resource}\"{}", type_suffix(.type_hint.as_deref()))]
    UnsupportedResource {
        resource: String,
        type_hint: Option<String>,
    },

    /// A glob pattern could not be compiled.
    #[error("invalid glob pattern \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("\"{}\" is not a local file", .path.display())]
    NotLocalFile { path: PathBuf },

    #[error("the file \"{}\" does not exist", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("cannot read \"{}\": {reason}", .path.display())]
    UnreadableFile { path: PathBuf, reason: String },
}

impl LoadError {
    pub(crate) fn structure(path: &Path, reason: impl Into<String>) -> Self {
        Self::StructureInvalid {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unreadable(path: &Path, reason: impl fmt::Display) -> Self {
        Self::UnreadableFile {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// The wrapped cause, for `ImportFailed` and `InvalidConfiguration`.
    #[must_use]
    pub fn cause(&self) -> Option<&LoadError> {
        match self {
            Self::ImportFailed { cause, .. } | Self::InvalidConfiguration { cause, .. } => {
                Some(cause)
            }
            _ => None,
        }
    }

    /// Follow wrapped causes down to the originating failure.
    #[must_use]
    pub fn innermost(&self) -> &LoadError {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current
    }

    /// Returns `true` for the circular import condition, which is never ignored.
    #[must_use]
    pub fn is_circular(&self) -> bool {
        matches!(self, Self::CircularImport { .. })
    }
}

struct Chain<'a>(&'a [PathBuf]);

impl fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, path) in self.0.iter().enumerate() {
            if position > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "\"{}\"", path.display())?;
        }
        Ok(())
    }
}

fn searched_suffix(searched: &[PathBuf]) -> String {
    if searched.is_empty() {
        return String::new();
    }
    let paths: Vec<String> = searched
        .iter()
        .map(|path| format!("\"{}\"", path.display()))
        .collect();
    format!(" (looked in: {})", paths.join(", "))
}

fn importer_suffix(source: Option<&Path>) -> String {
    source
        .map(|path| format!(" from \"{}\"", path.display()))
        .unwrap_or_default()
}

fn type_suffix(type_hint: Option<&str>) -> String {
    type_hint
        .map(|hint| format!(" of type \"{hint}\""))
        .unwrap_or_default()
}

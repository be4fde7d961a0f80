//! Reading and validating a single configuration document.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use i18n_jobs_definition_api::{
    Attributes, DICTIONARY_ATTRIBUTE, NAME_ATTRIBUTE, TYPE_ATTRIBUTE,
};
use serde_yaml::Value;

use crate::error::{LoadError, Result};

pub const IMPORTS_KEY: &str = "imports";
pub const DICTIONARIES_KEY: &str = "dictionaries";
pub const JOBS_KEY: &str = "jobs";

/// Top-level keys a document may contain.
pub const TOP_LEVEL_KEYS: &[&str] = &[IMPORTS_KEY, DICTIONARIES_KEY, JOBS_KEY];

const IMPORT_KEYS: &[&str] = &["resource", "type", "ignore_errors", "exclude"];

/// Syntax of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub const YAML_EXTENSIONS: &'static [&'static str] = &["yaml", "yml"];
    pub const JSON_EXTENSIONS: &'static [&'static str] = &["json"];

    /// Pick the format able to load `resource`.
    ///
    /// An explicit type hint takes precedence; without one the file
    /// extension decides. Returns `None` when no format applies.
    #[must_use]
    pub fn resolve(resource: &str, type_hint: Option<&str>) -> Option<Self> {
        match type_hint {
            Some(hint) => Self::from_name(hint),
            None => Path::new(resource)
                .extension()
                .and_then(|extension| extension.to_str())
                .and_then(Self::from_name),
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        if Self::YAML_EXTENSIONS.contains(&name) {
            Some(Self::Yaml)
        } else if Self::JSON_EXTENSIONS.contains(&name) {
            Some(Self::Json)
        } else {
            None
        }
    }

    fn parse(self, content: &str) -> std::result::Result<Value, String> {
        if content.trim().is_empty() {
            return Ok(Value::Null);
        }
        match self {
            Self::Yaml => serde_yaml::from_str(content).map_err(|err| err.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|err| err.to_string()),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("YAML"),
            Self::Json => f.write_str("JSON"),
        }
    }
}

/// Normalized form of one `imports` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub resource: String,
    pub type_hint: Option<String>,
    pub ignore_errors: bool,
    pub exclude: Vec<String>,
}

impl ImportEntry {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            type_hint: None,
            ignore_errors: false,
            exclude: Vec::new(),
        }
    }
}

/// One named entry of the `dictionaries` or `jobs` section.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionEntry {
    pub name: String,
    pub attributes: Attributes,
}

/// A validated document, split into its three sections.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    path: PathBuf,
    imports: Vec<ImportEntry>,
    dictionaries: Vec<DefinitionEntry>,
    jobs: Vec<DefinitionEntry>,
}

impl RawDocument {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn imports(&self) -> &[ImportEntry] {
        &self.imports
    }

    #[must_use]
    pub fn dictionaries(&self) -> &[DefinitionEntry] {
        &self.dictionaries
    }

    #[must_use]
    pub fn jobs(&self) -> &[DefinitionEntry] {
        &self.jobs
    }

    pub(crate) fn into_definitions(self) -> (PathBuf, Vec<DefinitionEntry>, Vec<DefinitionEntry>) {
        (self.path, self.dictionaries, self.jobs)
    }
}

/// Read, parse and validate the document at `path`.
pub fn read(path: &Path, format: DocumentFormat) -> Result<RawDocument> {
    if path.to_string_lossy().contains("://") {
        return Err(LoadError::NotLocalFile {
            path: path.to_path_buf(),
        });
    }
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(LoadError::unreadable(path, "not a regular file"));
    }

    let content = fs::read_to_string(path).map_err(|err| LoadError::unreadable(path, err))?;
    parse(path, format, &content)
}

/// Parse and validate `content` as if it had been read from `path`.
pub fn parse(path: &Path, format: DocumentFormat, content: &str) -> Result<RawDocument> {
    let tree = format
        .parse(content)
        .map_err(|details| LoadError::ParseFailure {
            path: path.to_path_buf(),
            format,
            details,
        })?;
    validate(path, tree)
}

fn validate(path: &Path, tree: Value) -> Result<RawDocument> {
    let Value::Mapping(root) = tree else {
        return Err(LoadError::structure(
            path,
            "it must contain a mapping of imports, dictionaries and jobs",
        ));
    };

    for key in root.keys() {
        match key.as_str() {
            Some(name) if TOP_LEVEL_KEYS.contains(&name) => {}
            _ => {
                return Err(LoadError::structure(
                    path,
                    format!("unknown configuration key {}", describe_key(key)),
                ));
            }
        }
    }

    let mut document = RawDocument {
        path: path.to_path_buf(),
        imports: Vec::new(),
        dictionaries: Vec::new(),
        jobs: Vec::new(),
    };

    for (key, value) in root {
        match key.as_str() {
            Some(IMPORTS_KEY) => document.imports = parse_imports(path, value)?,
            Some(DICTIONARIES_KEY) => {
                document.dictionaries = parse_definitions(path, DICTIONARIES_KEY, value)?;
            }
            Some(JOBS_KEY) => document.jobs = parse_definitions(path, JOBS_KEY, value)?,
            _ => {}
        }
    }

    Ok(document)
}

fn parse_imports(path: &Path, value: Value) -> Result<Vec<ImportEntry>> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(entries) => entries,
        _ => {
            return Err(LoadError::structure(
                path,
                "the \"imports\" key should contain a list",
            ));
        }
    };

    entries
        .into_iter()
        .map(|entry| parse_import(path, entry))
        .collect()
}

fn parse_import(path: &Path, entry: Value) -> Result<ImportEntry> {
    let record = match entry {
        Value::String(resource) => return Ok(ImportEntry::new(resource)),
        Value::Mapping(record) => record,
        _ => {
            return Err(LoadError::structure(
                path,
                "an import must be a resource name or a mapping with a \"resource\"",
            ));
        }
    };

    for key in record.keys() {
        if !key.as_str().is_some_and(|name| IMPORT_KEYS.contains(&name)) {
            return Err(LoadError::structure(
                path,
                format!("unknown import option {}", describe_key(key)),
            ));
        }
    }

    let resource = match record.get("resource") {
        Some(Value::String(resource)) => resource.clone(),
        Some(_) => {
            return Err(LoadError::structure(
                path,
                "the \"resource\" of an import must be a string",
            ));
        }
        None => {
            return Err(LoadError::structure(
                path,
                "an import should provide a \"resource\"",
            ));
        }
    };

    let type_hint = match record.get("type") {
        None | Some(Value::Null) => None,
        Some(Value::String(hint)) => Some(hint.clone()),
        Some(_) => {
            return Err(LoadError::structure(
                path,
                format!("the \"type\" of import \"{resource}\" must be a string"),
            ));
        }
    };

    let ignore_errors = match record.get("ignore_errors") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => {
            return Err(LoadError::structure(
                path,
                format!("\"ignore_errors\" of import \"{resource}\" must be a boolean"),
            ));
        }
    };

    let exclude = match record.get("exclude") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(pattern)) => vec![pattern.clone()],
        Some(Value::Sequence(patterns)) => patterns
            .iter()
            .map(|pattern| {
                pattern.as_str().map(str::to_string).ok_or_else(|| {
                    LoadError::structure(
                        path,
                        format!("\"exclude\" of import \"{resource}\" must only contain strings"),
                    )
                })
            })
            .collect::<Result<_>>()?,
        Some(_) => {
            return Err(LoadError::structure(
                path,
                format!("\"exclude\" of import \"{resource}\" must be a string or a list"),
            ));
        }
    };

    Ok(ImportEntry {
        resource,
        type_hint,
        ignore_errors,
        exclude,
    })
}

fn parse_definitions(path: &Path, section: &str, value: Value) -> Result<Vec<DefinitionEntry>> {
    let entries = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(entries) => entries,
        _ => {
            return Err(LoadError::structure(
                path,
                format!("the \"{section}\" key should contain a mapping of names to definitions"),
            ));
        }
    };

    entries
        .into_iter()
        .map(|(key, value)| parse_definition(path, section, key, value))
        .collect()
}

fn parse_definition(path: &Path, section: &str, key: Value, value: Value) -> Result<DefinitionEntry> {
    let name = match key {
        Value::String(name) => name,
        Value::Number(number) => number.to_string(),
        other => {
            return Err(LoadError::structure(
                path,
                format!("{section} must be keyed by name, found {}", describe_key(&other)),
            ));
        }
    };

    let Value::Mapping(attributes) = value else {
        return Err(LoadError::structure(
            path,
            format!("the entry \"{name}\" in \"{section}\" must be a mapping of attributes"),
        ));
    };

    match attributes.get(TYPE_ATTRIBUTE) {
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(LoadError::structure(
                path,
                format!("the \"type\" of \"{name}\" in \"{section}\" must be a string"),
            ));
        }
        None => {
            return Err(LoadError::structure(
                path,
                format!("the entry \"{name}\" in \"{section}\" must define a \"type\""),
            ));
        }
    }

    if section == DICTIONARIES_KEY {
        for attribute in [NAME_ATTRIBUTE, DICTIONARY_ATTRIBUTE] {
            if attributes
                .get(attribute)
                .is_some_and(|value| !value.is_string())
            {
                return Err(LoadError::structure(
                    path,
                    format!("the \"{attribute}\" of dictionary \"{name}\" must be a string"),
                ));
            }
        }
    }

    Ok(DefinitionEntry { name, attributes })
}

fn describe_key(key: &Value) -> String {
    match key {
        Value::String(name) => format!("\"{name}\""),
        other => serde_yaml::to_string(other)
            .map(|rendered| format!("\"{}\"", rendered.trim()))
            .unwrap_or_else(|_| "(unprintable key)".to_string()),
    }
}

use std::path::Path;

use i18n_jobs_definition_api::{
    Attributes, BuildError, DICTIONARY_ATTRIBUTE, DefinitionKind, NAME_ATTRIBUTE,
};
use serde_yaml::Value;

use super::LoadSession;
use super::document::{DefinitionEntry, RawDocument};
use crate::error::{LoadError, Result};

impl LoadSession<'_> {
    /// Build every dictionary and job of `document`, in declaration order.
    pub(super) fn collect_definitions(&mut self, document: RawDocument) -> Result<()> {
        let (path, dictionaries, jobs) = document.into_definitions();
        self.collect(&path, dictionaries, jobs)
            .map_err(|cause| LoadError::InvalidConfiguration {
                path,
                cause: Box::new(cause),
            })
    }

    fn collect(
        &mut self,
        path: &Path,
        dictionaries: Vec<DefinitionEntry>,
        jobs: Vec<DefinitionEntry>,
    ) -> Result<()> {
        let builder = &self.loader.builder;

        for DefinitionEntry { name, attributes } in dictionaries {
            let attributes = dictionary_attributes(&name, attributes);
            let definition = builder
                .build_dictionary(&self.configuration, attributes)
                .map_err(|err| definition_error(DefinitionKind::Dictionary, name, path, err))?;
            self.configuration.set_dictionary(definition);
        }

        for DefinitionEntry { name, mut attributes } in jobs {
            attributes.insert(NAME_ATTRIBUTE.into(), Value::String(name.clone()));
            let definition = builder
                .build_job(&self.configuration, attributes)
                .map_err(|err| definition_error(DefinitionKind::Job, name, path, err))?;
            self.configuration.set_job(definition);
        }

        Ok(())
    }
}

/// Keep an explicit `name` as the `dictionary` reference and name the entry by its key.
fn dictionary_attributes(key: &str, mut attributes: Attributes) -> Attributes {
    if let Some(alias) = attributes.get(NAME_ATTRIBUTE).cloned() {
        attributes.insert(DICTIONARY_ATTRIBUTE.into(), alias);
    }
    attributes.insert(NAME_ATTRIBUTE.into(), Value::String(key.to_string()));
    attributes
}

fn definition_error(kind: DefinitionKind, name: String, path: &Path, err: BuildError) -> LoadError {
    match err {
        BuildError::UnknownType { type_name, .. } => LoadError::UnknownDefinitionType {
            kind,
            type_name,
            path: path.to_path_buf(),
        },
        cause => LoadError::DefinitionFailed {
            kind,
            name,
            path: path.to_path_buf(),
            cause,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Attributes {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn explicit_names_become_dictionary_references() {
        let attributes = dictionary_attributes("local", mapping("{type: xliff, name: upstream}"));

        assert_eq!(attributes.get("name"), Some(&Value::from("local")));
        assert_eq!(attributes.get("dictionary"), Some(&Value::from("upstream")));
    }

    #[test]
    fn entries_without_a_name_only_receive_their_key() {
        let attributes = dictionary_attributes("local", mapping("{type: memory}"));

        assert_eq!(attributes.get("name"), Some(&Value::from("local")));
        assert!(attributes.get("dictionary").is_none());
    }

    #[test]
    fn explicit_dictionary_is_overridden_by_name() {
        let attributes =
            dictionary_attributes("local", mapping("{type: memory, dictionary: a, name: b}"));

        assert_eq!(attributes.get("dictionary"), Some(&Value::from("b")));
    }

    #[test]
    fn unknown_types_keep_the_file_and_type() {
        let err = definition_error(
            DefinitionKind::Job,
            "export".into(),
            Path::new("/cfg/jobs.yml"),
            BuildError::unknown_type(DefinitionKind::Job, "rsync"),
        );
        assert!(matches!(
            err,
            LoadError::UnknownDefinitionType { ref type_name, ref path, .. }
                if type_name == "rsync" && path == Path::new("/cfg/jobs.yml")
        ));

        let err = definition_error(
            DefinitionKind::Job,
            "export".into(),
            Path::new("/cfg/jobs.yml"),
            BuildError::MissingAttribute { attribute: "source" },
        );
        assert_eq!(
            err.to_string(),
            "cannot build job \"export\": missing required attribute \"source\""
        );
    }
}

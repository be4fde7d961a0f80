use anyhow::{Context, Result, bail};
use i18n_jobs::{Configuration, ConfigurationLoader, Definition, FileLocator, builtin};
use tracing::debug;

use crate::cli::Command;
use crate::settings::Settings;

/// Result of a command, rendered by the output module.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Report {
    /// Jobs that would run, in execution order.
    Plan(Vec<Definition>),
    Dictionaries(Vec<Definition>),
    Kinds {
        dictionaries: Vec<&'static str>,
        jobs: Vec<&'static str>,
    },
    Check {
        resource: String,
        dictionaries: usize,
        jobs: usize,
    },
}

/// Dictionary filters accepted by the `dictionaries` command.
#[derive(Debug, Clone, Default)]
pub(crate) struct DictionaryFilter<'a> {
    pub(crate) kind: Option<&'a str>,
    pub(crate) source_language: Option<&'a str>,
    pub(crate) target_language: Option<&'a str>,
}

impl DictionaryFilter<'_> {
    fn matches(&self, dictionary: &Definition) -> bool {
        self.kind.is_none_or(|kind| dictionary.kind() == kind)
            && attribute_matches(dictionary, "source_language", self.source_language)
            && attribute_matches(dictionary, "target_language", self.target_language)
    }
}

fn attribute_matches(definition: &Definition, attribute: &str, wanted: Option<&str>) -> bool {
    wanted.is_none_or(|wanted| definition.str_attribute(attribute) == Some(wanted))
}

/// Runs commands against the configured job configuration.
pub(crate) struct JobWorkflow {
    loader: ConfigurationLoader,
    job_config: String,
}

impl JobWorkflow {
    pub(crate) fn from_settings(settings: &Settings) -> Self {
        let locator = FileLocator::new(settings.search_paths.iter().cloned());
        Self {
            loader: ConfigurationLoader::new(locator, builtin::definition_builder()),
            job_config: settings.job_config.clone(),
        }
    }

    pub(crate) fn run(&self, command: &Command) -> Result<Report> {
        match command {
            Command::Process { jobs, dry_run } => self.process(jobs, *dry_run),
            Command::Dictionaries {
                kind,
                source_language,
                target_language,
            } => self.dictionaries(&DictionaryFilter {
                kind: kind.as_deref(),
                source_language: source_language.as_deref(),
                target_language: target_language.as_deref(),
            }),
            Command::Kinds => Ok(self.kinds()),
            Command::Check => self.check(),
        }
    }

    fn load(&self) -> Result<Configuration> {
        debug!(resource = %self.job_config, "loading job configuration");
        self.loader
            .load(&self.job_config)
            .with_context(|| format!("failed to load job configuration \"{}\"", self.job_config))
    }

    fn process(&self, names: &[String], dry_run: bool) -> Result<Report> {
        let configuration = self.load()?;
        let jobs = select_jobs(&configuration, names)?;

        if !dry_run && !jobs.is_empty() {
            let mut kinds: Vec<&str> = jobs.iter().map(Definition::kind).collect();
            kinds.sort_unstable();
            kinds.dedup();
            bail!(
                "no job runner is available for job types: {} (use --dry-run to preview)",
                kinds.join(", ")
            );
        }

        Ok(Report::Plan(jobs))
    }

    fn dictionaries(&self, filter: &DictionaryFilter<'_>) -> Result<Report> {
        let configuration = self.load()?;
        let dictionaries = configuration
            .dictionaries()
            .filter(|dictionary| filter.matches(dictionary))
            .cloned()
            .collect();
        Ok(Report::Dictionaries(dictionaries))
    }

    fn kinds(&self) -> Report {
        let builder = self.loader.builder();
        Report::Kinds {
            dictionaries: builder.dictionaries().kinds().collect(),
            jobs: builder.jobs().kinds().collect(),
        }
    }

    fn check(&self) -> Result<Report> {
        let configuration = self.load()?;
        Ok(Report::Check {
            resource: self.job_config.clone(),
            dictionaries: configuration.dictionary_names().len(),
            jobs: configuration.job_names().len(),
        })
    }
}

/// Pick the named jobs, or every job in declaration order when none are named.
fn select_jobs(configuration: &Configuration, names: &[String]) -> Result<Vec<Definition>> {
    if names.is_empty() {
        return Ok(configuration.jobs().cloned().collect());
    }

    names
        .iter()
        .map(|name| match configuration.job(name) {
            Some(job) => Ok(job.clone()),
            None => bail!(
                "unknown job \"{name}\" (available: {})",
                configuration.job_names().join(", ")
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::tempdir;

    use super::*;

    const JOBS: &str = r#"
dictionaries:
  app: { type: xliff, path: translations/app.xlf, source_language: en, target_language: de }
  cache: { type: memory, source_language: en, target_language: fr }
jobs:
  export: { type: copy, source: app, target: cache }
  all: { type: batch, jobs: [export] }
"#;

    fn workflow(dir: &Path) -> JobWorkflow {
        fs::write(dir.join("jobs.yml"), JOBS).unwrap();
        JobWorkflow::from_settings(&Settings {
            job_config: "jobs.yml".into(),
            search_paths: vec![dir.to_path_buf()],
            log_level: "warn".into(),
        })
    }

    fn names(definitions: &[Definition]) -> Vec<&str> {
        definitions.iter().map(Definition::name).collect()
    }

    #[test]
    fn dry_run_selects_all_jobs_in_order() {
        let dir = tempdir().unwrap();
        let report = workflow(dir.path())
            .run(&Command::Process {
                jobs: Vec::new(),
                dry_run: true,
            })
            .unwrap();

        let Report::Plan(jobs) = report else {
            panic!("expected a plan");
        };
        assert_eq!(names(&jobs), vec!["export", "all"]);
    }

    #[test]
    fn named_jobs_keep_the_requested_order() {
        let dir = tempdir().unwrap();
        let flow = workflow(dir.path());
        let names_in = vec!["all".to_string(), "export".to_string()];

        let Report::Plan(jobs) = flow
            .run(&Command::Process {
                jobs: names_in,
                dry_run: true,
            })
            .unwrap()
        else {
            panic!("expected a plan");
        };
        assert_eq!(names(&jobs), vec!["all", "export"]);

        let err = flow
            .run(&Command::Process {
                jobs: vec!["missing".into()],
                dry_run: true,
            })
            .unwrap_err();
        assert!(err.to_string().contains("unknown job \"missing\""));
    }

    #[test]
    fn processing_without_dry_run_fails() {
        let dir = tempdir().unwrap();
        let err = workflow(dir.path())
            .run(&Command::Process {
                jobs: vec!["export".into()],
                dry_run: false,
            })
            .unwrap_err();

        assert!(err.to_string().contains("no job runner"), "{err}");
    }

    #[test]
    fn dictionaries_can_be_filtered() {
        let dir = tempdir().unwrap();
        let flow = workflow(dir.path());

        let Report::Dictionaries(all) = flow
            .run(&Command::Dictionaries {
                kind: None,
                source_language: Some("en".into()),
                target_language: None,
            })
            .unwrap()
        else {
            panic!("expected dictionaries");
        };
        assert_eq!(names(&all), vec!["app", "cache"]);

        let Report::Dictionaries(german) = flow
            .run(&Command::Dictionaries {
                kind: Some("xliff".into()),
                source_language: None,
                target_language: Some("de".into()),
            })
            .unwrap()
        else {
            panic!("expected dictionaries");
        };
        assert_eq!(names(&german), vec!["app"]);
    }

    #[test]
    fn kinds_and_check_report_counts() {
        let dir = tempdir().unwrap();
        let flow = workflow(dir.path());

        assert_eq!(
            flow.run(&Command::Kinds).unwrap(),
            Report::Kinds {
                dictionaries: vec!["memory", "xliff", "compound"],
                jobs: vec!["copy", "batch"],
            }
        );
        assert_eq!(
            flow.run(&Command::Check).unwrap(),
            Report::Check {
                resource: "jobs.yml".into(),
                dictionaries: 2,
                jobs: 2,
            }
        );
    }

    #[test]
    fn load_errors_name_the_job_configuration() {
        let dir = tempdir().unwrap();
        let flow = JobWorkflow::from_settings(&Settings {
            job_config: "absent.yml".into(),
            search_paths: vec![dir.path().to_path_buf()],
            log_level: "warn".into(),
        });

        let err = flow.run(&Command::Check).unwrap_err();

        assert!(format!("{err:#}").contains("could not be found"));
    }
}

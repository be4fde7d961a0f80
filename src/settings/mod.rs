//! Settings of the command line tool.
//!
//! Values are layered with the `config` crate (see [`sources`]) and the
//! command line flags are applied last. [`load`] returns [`Settings`] with
//! every default filled in.

mod sources;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use config::Config;
use i18n_jobs::logging;
use serde::Deserialize;

use crate::cli::CliArgs;

/// Job configuration loaded when none is named.
pub(crate) const DEFAULT_JOB_CONFIG: &str = ".translation-jobs.yml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    job_config: Option<String>,
    search_paths: Option<Vec<PathBuf>>,
    log_level: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) job_config: String,
    /// Base directories for resource lookup, working directory first.
    pub(crate) search_paths: Vec<PathBuf>,
    pub(crate) log_level: String,
}

/// Load settings by combining settings files, the environment and CLI flags.
pub(crate) fn load(cli: &CliArgs) -> Result<Settings> {
    let config = sources::build_config(cli)?;
    let current_dir = env::current_dir().context("failed to determine working directory")?;
    resolve(config, cli, current_dir)
}

fn resolve(config: Config, cli: &CliArgs, current_dir: PathBuf) -> Result<Settings> {
    let mut raw: RawSettings = config
        .try_deserialize()
        .map_err(|err| anyhow!("failed to deserialize settings: {err}"))?;
    raw.apply_cli_overrides(cli);
    Ok(raw.resolve(current_dir))
}

impl RawSettings {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(path) = cli.job_config.clone() {
            self.job_config = Some(path);
        }
        if let Some(level) = cli.log_level.clone() {
            self.log_level = Some(level);
        }
    }

    fn resolve(self, current_dir: PathBuf) -> Settings {
        let mut search_paths = vec![current_dir.clone()];
        for path in self.search_paths.unwrap_or_default() {
            let path = if path.is_relative() {
                current_dir.join(path)
            } else {
                path
            };
            if !search_paths.contains(&path) {
                search_paths.push(path);
            }
        }

        Settings {
            job_config: self
                .job_config
                .filter(|path| !path.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_JOB_CONFIG.to_string()),
            search_paths,
            log_level: self
                .log_level
                .filter(|level| !level.trim().is_empty())
                .unwrap_or_else(|| logging::DEFAULT_LEVEL.to_string()),
        }
    }
}

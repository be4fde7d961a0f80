use std::fmt::Write;
use std::path::PathBuf;

use clap::{
    ArgAction, ColorChoice, Parser, Subcommand, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use i18n_jobs::app_dirs;

/// Produce the full version banner including the config directory.
fn long_version() -> &'static str {
    let config_dir = match app_dirs::get_config_dir() {
        Ok(path) => path.display().to_string(),
        Err(err) => format!("unavailable ({err})"),
    };

    let mut details = format!("i18n-jobs {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(details);
    let _ = writeln!(details, "config directory: {config_dir}");

    Box::leak(details.into_boxed_str())
}

fn cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Cyan.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
}

/// Parse command line arguments into [`CliArgs`].
pub(crate) fn parse_cli() -> CliArgs {
    CliArgs::parse()
}

#[derive(Parser, Debug)]
#[command(
    name = "i18n-jobs",
    version,
    long_version = long_version(),
    about = "Load translation job configurations and inspect their dictionaries and jobs",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
/// Command-line arguments accepted by the `i18n-jobs` binary.
pub(crate) struct CliArgs {
    #[arg(
        long = "config",
        value_name = "FILE",
        env = "I18N_JOBS_CONFIG",
        action = ArgAction::Append,
        global = true,
        help = "Additional settings file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        global = true,
        help = "Skip loading default settings files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        short = 'c',
        long = "job-config",
        value_name = "PATH",
        global = true,
        help = "Job configuration to load (default: .translation-jobs.yml)"
    )]
    pub(crate) job_config: Option<String>,
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        global = true,
        help = "Log filter used when RUST_LOG is unset (default: warn)"
    )]
    pub(crate) log_level: Option<String>,
    #[arg(
        short = 'o',
        long = "format",
        value_enum,
        global = true,
        default_value_t = OutputFormat::Plain,
        help = "Choose how to print the result"
    )]
    pub(crate) format: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Run translation jobs.
    Process {
        /// Jobs to run, in order (default: every job)
        #[arg(value_name = "JOB")]
        jobs: Vec<String>,
        #[arg(long = "dry-run", help = "Only report which jobs would run")]
        dry_run: bool,
    },
    /// List the configured dictionaries.
    Dictionaries {
        #[arg(long = "type", value_name = "TYPE", help = "Only show dictionaries of this type")]
        kind: Option<String>,
        #[arg(
            short = 's',
            long = "source-language",
            value_name = "LANG",
            help = "Only show dictionaries with this source language"
        )]
        source_language: Option<String>,
        #[arg(
            short = 't',
            long = "target-language",
            value_name = "LANG",
            help = "Only show dictionaries with this target language"
        )]
        target_language: Option<String>,
    },
    /// List the dictionary and job types this build can load.
    Kinds,
    /// Load the job configuration and report what it defines.
    Check,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
/// Output formats supported by the CLI utility.
pub(crate) enum OutputFormat {
    Plain,
    Json,
}

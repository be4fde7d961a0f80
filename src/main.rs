mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use i18n_jobs::logging;
use workflow::{JobWorkflow, Report};

fn main() -> Result<()> {
    let cli = parse_cli();
    let settings = settings::load(&cli)?;
    logging::initialize(&settings.log_level)?;

    let workflow = JobWorkflow::from_settings(&settings);
    let report = workflow.run(&cli.command)?;
    print_report(cli.format, &report)
}

fn print_report(format: OutputFormat, report: &Report) -> Result<()> {
    match format {
        OutputFormat::Plain => print_plain(report),
        OutputFormat::Json => print_json(report)?,
    }
    Ok(())
}

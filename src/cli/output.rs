use anyhow::Result;
use i18n_jobs::{Definition, DefinitionKind};
use serde_json::{Map, Value, json};

use crate::workflow::Report;

/// Print a plain-text representation of a report.
pub(crate) fn print_plain(report: &Report) {
    print!("{}", format_plain(report));
}

pub(crate) fn format_plain(report: &Report) -> String {
    let mut out = String::new();
    match report {
        Report::Plan(jobs) => {
            if jobs.is_empty() {
                out.push_str("No jobs to process\n");
            }
            for job in jobs {
                out.push_str(&format!("would run job {} ({})\n", job.name(), job.kind()));
            }
        }
        Report::Dictionaries(dictionaries) => {
            if dictionaries.is_empty() {
                out.push_str("No dictionaries found\n");
            }
            for dictionary in dictionaries {
                out.push_str(&format!("{} ({})", dictionary.name(), dictionary.kind()));
                if let Some(reference) = dictionary.str_attribute("dictionary") {
                    out.push_str(&format!(" -> {reference}"));
                }
                out.push('\n');
            }
        }
        Report::Kinds { dictionaries, jobs } => {
            out.push_str(&format!("dictionary types: {}\n", dictionaries.join(", ")));
            out.push_str(&format!("job types: {}\n", jobs.join(", ")));
        }
        Report::Check {
            resource,
            dictionaries,
            jobs,
        } => {
            out.push_str(&format!(
                "{resource}: {dictionaries} dictionaries, {jobs} jobs\n"
            ));
        }
    }
    out
}

/// Format a report as a JSON string.
pub(crate) fn format_report_json(report: &Report) -> Result<String> {
    let payload = match report {
        Report::Plan(jobs) => Value::Array(
            jobs.iter()
                .map(|job| definition_json(job, DefinitionKind::Job))
                .collect(),
        ),
        Report::Dictionaries(dictionaries) => Value::Array(
            dictionaries
                .iter()
                .map(|dictionary| definition_json(dictionary, DefinitionKind::Dictionary))
                .collect(),
        ),
        Report::Kinds { dictionaries, jobs } => json!({
            "dictionaries": dictionaries,
            "jobs": jobs,
        }),
        Report::Check {
            resource,
            dictionaries,
            jobs,
        } => json!({
            "resource": resource,
            "dictionaries": dictionaries,
            "jobs": jobs,
        }),
    };

    Ok(serde_json::to_string_pretty(&payload)?)
}

fn definition_json(definition: &Definition, kind: DefinitionKind) -> Value {
    let attributes = serde_json::to_value(definition.attributes())
        .unwrap_or_else(|_| Value::Object(Map::new()));
    json!({
        "kind": kind.as_str(),
        "name": definition.name(),
        "type": definition.kind(),
        "attributes": attributes,
    })
}

/// Print the JSON representation of a report.
pub(crate) fn print_json(report: &Report) -> Result<()> {
    println!("{}", format_report_json(report)?);
    Ok(())
}

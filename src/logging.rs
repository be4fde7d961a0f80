//! Diagnostic output for the command line tool.
//!
//! Events go to stderr so that command output on stdout stays machine
//! readable. `RUST_LOG` takes precedence over the configured level.

use anyhow::{Result, anyhow};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Level used when neither `RUST_LOG` nor the settings name one.
pub const DEFAULT_LEVEL: &str = "warn";

/// Build the filter for `level`, preferring `RUST_LOG` when it is set.
pub fn filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|err| anyhow!("invalid log level \"{level}\": {err}")),
    }
}

/// Install the global subscriber writing to stderr.
pub fn initialize(level: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(filter(level)?)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .map_err(|err| anyhow!("failed to install the log subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_levels_and_directives() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(filter("debug").is_ok());
        assert!(filter("i18n_jobs=trace,warn").is_ok());
    }
}

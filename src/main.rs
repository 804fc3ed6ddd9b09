//! `version_manifest` binary entrypoint: refresh the cached manifest once and exit.

use std::process::ExitCode;

use version_manifest::cache::{self, Update};
use version_manifest::config::{CacheConfig, LogConfig};
use version_manifest::fetch::{HttpSource, ManifestSource};
use version_manifest::logging::Logger;
use version_manifest::{Error, Result};

/// Exit status for a written cache or a server rejection.
const EXIT_OK: u8 = 0;
/// Exit status when a network, decode or filesystem error aborted the run.
const EXIT_FAULT: u8 = 1;

fn main() -> ExitCode {
    let logger = match LogConfig::beside_current_exe().and_then(|config| Logger::new(&config)) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("version_manifest: cannot open log file: {err}");
            return ExitCode::from(EXIT_FAULT);
        }
    };
    let status = logger.in_scope(|| match default_inputs() {
        Ok((source, config)) => run(&source, &config),
        Err(err) => report_fault(&err),
    });
    ExitCode::from(status)
}

/// Default configuration and a default HTTP client for its URL.
fn default_inputs() -> Result<(HttpSource, CacheConfig)> {
    let config = CacheConfig::in_home()?;
    let source = HttpSource::new(config.url.as_str())?;
    Ok((source, config))
}

/// What: Run one update and map its result to an exit status.
///
/// Inputs:
/// - `source`: Where the manifest comes from
/// - `config`: Cache location
///
/// Output:
/// - `EXIT_OK` when the cache was written or the server rejected the request
/// - `EXIT_FAULT` when a network, decode or filesystem error aborted the run
fn run(source: &impl ManifestSource, config: &CacheConfig) -> u8 {
    match cache::update(source, config) {
        Ok(Update::Written(_) | Update::Rejected { .. }) => EXIT_OK,
        Err(err) => report_fault(&err),
    }
}

/// Log a fault at ERROR and return the fault exit status.
fn report_fault(err: &Error) -> u8 {
    tracing::error!(error = %err, "Version manifest update failed");
    EXIT_FAULT
}

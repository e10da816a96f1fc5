//! Tracing subscriber setup. Verbosity comes from `LYNKS_LOG` using
//! `EnvFilter` directives and defaults to `warn`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Environment variable holding filter directives.
const FILTER_ENV: &str = "LYNKS_LOG";

/// Directive used when `LYNKS_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Where log events go.
#[derive(Debug, Clone, Copy)]
pub enum Sink<'a> {
    /// Append to a file, without colour.
    File(&'a Path),
    /// No subscriber; events are dropped.
    Off,
    /// Standard error, coloured when it is a terminal.
    Stderr,
}

/// Install the global subscriber for `sink`.
///
/// # Errors
///
/// Returns `Error::Write` if the log file cannot be opened.
pub fn init(sink: Sink<'_>) -> Result<(), Error> {
    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| return EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match sink {
        Sink::Off => return Ok(()),
        Sink::Stderr => builder.with_writer(std::io::stderr).try_init(),
        Sink::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| {
                    return Error::Write {
                        operation: "open log",
                        path: path.to_path_buf(),
                        source,
                    };
                })?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        },
    };

    // A subscriber already being installed only happens when lynks is
    // driven in-process; the existing one keeps working.
    if let Err(err) = installed {
        tracing::debug!(error = %err, "subscriber already installed");
    }
    return Ok(());
}

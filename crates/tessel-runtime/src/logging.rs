#![forbid(unsafe_code)]

//! Subscriber setup for applications.
//!
//! Stdout belongs to the UI, so log output goes to the file named by
//! `TESSEL_LOG_FILE` or, when unset, to stderr.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `TESSEL_LOG=tessel_runtime=debug`.
pub const ENV_LOG: &str = "TESSEL_LOG";
/// Log destination path, opened for append.
pub const ENV_LOG_FILE: &str = "TESSEL_LOG_FILE";

/// Install a global `fmt` subscriber when `TESSEL_LOG` is set.
///
/// Returns `Ok(false)` without installing anything when `TESSEL_LOG` is
/// unset.
///
/// # Errors
///
/// Returns an error if the filter does not parse, the log file cannot be
/// opened, or a global subscriber is already installed.
pub fn init_from_env() -> io::Result<bool> {
    let Some(directives) = std::env::var_os(ENV_LOG) else {
        return Ok(false);
    };
    let filter = EnvFilter::try_new(directives.to_string_lossy())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true);

    let installed = match std::env::var_os(ENV_LOG_FILE) {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };
    installed.map_err(io::Error::other)?;
    Ok(true)
}

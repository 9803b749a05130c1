use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Env var holding the log filter, e.g. `CLIPDRILL_LOG=debug`
pub const LOG_ENV: &str = "CLIPDRILL_LOG";

/// Route `log` output to `path`. The terminal belongs to the TUI, so nothing
/// goes to stderr. Does nothing unless `CLIPDRILL_LOG` is set.
pub fn init(path: &Path) -> Result<bool> {
    if std::env::var_os(LOG_ENV).is_none() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    Builder::from_env(Env::default().filter(LOG_ENV))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("installing logger")?;

    Ok(true)
}

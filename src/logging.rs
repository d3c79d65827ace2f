use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming the log file. Unset means no logging: the
/// terminal belongs to the UI.
pub const LOG_ENV: &str = "HUNKWATCH_LOG";

pub fn init() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_ENV).map(PathBuf::from) else {
        return Ok(());
    };

    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(())
}

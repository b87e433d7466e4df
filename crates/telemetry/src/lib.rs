//! Logging bootstrap for the collector.

use anyhow::anyhow;
use collector_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Build the env filter, letting `RUST_LOG` override the configured level.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&settings.level)
        .map_err(|err| anyhow!("invalid log level '{}': {}", settings.level, err))
}

/// Initialize the global tracing subscriber. Safe to call more than once.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if installed.is_ok() {
        tracing::info!(
            target: "collector-telemetry",
            format = ?settings.log_format,
            level = %settings.level,
            "logging initialized"
        );
    }

    Ok(())
}

use anyhow::{Result, anyhow};
use conductor_core::settings::{LogFormat, LoggingSettings};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Logs go to stderr so stdout stays valid JSON.
///
/// Filter precedence: `--log-level`, then `RUST_LOG`, then `logging.level`.
pub fn init_telemetry(logging: &LoggingSettings, cli_level: Option<&str>) -> Result<()> {
    let filter = build_filter(logging, cli_level)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    tracing::debug!(format = ?logging.format, "telemetry initialized");
    Ok(())
}

fn build_filter(logging: &LoggingSettings, cli_level: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return EnvFilter::try_new(level).map_err(|e| anyhow!("invalid --log-level '{level}': {e}"));
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| anyhow!("invalid log level '{}': {e}", logging.level))
}

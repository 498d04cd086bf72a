use crate::error::ConfigError;
use crate::settings::LoggingSettings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global tracing subscriber.
///
/// Log lines go to stderr through a non-blocking writer so they never interleave with the
/// results printed on stdout. `RUST_LOG`, when set, takes precedence over the configured level.
///
/// The returned guard flushes buffered lines when dropped; keep it alive for the whole run.
pub fn init_tracing(settings: &LoggingSettings) -> Result<WorkerGuard, ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level).map_err(|e| {
            ConfigError::ValidationError(format!(
                "[logging] invalid level '{}': {e}",
                settings.level
            ))
        })?,
    };

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

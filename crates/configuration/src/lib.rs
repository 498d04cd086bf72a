use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{ChartSettings, Config, FormDefaults, LoggingSettings, ServerSettings};

/// The file looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_NAME: &str = "ztest";

/// Loads the application configuration.
///
/// Sources are layered, later ones overriding earlier ones:
/// 1. built-in defaults,
/// 2. the TOML file at `path`, or an optional `ztest.toml` in the working directory,
/// 3. environment variables such as `ZTEST__SERVER__PORT=8080`.
///
/// The merged result is deserialized into our strongly-typed `Config` and validated.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder()
        .set_default("defaults.observed_proportion", 0.5)?
        .set_default("defaults.expected_proportion", 0.4)?
        .set_default("defaults.sample_size", 100_i64)?
        .set_default("defaults.significance_level", 0.05)?
        .set_default("defaults.tail_mode", "two-tailed")?
        .set_default("chart.width", 1200_i64)?
        .set_default("chart.height", 500_i64)?
        .set_default("chart.samples", 1000_i64)?
        .set_default("chart.x_min", -4.0)?
        .set_default("chart.x_max", 4.0)?
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000_i64)?
        .set_default("logging.level", "info")?;

    builder = match path {
        Some(path) => builder.add_source(config::File::from(path).required(true)),
        None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_NAME).required(false)),
    };

    let settings = builder
        .add_source(
            config::Environment::with_prefix("ZTEST")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = settings.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

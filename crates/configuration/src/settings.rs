use crate::error::ConfigError;
use analytics::ProportionZTest;
use core_types::{TailMode, ZTestInput};
use serde::Deserialize;
use std::net::SocketAddr;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub defaults: FormDefaults,
    pub chart: ChartSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// The values the form (and the CLI) start from when the user leaves a field out.
#[derive(Debug, Clone, Deserialize)]
pub struct FormDefaults {
    pub observed_proportion: f64,
    pub expected_proportion: f64,
    pub sample_size: u64,
    pub significance_level: f64,
    pub tail_mode: TailMode,
}

/// Canvas and sampling parameters for the rendered chart.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
    /// Number of points used to trace the density curve.
    pub samples: usize,
    pub x_min: f64,
    pub x_max: f64,
}

/// Where the HTTP form server listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `web_server=debug`. `RUST_LOG` wins.
    pub level: String,
}

impl FormDefaults {
    pub fn to_input(&self) -> ZTestInput {
        ZTestInput::new(
            self.observed_proportion,
            self.expected_proportion,
            self.sample_size,
            self.significance_level,
            self.tail_mode,
        )
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| {
                ConfigError::ValidationError(format!(
                    "invalid server address {}:{}: {e}",
                    self.host, self.port
                ))
            })
    }
}

impl Config {
    /// Checks the cross-field rules `serde` cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ProportionZTest::new()
            .validate(&self.defaults.to_input())
            .map_err(|e| ConfigError::ValidationError(format!("[defaults] {e}")))?;

        let chart = &self.chart;
        chart::check_canvas(chart.width, chart.height, chart.samples, chart.x_min, chart.x_max)
            .map_err(|e| ConfigError::ValidationError(format!("[chart] {e}")))?;

        self.server.socket_addr()?;
        Ok(())
    }
}

//! Configuration for the postprocessing service

use anyhow::{Context, Result};
use config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::models::RoundingMode;

pub const DEFAULT_CONFIG_PATH: &str = "config/postprocess.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub postprocess: PostprocessConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest request body accepted by `/postprocess`
    pub max_payload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_payload_bytes: 256 * 1024,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostprocessConfig {
    pub rounding: RoundingMode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Build the log filter; a `RUST_LOG` value replaces the configured level entirely.
    pub fn env_filter(&self, rust_log: Option<&str>) -> Result<EnvFilter> {
        match rust_log.filter(|directives| !directives.trim().is_empty()) {
            Some(directives) => EnvFilter::try_new(directives).context("Invalid RUST_LOG"),
            None => EnvFilter::try_new(format!("occupancy_postprocess={}", self.level))
                .context("Invalid logging.level"),
        }
    }
}

impl AppConfig {
    /// Load from the default path; a missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(
                File::from(path.as_ref())
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

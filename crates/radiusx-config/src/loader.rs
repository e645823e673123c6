//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use radiusx_core::{RadiusxError, RadiusxResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable prefix; nested keys use `__`, e.g.
/// `RADIUSX__DATABASE__URL`.
pub const ENV_PREFIX: &str = "RADIUSX";

/// Loads [`AppConfig`] from files and the environment.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    environment: String,
}

impl ConfigLoader {
    /// Creates a loader reading from `config_dir`.
    ///
    /// Sources, later ones winning:
    /// 1. `{config_dir}/default.toml`
    /// 2. `{config_dir}/{environment}.toml`
    /// 3. `{config_dir}/local.toml`
    /// 4. `RADIUSX__*` environment variables
    ///
    /// Outside production a `.env` file is loaded into the process
    /// environment first.
    #[must_use]
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        let environment =
            std::env::var("RADIUSX_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        if !matches!(environment.as_str(), "production" | "prod") {
            if let Err(e) = dotenvy::dotenv() {
                debug!("No .env file found or error loading it: {}", e);
            }
        }

        Self {
            config_dir: config_dir.into(),
            environment,
        }
    }

    /// Loader for `./config`.
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Builds and validates the configuration.
    pub fn load(&self) -> RadiusxResult<AppConfig> {
        info!(environment = %self.environment, "Loading configuration");

        let mut builder = Config::builder()
            .set_default("app.environment", self.environment.as_str())
            .map_err(config_error_to_radiusx_error)?;

        for name in ["default", self.environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{name}.toml"));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let app_config: AppConfig = builder
            .build()
            .and_then(|config| config.try_deserialize::<AppConfig>())
            .map_err(config_error_to_radiusx_error)?;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            RadiusxError::Configuration(message)
        })?;

        Ok(app_config)
    }

    /// The directory files are read from.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

fn config_error_to_radiusx_error(err: ConfigError) -> RadiusxError {
    RadiusxError::Configuration(err.to_string())
}

//! Process-wide configuration.
//!
//! Sources in order of precedence (later sources override earlier):
//! 1. Bundled defaults (`tabula.toml` shipped with the crate)
//! 2. User config in home directory (`~/.config/tabula/tabula.toml`)
//! 3. User config in current directory (`./tabula.toml`)
//! 4. A file passed explicitly (`--config`)
//! 5. Environment variables `TABULA__SECTION__KEY`, e.g. `TABULA__DATABASE__MODE=mysql`

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::Path;
use tabula_database::{AnyConnector, DatabaseConfig};
use tabula_error::ConfigError;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../tabula.toml");

/// Completion service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,
    /// Bearer token; falls back to `OPENAI_API_KEY` when unset
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Model used when a request names none
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Completion length cap
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// HTTP request deadline
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model() -> String {
    "gpt-35-turbo".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

/// Retry and deadline settings for the generation loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Attempts of generate/extract/execute per task; zero is rejected
    #[serde(default = "default_max_attempts")]
    pub max_attempts: NonZeroU32,
    /// Deadline for one completion call
    #[serde(default = "default_generation_timeout_secs")]
    pub generation_timeout_secs: u64,
}

fn default_max_attempts() -> NonZeroU32 {
    NonZeroU32::MIN.saturating_add(2)
}

fn default_generation_timeout_secs() -> u64 {
    90
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            generation_timeout_secs: default_generation_timeout_secs(),
        }
    }
}

/// HTTP endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Top-level Tabula configuration.
///
/// # Example
///
/// ```no_run
/// use tabula::TabulaConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TabulaConfig::load(None)?;
/// println!("database mode: {}", config.database.mode);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabulaConfig {
    /// Database selection
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Completion service
    pub model: ModelConfig,
    /// Retry loop
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// HTTP endpoint
    #[serde(default)]
    pub server: ServerSettings,
}

impl TabulaConfig {
    /// Load and validate configuration from every source.
    ///
    /// User config files are optional and silently skipped if not found;
    /// `explicit`, when given, must exist.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        debug!("Loading configuration with precedence: env > explicit > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/tabula/tabula.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("tabula").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("TABULA")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Bundled defaults overlaid with `overrides` (TOML), ignoring files and
    /// the environment.
    pub fn from_toml(overrides: &str) -> Result<Self, ConfigError> {
        Self::finish(Self::defaults().add_source(File::from_str(overrides, FileFormat::Toml)))
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that deserialization alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.default_model.trim().is_empty() {
            return Err(ConfigError::for_setting("model.default_model", "must not be empty"));
        }
        if self.model.base_url.trim().is_empty() {
            return Err(ConfigError::for_setting("model.base_url", "must not be empty"));
        }
        if self.pipeline.generation_timeout_secs == 0 {
            return Err(ConfigError::for_setting(
                "pipeline.generation_timeout_secs",
                "must be at least 1",
            ));
        }
        self.bind_addr()?;
        AnyConnector::from_config(&self.database)?;
        Ok(())
    }

    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind.parse().map_err(|e| {
            ConfigError::for_setting(
                "server.bind",
                format!("invalid address '{}': {}", self.server.bind, e),
            )
        })
    }
}

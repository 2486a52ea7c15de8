//! Handler configuration.
//!
//! Values come from environment variables set on the function, layered over
//! an optional `image-resize.toml` shipped next to the binary. Environment
//! variables win.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Bucket receiving resized images (required, env: DESTINATION_BUCKET)
//! destination_bucket = "my-resized-images"
//!
//! # Presigned URL lifetime in seconds (env: PRESIGNED_URL_TTL_SECS)
//! url_expiry_secs = 3600
//!
//! [log]
//! level = "info"    # env: LOG_LEVEL, any tracing EnvFilter directive
//! format = "json"   # env: LOG_FORMAT, "json" or "text"
//! ```
//!
//! Run `image-resize-lambda gen-config` for a documented template, and
//! `image-resize-lambda serve --config <path>` to read a file other than
//! [`CONFIG_FILE`].

use confique::Config;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default config file, looked up relative to the working directory.
pub const CONFIG_FILE: &str = "image-resize.toml";

/// Longest lifetime SigV4 allows for a presigned URL (7 days).
pub const MAX_URL_EXPIRY_SECS: u64 = 7 * 24 * 3600;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[from] confique::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings the handler reads at cold start.
#[derive(Debug, Clone, Config)]
pub struct HandlerConfig {
    /// Bucket receiving resized images. Provisioned outside this function.
    #[config(env = "DESTINATION_BUCKET")]
    pub destination_bucket: String,

    /// Lifetime of the presigned retrieval URL, in seconds.
    #[config(env = "PRESIGNED_URL_TTL_SECS", default = 3600)]
    pub url_expiry_secs: u64,

    #[config(nested)]
    pub log: LogConfig,
}

/// Logging output settings.
#[derive(Debug, Clone, Config)]
pub struct LogConfig {
    /// Level or `EnvFilter` directive, e.g. `info` or `image_resize_lambda=debug`.
    /// `RUST_LOG` takes precedence when set.
    #[config(env = "LOG_LEVEL", default = "info")]
    pub level: String,

    /// `json` for CloudWatch, `text` for local runs.
    #[config(env = "LOG_FORMAT", default = "json")]
    pub format: String,
}

impl HandlerConfig {
    /// Load from the environment layered over the TOML file at `path`, then
    /// validate. A missing file is skipped.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::builder().env().file(path).load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destination_bucket.trim().is_empty() {
            return Err(ConfigError::Validation(
                "destination_bucket must not be empty".into(),
            ));
        }
        if self.url_expiry_secs == 0 || self.url_expiry_secs > MAX_URL_EXPIRY_SECS {
            return Err(ConfigError::Validation(format!(
                "url_expiry_secs must be 1-{MAX_URL_EXPIRY_SECS}"
            )));
        }
        if !matches!(self.log.format.as_str(), "json" | "text") {
            return Err(ConfigError::Validation(
                "log.format must be \"json\" or \"text\"".into(),
            ));
        }
        Ok(())
    }

    pub fn url_expiry(&self) -> Duration {
        Duration::from_secs(self.url_expiry_secs)
    }
}

/// Documented TOML template with every option and its default.
pub fn stock_config_toml() -> String {
    confique::toml::template::<HandlerConfig>(confique::toml::FormatOptions::default())
}

//! Application configuration management.
//!
//! Configuration is loaded from an optional YAML file with environment variable overrides. The
//! configuration file path defaults to `config.yaml` but can be specified via the `-f` flag or the
//! `ZOOPORT_CONFIG` environment variable. A missing file is not an error: every field has a
//! default, so the service starts with no configuration at all.
//!
//! ## Loading Priority
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `ZOOPORT_` override YAML values
//!
//! For nested values, use double underscores. For example, `ZOOPORT_UPLOAD__DIR=/srv/uploads`
//! sets the `upload.dir` field.
//!
//! ## Example
//!
//! ```yaml
//! host: 0.0.0.0
//! port: 5000
//! upload:
//!   dir: uploads
//!   max_request_bytes: 16777216
//!   enforce_extension_allow_list: false
//!   allowed_extensions: [txt, pdf, png, jpg, jpeg, gif, doc, docx, csv, xlsx]
//! enable_otel_export: false
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::Error;

/// Default cap on request bodies: 16 MiB.
pub const DEFAULT_MAX_REQUEST_BYTES: u64 = 16 * 1024 * 1024;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "ZOOPORT_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Where and how uploaded files are stored
    pub upload: UploadConfig,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
}

/// Upload handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Directory uploaded files are written to. Created at startup if absent.
    pub dir: PathBuf,
    /// Maximum accepted request body, in bytes. Applies to every route.
    pub max_request_bytes: u64,
    /// Reject uploads whose extension is not in `allowed_extensions`.
    ///
    /// Off by default: the extension list has historically been declared but never checked, and
    /// turning the check on changes which uploads succeed.
    pub enforce_extension_allow_list: bool,
    /// Extensions accepted when `enforce_extension_allow_list` is on. Matched case-insensitively.
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            enforce_extension_allow_list: false,
            allowed_extensions: ["txt", "pdf", "png", "jpg", "jpeg", "gif", "doc", "docx", "csv", "xlsx"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            upload: UploadConfig::default(),
            enable_otel_export: false,
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        config.upload.allowed_extensions = config
            .upload
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<(), Error> {
        if self.upload.max_request_bytes == 0 {
            return Err(Error::Internal {
                operation: "Config validation: upload.max_request_bytes must be greater than 0".to_string(),
            });
        }

        if usize::try_from(self.upload.max_request_bytes).is_err() {
            return Err(Error::Internal {
                operation: format!(
                    "Config validation: upload.max_request_bytes ({}) does not fit in memory on this platform",
                    self.upload.max_request_bytes
                ),
            });
        }

        if self.upload.dir.as_os_str().is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: upload.dir cannot be empty".to_string(),
            });
        }

        if self.upload.enforce_extension_allow_list && self.upload.allowed_extensions.is_empty() {
            return Err(Error::Internal {
                operation: "Config validation: upload.allowed_extensions cannot be empty while enforce_extension_allow_list is true"
                    .to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            // ZOOPORT_CONFIG names the file itself, not a field
            .merge(Env::prefixed("ZOOPORT_").ignore(&["config"]).split("__"))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Body cap as a `usize`, for axum's body limit layer.
    pub fn body_limit(&self) -> usize {
        // validate() guarantees this fits
        usize::try_from(self.upload.max_request_bytes).unwrap_or(usize::MAX)
    }
}

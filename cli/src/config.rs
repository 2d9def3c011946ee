//! User configuration for `oscal-cli`.
//!
//! Every section and field is optional; command-line flags always win over
//! values read here.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! convert:
//!   format: yaml
//!   overwrite: false
//! validate:
//!   strict: true
//! logging:
//!   level: info
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use oscal_cli_core::{DocumentFormat, ErrorCategory, OperationDefaults};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "OSCAL_CLI_CONFIG";

/// File looked up in the working directory when nothing else is given.
pub const DEFAULT_CONFIG_FILE: &str = ".oscal-cli.yml";

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// A bad configuration file is a usage problem, like a bad flag.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Usage
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Target format used when `--to` is not given.
    pub format: Option<DocumentFormat>,
    pub overwrite: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidateConfig {
    pub strict: bool,
}

/// Log level names accepted in the `logging` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<LogLevel>,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: Option<String>,
    pub convert: ConvertConfig,
    pub validate: ValidateConfig,
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Loads configuration from a YAML file. An empty file yields defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Finds and loads the active configuration.
    ///
    /// Lookup order: `explicit` (from `--config`), then `from_env` (the value
    /// of [`CONFIG_ENV`]), then [`DEFAULT_CONFIG_FILE`] in `working_dir`.
    /// Explicitly named files must exist; a missing default file means
    /// built-in defaults.
    pub fn discover(
        explicit: Option<&Path>,
        from_env: Option<OsString>,
        working_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| from_env.filter(|v| !v.is_empty()).map(PathBuf::from));
        if let Some(path) = named {
            let path = working_dir.join(path);
            debug!(path = %path.display(), "Loading configuration");
            return Self::load(path);
        }

        let fallback = working_dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            debug!(path = %fallback.display(), "Loading configuration");
            return Self::load(fallback);
        }
        Ok(Self::default())
    }

    /// Option defaults handed to every leaf.
    pub fn to_defaults(&self) -> OperationDefaults {
        OperationDefaults {
            target_format: self.convert.format,
            overwrite: self.convert.overwrite,
            strict: self.validate.strict,
        }
    }
}

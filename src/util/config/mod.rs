//! Host configuration
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. File named by OHX_SCRIPT_CONFIG
//! 3. ./ohx-script.toml
//! 4. Default values
//! ```
//!
//! # Example
//!
//! ```toml
//! [script]
//! a_string = "from test.js"
//! delay_ms = 1000
//!
//! [log]
//! level = "info"
//!
//! [host]
//! greeting = "hello"
//! rule_type = "condition"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::runtime::value::ScriptValue;
use crate::script::hello::DEFAULT_DELAY_MS;
use crate::util::logger::LogLevel;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "OHX_SCRIPT_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ohx-script.toml";

/// Host configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HostConfig {
    /// Script settings
    #[serde(default)]
    pub script: ScriptConfig,
    /// Log settings
    #[serde(default)]
    pub log: LogConfig,
    /// Host double settings
    #[serde(default)]
    pub host: HostSection,
}

/// Script configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptConfig {
    /// Value of the `a_string` import
    #[serde(default = "default_a_string")]
    pub a_string: String,
    /// Delay before the output slot is overwritten
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Initial output slot value; null when absent
    #[serde(default)]
    pub initial_output: Option<String>,
}

fn default_a_string() -> String {
    "from test.js".to_string()
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            a_string: default_a_string(),
            delay_ms: DEFAULT_DELAY_MS,
            initial_output: None,
        }
    }
}

impl ScriptConfig {
    /// Initial value of the output slot; absent or `"null"` is `Null`
    pub fn initial_output(&self) -> ScriptValue {
        match self.initial_output.as_deref() {
            None | Some("null") => ScriptValue::Null,
            Some(text) => ScriptValue::from(text),
        }
    }
}

/// Log configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// Minimum level
    #[serde(default)]
    pub level: LogLevel,
}

/// Settings for the in-memory host doubles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostSection {
    /// Word `hello` greets with
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Value of `ruletype()`
    #[serde(default = "default_rule_type")]
    pub rule_type: String,
}

fn default_greeting() -> String {
    "hello".to_string()
}

fn default_rule_type() -> String {
    "condition".to_string()
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            rule_type: default_rule_type(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Config serialize error: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Path named by [`CONFIG_ENV`], if set
pub fn config_path_from_env() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV).map(PathBuf::from)
}

/// Parse a config document
pub fn parse_config(content: &str) -> Result<HostConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load a config file that must exist
pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    debug!("loading config from {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Load following the hierarchy; defaults when no file is found
pub fn load_default() -> Result<HostConfig, ConfigError> {
    if let Some(path) = config_path_from_env() {
        return load_config(&path);
    }

    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return load_config(local);
    }

    Ok(HostConfig::default())
}

/// Save configuration
pub fn save_config(
    config: &HostConfig,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| ConfigError::IoError {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

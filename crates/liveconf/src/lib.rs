//! liveconf - configuration loading for stagecall
//!
//! Values are layered, later wins:
//! 1. Compiled defaults
//! 2. ~/.config/stagecall/config.toml
//! 3. ./stagecall.toml (or the --config path)
//! 4. Environment variables (ABLETON_OSC_*, STAGECALL_*)
//!
//! Tool-call arguments (connect_ableton host/ports) override all of these
//! at the use-case layer.

mod loader;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use loader::{load, load_from, ConfigSources};

/// Default per-request OSC reply timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value in {var}: {message}")]
    Env { var: String, message: String },
}

/// OSC endpoint and timing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    /// Host the remote script runs on (and replies from)
    pub host: String,
    /// Port the remote script listens on
    pub send_port: u16,
    /// Local port replies arrive on
    pub receive_port: u16,
    /// Per-request reply timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for OscConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            send_port: 11_000,
            receive_port: 11_001,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Logging settings. These never affect wire behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// tracing env-filter directive, e.g. "info" or "stagecall=debug"
    pub filter: String,
    /// Log destination; stderr when unset (stdout stays protocol-clean)
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filter: "info".to_string(), file: None }
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    pub osc: OscConfig,
    pub log: LogConfig,
}

impl BridgeConfig {
    /// Render the effective config as TOML (for `--show-config`).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

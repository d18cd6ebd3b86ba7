//! Config file discovery, loading, and environment variable overlay.

use std::env;
use std::path::{Path, PathBuf};

use crate::{BridgeConfig, ConfigError};

/// Information about where config values came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Config files that were loaded (in order)
    pub files: Vec<PathBuf>,
    /// Environment variables that overrode config values
    pub env_overrides: Vec<String>,
}

/// Discover config files in standard locations, in load order
/// (user, local/cli). Only returns files that exist.
fn discover_config_files(cli_path: Option<&Path>) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Some(config_dir) = directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()) {
        let user = config_dir.join("stagecall/config.toml");
        if user.exists() {
            files.push(user);
        }
    }

    // CLI override takes precedence over the local file
    if let Some(path) = cli_path {
        if path.exists() {
            files.push(path.to_path_buf());
            return files;
        }
    }

    let local = PathBuf::from("stagecall.toml");
    if local.exists() {
        files.push(local);
    }

    files
}

fn load_file(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn merge(base: &mut BridgeConfig, layer: BridgeConfig) {
    // Whole-section replacement is enough at this config size; a file that
    // sets [osc] restates the section.
    let defaults = BridgeConfig::default();
    if layer.osc != defaults.osc {
        base.osc = layer.osc;
    }
    if layer.log != defaults.log {
        base.log = layer.log;
    }
}

fn apply_env(config: &mut BridgeConfig, sources: &mut ConfigSources) -> Result<(), ConfigError> {
    if let Ok(host) = env::var("ABLETON_OSC_HOST") {
        if !host.is_empty() {
            config.osc.host = host;
            sources.env_overrides.push("ABLETON_OSC_HOST".into());
        }
    }
    for (var, slot) in [
        ("ABLETON_OSC_SEND_PORT", &mut config.osc.send_port),
        ("ABLETON_OSC_RECEIVE_PORT", &mut config.osc.receive_port),
    ] {
        if let Ok(raw) = env::var(var) {
            if !raw.is_empty() {
                *slot = raw.parse().map_err(|_| ConfigError::Env {
                    var: var.to_string(),
                    message: format!("{raw:?} is not a port number"),
                })?;
                sources.env_overrides.push(var.into());
            }
        }
    }
    if let Ok(raw) = env::var("STAGECALL_TIMEOUT_MS") {
        if !raw.is_empty() {
            config.osc.timeout_ms = raw.parse().map_err(|_| ConfigError::Env {
                var: "STAGECALL_TIMEOUT_MS".to_string(),
                message: format!("{raw:?} is not a millisecond count"),
            })?;
            sources.env_overrides.push("STAGECALL_TIMEOUT_MS".into());
        }
    }
    if let Ok(filter) = env::var("STAGECALL_LOG") {
        if !filter.is_empty() {
            config.log.filter = filter;
            sources.env_overrides.push("STAGECALL_LOG".into());
        }
    }
    if let Ok(path) = env::var("STAGECALL_LOG_FILE") {
        if !path.is_empty() {
            config.log.file = Some(PathBuf::from(path));
            sources.env_overrides.push("STAGECALL_LOG_FILE".into());
        }
    }
    Ok(())
}

/// Load configuration from the standard locations plus environment.
pub fn load() -> Result<(BridgeConfig, ConfigSources), ConfigError> {
    load_from(None)
}

/// Load configuration with an optional CLI-provided file path.
pub fn load_from(cli_path: Option<&Path>) -> Result<(BridgeConfig, ConfigSources), ConfigError> {
    let mut config = BridgeConfig::default();
    let mut sources = ConfigSources::default();

    for path in discover_config_files(cli_path) {
        let layer = load_file(&path)?;
        merge(&mut config, layer);
        sources.files.push(path);
    }

    apply_env(&mut config, &mut sources)?;
    Ok((config, sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults_without_any_file() {
        let config = BridgeConfig::default();
        assert_eq!(config.osc.host, "127.0.0.1");
        assert_eq!(config.osc.send_port, 11_000);
        assert_eq!(config.osc.receive_port, 11_001);
        assert_eq!(config.osc.timeout_ms, 2_000);
    }

    #[test]
    fn file_layer_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[osc]\nhost = \"192.168.1.20\"\nsend_port = 9000\nreceive_port = 9001\ntimeout_ms = 500"
        )
        .unwrap();

        let (config, sources) = load_from(Some(file.path())).unwrap();
        assert_eq!(config.osc.host, "192.168.1.20");
        assert_eq!(config.osc.send_port, 9000);
        assert_eq!(config.osc.timeout_ms, 500);
        assert!(sources.files.contains(&file.path().to_path_buf()));
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[osc]\nsend_port = 12000").unwrap();

        let (config, _) = load_from(Some(file.path())).unwrap();
        assert_eq!(config.osc.send_port, 12_000);
        assert_eq!(config.osc.receive_port, 11_001);
        assert_eq!(config.osc.host, "127.0.0.1");
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[osc\nhost=").unwrap();

        let err = load_from(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn effective_config_renders_as_toml() {
        let rendered = BridgeConfig::default().to_toml();
        assert!(rendered.contains("[osc]"));
        assert!(rendered.contains("send_port = 11000"));
    }
}

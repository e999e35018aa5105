use std::io::ErrorKind;
use std::path::PathBuf;

use super::Config;
use crate::ConfigError;

/// Returns the config directory: `~/.config/keysnap/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("keysnap"))
}

/// Returns the config file path: `~/.config/keysnap/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Parses TOML text into a [`Config`]. Values are not validated here.
pub fn parse(content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))
}

/// Reads and parses `config.toml`.
///
/// Returns `Ok(None)` when the file does not exist, so callers can
/// fall back to defaults silently. Read and parse failures are errors
/// that name the file.
pub fn try_load() -> Result<Option<Config>, ConfigError> {
    let path =
        config_path().ok_or_else(|| ConfigError::Load("could not determine config path".into()))?;

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::Load(format!("{}: {e}", path.display()))),
    };

    parse(&content)
        .map(Some)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))
}

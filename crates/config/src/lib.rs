pub mod schema;

pub use schema::{MonitorConfig, SensorConfig, ShutdownConfig};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use ups_core::{Result, UpsError};

/// Load configuration from a TOML file.
///
/// A missing file is not an error: the daemon runs on defaults so it
/// can be dropped onto a stock image without any setup. Anything else
/// (unreadable file, bad TOML) is fatal at startup.
pub fn load(path: &Path) -> Result<MonitorConfig> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("no config at '{}'; running on defaults", path.display());
            return Ok(MonitorConfig::default());
        }
        Err(e) => {
            return Err(UpsError::Config(format!(
                "cannot read '{}': {e}",
                path.display()
            )))
        }
    };

    toml::from_str(&raw).map_err(|e| UpsError::Config(format!("'{}': {e}", path.display())))
}

/// Default config location: `$XDG_CONFIG_HOME/upsmon/upsmon.toml`.
pub fn default_path() -> PathBuf {
    config_dir().join("upsmon").join("upsmon.toml")
}

fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config")
}

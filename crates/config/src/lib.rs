pub mod schema;

pub use schema::{MonitorConfig, ServerConfig, WattsonConfig};

use std::path::{Path, PathBuf};
use wattson_core::{Result, WattsonError};

/// Load configuration from a TOML file.  Returns `WattsonConfig::default()`
/// if the file doesn't exist so the service always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<WattsonConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(WattsonConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| WattsonError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| WattsonError::Config(format!("TOML parse error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("wattson").join("wattson.toml")
}

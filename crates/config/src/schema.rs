use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `wattson.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WattsonConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Background battery monitor settings.
    pub monitor: MonitorConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port to listen on. The `PORT` environment variable overrides
    /// this at startup.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 9090 }
    }
}

/// Background battery monitor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between poll cycles during normal operation.
    pub interval_secs: u64,
    /// Shortened wait used while no battery is present.
    pub retry_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            retry_secs: 30,
        }
    }
}

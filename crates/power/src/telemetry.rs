use std::path::{Path, PathBuf};
use wattson_core::state::{SECS_UNKNOWN, SECS_UNLIMITED};
use wattson_core::BatteryReading;

/// Default location of the Linux power-supply class directory.
pub const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Reads battery state from the Linux sysfs power-supply interface.
///
/// The root directory is injectable so tests can point it at a fake sysfs
/// tree. Readings are taken from the first supply whose `type` file reads
/// `Battery` (directories scanned in sorted order).
#[derive(Debug, Clone)]
pub struct TelemetrySource {
    root: PathBuf,
}

impl TelemetrySource {
    pub fn new() -> Self {
        Self {
            root: PathBuf::from(POWER_SUPPLY_ROOT),
        }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Take a fresh reading, or `None` if the system has no battery
    /// (desktop, VM, or battery removed).
    pub fn read(&self) -> Option<BatteryReading> {
        for dir in battery_dirs(&self.root) {
            if let Some(reading) = read_battery_dir(&dir) {
                return Some(reading);
            }
        }
        None
    }
}

impl Default for TelemetrySource {
    fn default() -> Self {
        Self::new()
    }
}

/// All supply directories under `root` whose `type` reads `Battery`,
/// sorted by name so the pick is deterministic on multi-battery systems.
fn battery_dirs(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };

    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            std::fs::read_to_string(p.join("type"))
                .map(|t| t.trim() == "Battery")
                .unwrap_or(false)
        })
        .collect();
    dirs.sort();
    dirs
}

fn read_battery_dir(dir: &Path) -> Option<BatteryReading> {
    let percent = read_value::<f64>(dir, "capacity")?;
    let status = std::fs::read_to_string(dir.join("status")).ok()?;
    let plugged = matches!(status.trim(), "Charging" | "Full" | "Not charging");

    Some(BatteryReading {
        percent,
        plugged,
        secs_left: estimate_secs_left(dir, plugged),
        temperature_c: read_value::<f64>(dir, "temp").map(|t| t / 10.0),
    })
}

/// Estimated seconds until empty.
///
/// On external power the estimate does not apply ([`SECS_UNLIMITED`]).
/// On battery it is derived from the energy (µWh / µW) or charge
/// (µAh / µA) file pairs; [`SECS_UNKNOWN`] when neither pair is usable.
fn estimate_secs_left(dir: &Path, plugged: bool) -> i64 {
    if plugged {
        return SECS_UNLIMITED;
    }

    for (stored_file, rate_file) in [("energy_now", "power_now"), ("charge_now", "current_now")] {
        let (Some(stored), Some(rate)) = (
            read_value::<u64>(dir, stored_file),
            read_value::<u64>(dir, rate_file),
        ) else {
            continue;
        };
        if rate > 0 {
            return (stored as f64 / rate as f64 * 3600.0) as i64;
        }
    }

    SECS_UNKNOWN
}

fn read_value<T: std::str::FromStr>(dir: &Path, name: &str) -> Option<T> {
    std::fs::read_to_string(dir.join(name))
        .ok()?
        .trim()
        .parse()
        .ok()
}

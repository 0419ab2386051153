use crate::telemetry::TelemetrySource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use wattson_core::{BatteryEvent, MonitorState};

/// Handle returned by [`spawn_monitor`].
///
/// The loop owns the only mutable access to [`MonitorState`]; everyone else
/// (the HTTP layer) reads cloned snapshots through this handle, so a reader
/// can never observe a half-applied update.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    state: Arc<RwLock<MonitorState>>,
}

impl MonitorHandle {
    /// The most recently observed battery condition.
    pub async fn snapshot(&self) -> MonitorState {
        self.state.read().await.clone()
    }
}

/// Spawn the background battery monitor.
///
/// Polls `telemetry` every `interval`, logs discrete state changes, and
/// keeps the shared snapshot current. While no battery is present it waits
/// the shorter `retry` period instead and leaves the snapshot untouched.
///
/// The task runs for the lifetime of the process; every failure path is
/// logged and swallowed because the loop has no caller to report to.
pub fn spawn_monitor(
    telemetry: TelemetrySource,
    interval: Duration,
    retry: Duration,
) -> MonitorHandle {
    let state = Arc::new(RwLock::new(MonitorState::default()));
    let handle = MonitorHandle {
        state: state.clone(),
    };

    tokio::spawn(async move {
        tracing::info!(
            "battery monitor started (poll every {:?}, retry every {:?})",
            interval,
            retry
        );

        loop {
            let Some(reading) = telemetry.read() else {
                tracing::warn!("No battery detected.");
                tokio::time::sleep(retry).await;
                continue;
            };

            let events = state.write().await.observe(&reading);
            for event in &events {
                log_event(event);
            }

            tokio::time::sleep(interval).await;
        }
    });

    handle
}

fn log_event(event: &BatteryEvent) {
    match event {
        BatteryEvent::Level { percent } => {
            tracing::info!("Battery level: {percent}%");
        }
        BatteryEvent::LowBattery { percent } => {
            tracing::warn!("Battery low ({percent}% <= 20%) and discharging!");
        }
        BatteryEvent::PowerSource { plugged } => {
            let status = if *plugged { "charging" } else { "discharging" };
            tracing::info!("Power state changed: {status}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_battery(root: &Path, percent: &str, status: &str) {
        let dir = root.join("BAT0");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("type"), "Battery\n").unwrap();
        fs::write(dir.join("capacity"), percent).unwrap();
        fs::write(dir.join("status"), status).unwrap();
    }

    async fn wait_for_snapshot(handle: &MonitorHandle) -> MonitorState {
        for _ in 0..100 {
            let snap = handle.snapshot().await;
            if snap.last_percent.is_some() {
                return snap;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("monitor never produced a snapshot");
    }

    #[tokio::test]
    async fn monitor_publishes_first_reading() {
        let td = TempDir::new().unwrap();
        write_battery(td.path(), "57\n", "Discharging\n");

        let handle = spawn_monitor(
            TelemetrySource::with_root(td.path()),
            Duration::from_millis(10),
            Duration::from_millis(10),
        );

        let snap = wait_for_snapshot(&handle).await;
        assert_eq!(snap.last_percent, Some(57.0));
        assert_eq!(snap.last_plugged, Some(false));
    }

    #[tokio::test]
    async fn monitor_tracks_changes_across_cycles() {
        let td = TempDir::new().unwrap();
        write_battery(td.path(), "57\n", "Discharging\n");

        let handle = spawn_monitor(
            TelemetrySource::with_root(td.path()),
            Duration::from_millis(10),
            Duration::from_millis(10),
        );
        wait_for_snapshot(&handle).await;

        write_battery(td.path(), "56\n", "Charging\n");
        for _ in 0..100 {
            let snap = handle.snapshot().await;
            if snap.last_percent == Some(56.0) && snap.last_plugged == Some(true) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("monitor never picked up the new reading");
    }

    #[tokio::test]
    async fn missing_battery_leaves_snapshot_unset() {
        let td = TempDir::new().unwrap();

        let handle = spawn_monitor(
            TelemetrySource::with_root(td.path()),
            Duration::from_millis(10),
            Duration::from_millis(10),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snap = handle.snapshot().await;
        assert_eq!(snap.last_percent, None);
        assert_eq!(snap.last_plugged, None);
    }
}

pub mod routes;

pub use routes::router;

use chrono::{DateTime, Local};
use wattson_power::{MonitorHandle, TelemetrySource, ThresholdControl};

/// Shared state handed to every request handler.
///
/// Telemetry and threshold control are stateless per call; the monitor
/// handle is the read-only window into the background loop's snapshot.
pub struct AppState {
    pub telemetry: TelemetrySource,
    pub monitor: MonitorHandle,
    pub control: ThresholdControl,
    pub started_at: DateTime<Local>,
}

impl AppState {
    pub fn new(
        telemetry: TelemetrySource,
        monitor: MonitorHandle,
        control: ThresholdControl,
    ) -> Self {
        Self {
            telemetry,
            monitor,
            control,
            started_at: Local::now(),
        }
    }
}

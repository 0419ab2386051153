pub mod monitor;
pub mod privileged;
pub mod telemetry;
pub mod threshold;

pub use monitor::{spawn_monitor, MonitorHandle};
pub use privileged::{PkexecWriter, PrivilegedWriter};
pub use telemetry::TelemetrySource;
pub use threshold::{ChargeLimitSupport, ThresholdControl};

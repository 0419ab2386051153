pub mod error;
pub mod event;
pub mod state;

pub use error::{Result, WattsonError};
pub use event::BatteryEvent;
pub use state::{BatteryReading, MonitorState};

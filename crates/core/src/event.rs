/// Discrete battery condition changes derived by the monitor loop.
///
/// Events are produced by [`crate::state::MonitorState::observe`] once per
/// poll cycle and logged by the monitor task. Identical consecutive readings
/// produce no events, so the log stays quiet on an idle battery.
#[derive(Debug, Clone, PartialEq)]
pub enum BatteryEvent {
    /// Charge level differs from the last logged value.
    Level { percent: f64 },
    /// Level is at or below the low threshold while on battery power.
    /// Fires only on cycles where the level changed (edge-triggered).
    LowBattery { percent: f64 },
    /// External power was attached or detached.
    PowerSource { plugged: bool },
}

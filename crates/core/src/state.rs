use crate::event::BatteryEvent;

/// `secs_left` sentinel: remaining time cannot be estimated.
pub const SECS_UNKNOWN: i64 = -1;
/// `secs_left` sentinel: on external power, time-to-empty does not apply.
pub const SECS_UNLIMITED: i64 = -2;

/// Level at or below which an unplugged battery is considered low.
pub const LOW_BATTERY_PERCENT: f64 = 20.0;

/// A point-in-time battery snapshot. Produced fresh on every poll; carries
/// no identity and is never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryReading {
    /// Charge level (0–100).
    pub percent: f64,
    /// Whether external power is attached (charging or full).
    pub plugged: bool,
    /// Estimated seconds until empty, or one of the `SECS_*` sentinels.
    pub secs_left: i64,
    /// Battery temperature in °C, if the hardware reports one.
    pub temperature_c: Option<f64>,
}

/// Last observed battery condition.
///
/// Owned exclusively by the monitor loop; other tasks only ever see cloned
/// snapshots. Both fields start unset so the first reading always logs.
#[derive(Debug, Clone, Default)]
pub struct MonitorState {
    /// Charge level at the last logged change.
    pub last_percent: Option<f64>,
    /// Plugged state at the last logged transition.
    pub last_plugged: Option<bool>,
}

impl MonitorState {
    /// Fold one reading into the state and return the events it produced.
    ///
    /// A level event fires iff the percent differs from the last logged
    /// value (including the unset→first transition). The low-battery event
    /// piggybacks on the level change: it re-fires on every cycle where the
    /// level moved while at or below the threshold and unplugged, but never
    /// on a cycle where the level held steady.
    pub fn observe(&mut self, reading: &BatteryReading) -> Vec<BatteryEvent> {
        let mut events = Vec::new();

        if self.last_percent != Some(reading.percent) {
            events.push(BatteryEvent::Level {
                percent: reading.percent,
            });
            self.last_percent = Some(reading.percent);

            if reading.percent <= LOW_BATTERY_PERCENT && !reading.plugged {
                events.push(BatteryEvent::LowBattery {
                    percent: reading.percent,
                });
            }
        }

        if self.last_plugged != Some(reading.plugged) {
            events.push(BatteryEvent::PowerSource {
                plugged: reading.plugged,
            });
            self.last_plugged = Some(reading.plugged);
        }

        events
    }
}

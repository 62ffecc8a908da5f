use serde::{Deserialize, Serialize};

/// A single sensor sample, produced once per poll tick.
///
/// `current_ma` carries the tray convention inherited from the UPS HAT:
/// the raw sensor register is negated, and a value above the charging
/// threshold means the pack is taking charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Bus voltage on the load side of the shunt, in volts.
    pub volts: f64,
    /// Battery current in milliamps, negated from the raw register;
    /// compared against [`Thresholds::charging_threshold_ma`].
    pub current_ma: i32,
}

/// Battery thresholds for the percentage mapping and the state machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Voltage treated as 0% charge.
    pub empty_volts: f64,
    /// Voltage treated as 100% charge.
    pub full_volts: f64,
    /// Current (in the inverted tray convention) above which the pack
    /// counts as charging.
    pub charging_threshold_ma: i32,
    /// Charge percentage at or below which the shutdown countdown starts.
    pub critical_percent: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            empty_volts: 3.0,
            full_volts: 4.2,
            charging_threshold_ma: 50,
            critical_percent: 10,
        }
    }
}

impl Thresholds {
    /// Map a bus voltage onto `[0, 100]` with the linear approximation
    /// the UPS HAT uses: `empty_volts..full_volts` spans `0..100`.
    #[must_use]
    pub fn percentage(&self, volts: f64) -> u8 {
        let span = self.full_volts - self.empty_volts;
        let pct = (volts - self.empty_volts) / span * 100.0;
        pct.round().clamp(0.0, 100.0) as u8
    }

    /// Whether a reading counts as "on charger".
    #[must_use]
    pub fn is_charging(&self, current_ma: i32) -> bool {
        current_ma > self.charging_threshold_ma
    }
}

/// Derived battery state, recomputed on every [`Reading`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryState {
    /// Charge level, clamped to `[0, 100]`.
    pub percentage: u8,
    /// `true` while charge current exceeds the configured threshold.
    pub charging: bool,
    /// Seconds left on the auto-shutdown countdown, `None` when idle.
    pub countdown_remaining: Option<u32>,
}

impl BatteryState {
    /// Bucket index a display uses to pick a discrete icon asset:
    /// eleven 10%-wide bins, doubled for the charging variant
    /// (`battery.0.png` .. `battery.21.png` in the original asset set).
    #[must_use]
    pub fn icon_index(&self) -> u8 {
        self.percentage / 10 + if self.charging { 11 } else { 0 }
    }
}

/// Format a reading + state as the one-line status string shown in the
/// tray tooltip and the log (e.g. `"87%  4.1V  142mA"`).
pub fn format_status(reading: &Reading, state: &BatteryState) -> String {
    format!(
        "{}%  {:.1}V  {}mA",
        state.percentage, reading.volts, reading.current_ma
    )
}

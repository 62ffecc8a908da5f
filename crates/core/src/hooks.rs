use crate::error::Result;
use crate::state::{BatteryState, Reading};

/// Display boundary.
///
/// The monitor core knows nothing about tray icons or toolkits; a sink
/// receives every derived state and renders it however it likes
/// (tooltip, log line, LED, D-Bus notification). The countdown
/// callbacks have no-op defaults so a minimal sink only has to show
/// status.
pub trait StatusSink: Send {
    /// Called once per accepted reading with the freshly derived state.
    fn status(&mut self, reading: &Reading, state: &BatteryState);

    /// Called on every countdown tick with the seconds left before
    /// power-off.
    fn countdown(&mut self, _remaining: u32) {}

    /// Called when a running countdown is cancelled because charging
    /// resumed.
    fn countdown_cancelled(&mut self) {}
}

/// Host power-off boundary. Invoked at most once, after the shutdown
/// countdown elapses; there is no error recovery past this point.
pub trait PowerSwitch: Send {
    fn power_off(&mut self) -> Result<()>;
}

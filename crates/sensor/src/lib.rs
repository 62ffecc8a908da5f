pub mod ina219;
pub mod power;

pub use ina219::Ina219;
pub use power::SystemPower;

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use ups_core::{Reading, Result};

/// Battery sensor abstraction.
///
/// The INA219 driver implements this; tests substitute scripted
/// readings. The sensor handle is owned by the poll task — there is no
/// process-wide sensor singleton.
pub trait BatterySensor: Send {
    /// Bus voltage in volts (load side of the shunt).
    fn bus_voltage(&mut self) -> Result<f64>;

    /// Battery current in milliamps, as the sensor reports it.
    fn current_ma(&mut self) -> Result<f64>;

    /// One full sample, with the current negated into the tray
    /// convention the state machine's charging threshold expects.
    fn read(&mut self) -> Result<Reading> {
        let volts = self.bus_voltage()?;
        let current_ma = -(self.current_ma()? as i32);
        Ok(Reading { volts, current_ma })
    }
}

/// Spawn a background Tokio task that samples the sensor every
/// `interval` and forwards [`Reading`]s through the returned channel.
///
/// A failed read is logged at warn and that tick skipped; the next tick
/// retries. The task stops automatically when the receiver is dropped.
pub fn spawn_poller<S>(mut sensor: S, interval: Duration) -> mpsc::Receiver<Reading>
where
    S: BatterySensor + 'static,
{
    let (tx, rx) = mpsc::channel(4);

    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let reading = match sensor.read() {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("sensor read failed: {e}");
                    continue;
                }
            };

            if tx.send(reading).await.is_err() {
                break; // all receivers dropped
            }
        }
    });

    rx
}

//! upsmon — battery monitor and auto-shutdown daemon for the Waveshare
//! UPS HAT (INA219 over I2C).
//!
//! Run with:  `RUST_LOG=info upsmon [config.toml]`

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use ups_core::BatteryMachine;
use ups_monitor::LogSink;
use ups_sensor::{Ina219, SystemPower};

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("upsmon v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(ups_config::default_path);
    let config = ups_config::load(&config_path)?;

    let sensor = Ina219::open(config.sensor.bus, config.sensor.address)?;
    let readings = ups_sensor::spawn_poller(
        sensor,
        Duration::from_millis(config.sensor.poll_interval_ms),
    );

    let machine = BatteryMachine::new(config.battery, config.shutdown.countdown_secs);
    let controller = config
        .shutdown
        .arm_power_controller
        .then_some(config.shutdown.power_controller_address);
    let power = SystemPower::new(
        config.sensor.bus,
        controller,
        config.shutdown.poweroff_command.as_str(),
    );

    ups_monitor::run(readings, machine, LogSink, power).await?;
    Ok(())
}

use serde::{Deserialize, Serialize};
use ups_core::Thresholds;

/// Root configuration structure parsed from `upsmon.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// I2C bus / sensor settings.
    pub sensor: SensorConfig,
    /// Battery curve and charging/critical thresholds.
    pub battery: Thresholds,
    /// Auto-shutdown behaviour.
    pub shutdown: ShutdownConfig,
}

/// Where and how often to read the INA219.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// I2C bus number (`/dev/i2c-N`).
    pub bus: u8,
    /// Sensor address on the bus.
    pub address: u16,
    /// Poll interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            bus: 1,
            address: 0x43,
            poll_interval_ms: 1000,
        }
    }
}

/// Auto-shutdown settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Countdown length in seconds once the battery goes critical.
    pub countdown_secs: u32,
    /// Probe the UPS power controller before powering off so the board
    /// can be powered back on once charged.
    pub arm_power_controller: bool,
    /// Power controller address on the same I2C bus.
    pub power_controller_address: u16,
    /// Command invoked to power the host off.
    pub poweroff_command: String,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 60,
            arm_power_controller: true,
            power_controller_address: 0x2d,
            poweroff_command: "poweroff".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_ups_hat() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.sensor.bus, 1);
        assert_eq!(cfg.sensor.address, 0x43);
        assert_eq!(cfg.sensor.poll_interval_ms, 1000);
        assert_eq!(cfg.battery.critical_percent, 10);
        assert_eq!(cfg.shutdown.countdown_secs, 60);
        assert_eq!(cfg.shutdown.power_controller_address, 0x2d);
        assert_eq!(cfg.shutdown.poweroff_command, "poweroff");
    }

    #[test]
    fn partial_toml_keeps_section_defaults() {
        let cfg: MonitorConfig = toml::from_str(
            r#"
            [battery]
            critical_percent = 15

            [shutdown]
            countdown_secs = 120
            arm_power_controller = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.battery.critical_percent, 15);
        assert_eq!(cfg.battery.charging_threshold_ma, 50);
        assert_eq!(cfg.shutdown.countdown_secs, 120);
        assert!(!cfg.shutdown.arm_power_controller);
        assert_eq!(cfg.sensor.address, 0x43);
    }

    #[test]
    fn hex_addresses_parse() {
        let cfg: MonitorConfig = toml::from_str(
            r#"
            [sensor]
            address = 0x42
            "#,
        )
        .unwrap();
        assert_eq!(cfg.sensor.address, 0x42);
    }
}

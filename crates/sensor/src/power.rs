use std::process::Command;

use rppal::i2c::I2c;
use ups_core::{PowerSwitch, Result, UpsError};

/// Power controller register that enables power-on once charged.
const REG_POWER_ON_ENABLE: u8 = 0x01;
const POWER_ON_MAGIC: u8 = 0x55;

/// Powers the host off, optionally arming the UPS power controller
/// first so the board can boot again when the pack has charge.
pub struct SystemPower {
    bus: u8,
    /// Controller address to probe before power-off, `None` to skip.
    controller: Option<u16>,
    command: String,
}

impl SystemPower {
    pub fn new(bus: u8, controller: Option<u16>, command: impl Into<String>) -> Self {
        Self {
            bus,
            controller,
            command: command.into(),
        }
    }

    /// Probe the controller and write the power-on enable byte.
    ///
    /// The probe is a one-byte read at the controller address, the same
    /// check `i2cdetect` performs for this address range.
    fn arm_power_controller(&self, address: u16) -> Result<()> {
        let mut i2c = I2c::with_bus(self.bus)
            .map_err(|e| UpsError::Power(format!("cannot open i2c bus {}: {e}", self.bus)))?;
        i2c.set_slave_address(address)
            .map_err(|e| UpsError::Power(format!("cannot address 0x{address:02x}: {e}")))?;

        let mut probe = [0u8; 1];
        i2c.read(&mut probe)
            .map_err(|e| UpsError::Power(format!("no controller at 0x{address:02x}: {e}")))?;

        i2c.write(&[REG_POWER_ON_ENABLE, POWER_ON_MAGIC])
            .map_err(|e| UpsError::Power(format!("enable write failed: {e}")))?;
        Ok(())
    }
}

impl PowerSwitch for SystemPower {
    /// Irreversible: arms the controller (best effort) and invokes the
    /// configured power-off command.
    fn power_off(&mut self) -> Result<()> {
        if let Some(address) = self.controller {
            match self.arm_power_controller(address) {
                Ok(()) => {
                    tracing::info!("power controller armed; board can power on once charged");
                }
                Err(e) => tracing::warn!("power controller not armed: {e}"),
            }
        }

        tracing::warn!("invoking '{}'", self.command);
        let status = Command::new(&self.command).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(UpsError::Power(format!(
                "'{}' exited with {status}",
                self.command
            )))
        }
    }
}

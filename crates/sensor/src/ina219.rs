use rppal::i2c::I2c;
use ups_core::{Result, UpsError};

use crate::BatterySensor;

const REG_CONFIG: u8 = 0x00;
const REG_BUS_VOLTAGE: u8 = 0x02;
const REG_CURRENT: u8 = 0x04;
const REG_CALIBRATION: u8 = 0x05;

/// 32 V bus range, /8 gain (±320 mV shunt), 12-bit 32-sample averaging
/// on both ADCs, continuous shunt-and-bus conversion.
const CONFIG_WORD: u16 = 0x3eef;

/// Calibration for the UPS HAT's shunt; gives a current LSB of 0.1 mA.
const CALIBRATION: u16 = 26868;
const CURRENT_LSB_MA: f64 = 0.1;

/// Bus voltage register: value is left-shifted by 3, LSB = 4 mV.
const BUS_VOLTAGE_LSB_V: f64 = 0.004;

/// INA219 current/voltage sensor on the Raspberry Pi I2C bus.
pub struct Ina219 {
    i2c: I2c,
}

impl Ina219 {
    /// Open the sensor on `/dev/i2c-<bus>` and program the calibration
    /// and configuration registers.
    pub fn open(bus: u8, address: u16) -> Result<Self> {
        let mut i2c = I2c::with_bus(bus)
            .map_err(|e| UpsError::Sensor(format!("cannot open i2c bus {bus}: {e}")))?;
        i2c.set_slave_address(address)
            .map_err(|e| UpsError::Sensor(format!("cannot address 0x{address:02x}: {e}")))?;

        let mut sensor = Self { i2c };
        sensor.write_register(REG_CALIBRATION, CALIBRATION)?;
        sensor.write_register(REG_CONFIG, CONFIG_WORD)?;
        Ok(sensor)
    }

    fn write_register(&mut self, reg: u8, value: u16) -> Result<()> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c
            .write(&[reg, hi, lo])
            .map_err(|e| UpsError::Sensor(format!("write reg 0x{reg:02x}: {e}")))?;
        Ok(())
    }

    fn read_register(&mut self, reg: u8) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(&[reg], &mut buf)
            .map_err(|e| UpsError::Sensor(format!("read reg 0x{reg:02x}: {e}")))?;
        Ok(u16::from_be_bytes(buf))
    }
}

impl BatterySensor for Ina219 {
    fn bus_voltage(&mut self) -> Result<f64> {
        let raw = self.read_register(REG_BUS_VOLTAGE)?;
        Ok(f64::from(raw >> 3) * BUS_VOLTAGE_LSB_V)
    }

    fn current_ma(&mut self) -> Result<f64> {
        // Two's-complement register, negative while discharging.
        let raw = self.read_register(REG_CURRENT)? as i16;
        Ok(f64::from(raw) * CURRENT_LSB_MA)
    }
}

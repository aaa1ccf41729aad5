// GestureWatch - LSM9DS1 IMU Driver
//
// Register-level driver for the accelerometer/gyroscope die over I2C.
// Avoids external crate version conflicts with esp-idf-hal.

use esp_idf_hal::i2c::I2cDriver;
use esp_idf_sys::EspError;

use crate::config::*;
use crate::sample::{Acceleration, AngularRate};
use crate::source::MotionSource;

// LSM9DS1 accelerometer/gyroscope register addresses
const REG_WHO_AM_I: u8 = 0x0F;
const REG_CTRL_REG1_G: u8 = 0x10;
const REG_STATUS_REG: u8 = 0x17;
const REG_OUT_X_L_G: u8 = 0x18; // Start of 6-byte gyro burst
const REG_CTRL_REG6_XL: u8 = 0x20;
const REG_CTRL_REG8: u8 = 0x22;
const REG_OUT_X_L_XL: u8 = 0x28; // Start of 6-byte accel burst
const WHO_AM_I_EXPECTED: u8 = 0x68;

const STATUS_XLDA: u8 = 0x01; // accelerometer data available
const STATUS_GDA: u8 = 0x02; // gyroscope data available

const FULL_SCALE_LSB: f32 = 32768.0;

pub struct Lsm9ds1<'d> {
    i2c: I2cDriver<'d>,
}

impl<'d> Lsm9ds1<'d> {
    pub fn new(i2c: I2cDriver<'d>) -> Self {
        Self { i2c }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&mut self) -> bool {
        let mut buf = [0u8; 1];
        match self
            .i2c
            .write_read(I2C_ADDR_LSM9DS1_AG, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS)
        {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Reset the device and configure accel (119 Hz, ±4 g) and gyro
    /// (119 Hz, ±2000 °/s).
    pub fn init(&mut self) -> anyhow::Result<()> {
        if !self.is_connected() {
            anyhow::bail!(
                "Failed to initialize IMU (no LSM9DS1 at 0x{:02X})",
                I2C_ADDR_LSM9DS1_AG
            );
        }

        // Software reset, register auto-increment
        self.write_reg(REG_CTRL_REG8, 0x05)?;
        esp_idf_hal::delay::FreeRtos::delay_ms(10);

        // Gyroscope: 119 Hz, ±2000 °/s
        self.write_reg(REG_CTRL_REG1_G, 0x78)?;

        // Accelerometer: 119 Hz, ±4 g
        self.write_reg(REG_CTRL_REG6_XL, 0x70)?;

        log::info!("LSM9DS1 initialised (±4g, ±2000°/s, 119Hz)");
        Ok(())
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), EspError> {
        self.i2c
            .write(I2C_ADDR_LSM9DS1_AG, &[reg, value], I2C_TIMEOUT_TICKS)
    }

    fn status(&mut self) -> u8 {
        let mut buf = [0u8; 1];
        match self
            .i2c
            .write_read(I2C_ADDR_LSM9DS1_AG, &[REG_STATUS_REG], &mut buf, I2C_TIMEOUT_TICKS)
        {
            Ok(()) => buf[0],
            Err(e) => {
                log::warn!("IMU status read error: {}", e);
                0
            }
        }
    }

    /// Burst-read three little-endian axes starting at `reg`.
    fn read_axes(&mut self, reg: u8) -> Result<[i16; 3], EspError> {
        let mut raw = [0u8; 6];
        self.i2c
            .write_read(I2C_ADDR_LSM9DS1_AG, &[reg], &mut raw, I2C_TIMEOUT_TICKS)?;
        Ok([
            i16::from_le_bytes([raw[0], raw[1]]),
            i16::from_le_bytes([raw[2], raw[3]]),
            i16::from_le_bytes([raw[4], raw[5]]),
        ])
    }
}

impl MotionSource for Lsm9ds1<'_> {
    type Error = EspError;

    fn acceleration_ready(&mut self) -> bool {
        self.status() & STATUS_XLDA != 0
    }

    fn read_acceleration(&mut self) -> Result<Acceleration, EspError> {
        let [x, y, z] = self.read_axes(REG_OUT_X_L_XL)?;
        let scale = ACCEL_RANGE_G / FULL_SCALE_LSB;
        Ok(Acceleration::new(
            x as f32 * scale,
            y as f32 * scale,
            z as f32 * scale,
        ))
    }

    fn gyroscope_ready(&mut self) -> bool {
        self.status() & STATUS_GDA != 0
    }

    fn read_gyroscope(&mut self) -> Result<AngularRate, EspError> {
        let [x, y, z] = self.read_axes(REG_OUT_X_L_G)?;
        let scale = GYRO_RANGE_DPS / FULL_SCALE_LSB;
        Ok(AngularRate::new(
            x as f32 * scale,
            y as f32 * scale,
            z as f32 * scale,
        ))
    }
}

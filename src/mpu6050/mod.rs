use embedded_hal_async::{delay::DelayNs, i2c::I2c};
use log::debug;
use nalgebra::Vector3;
use num_traits::FromPrimitive;

use crate::sample::ImuSource;

pub mod bits;
pub mod registers;

pub use registers::{AccelRange, GyroRange, CLKSEL, DEFAULT_MPU6050_ADDR};
use registers::*;

/// All possible errors of the MPU-6050 driver
#[derive(Debug)]
pub enum Error<E> {
    I2c(E),
    InvalidChipId(u8),
    InvalidRegisterValue(u8),
}

/// MPU-6050 6-axis IMU over async I2C. Accelerometer in g, gyroscope in deg/s.
pub struct Mpu6050<I2C> {
    i2c: I2C,
    addr: u8,
    accel_range: AccelRange,
    gyro_range: GyroRange,
}

impl<I2C, E> Mpu6050<I2C>
where
    I2C: I2c<Error = E>,
{
    /// Side effect free constructor, ranges are only written by [`Self::init`]
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            addr: DEFAULT_MPU6050_ADDR,
            accel_range: AccelRange::default(),
            gyro_range: GyroRange::default(),
        }
    }

    pub fn with_addr(mut self, addr: u8) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_accel_range(mut self, accel_range: AccelRange) -> Self {
        self.accel_range = accel_range;
        self
    }

    pub fn with_gyro_range(mut self, gyro_range: GyroRange) -> Self {
        self.gyro_range = gyro_range;
        self
    }

    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Wakes the chip, checks WHO_AM_I and writes the configured ranges
    pub async fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.wake(delay).await?;
        self.verify().await?;
        self.set_accel_range(self.accel_range).await?;
        self.set_gyro_range(self.gyro_range).await?;
        debug!(
            "MPU6050 at {:#x} ready, accel {:?}, gyro {:?}",
            self.addr, self.accel_range, self.gyro_range
        );
        Ok(())
    }

    /// Sleep is on after power up. Clears it and selects the X gyro PLL as
    /// clock source, which the register map recommends over the internal
    /// oscillator.
    async fn wake<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.write_byte(PWR_MGMT_1::ADDR, 0x00).await?;
        self.set_clock_source(CLKSEL::GyroX).await?;
        delay.delay_ms(100).await;
        Ok(())
    }

    async fn verify(&mut self) -> Result<(), Error<E>> {
        let id = self.read_byte(WHOAMI_REG).await?;
        if id != DEFAULT_MPU6050_ADDR {
            return Err(Error::InvalidChipId(id));
        }
        Ok(())
    }

    pub async fn set_clock_source(&mut self, source: CLKSEL) -> Result<(), Error<E>> {
        self.write_bits(PWR_MGMT_1::ADDR, PWR_MGMT_1::CLKSEL, source as u8)
            .await
    }

    pub async fn get_clock_source(&mut self) -> Result<CLKSEL, Error<E>> {
        let source = self.read_bits(PWR_MGMT_1::ADDR, PWR_MGMT_1::CLKSEL).await?;
        CLKSEL::from_u8(source).ok_or(Error::InvalidRegisterValue(source))
    }

    /// Sets gyro range, readings are scaled accordingly
    pub async fn set_gyro_range(&mut self, range: GyroRange) -> Result<(), Error<E>> {
        self.write_bits(GYRO_CONFIG::ADDR, GYRO_CONFIG::FS_SEL, range as u8)
            .await?;
        self.gyro_range = range;
        Ok(())
    }

    pub async fn get_gyro_range(&mut self) -> Result<GyroRange, Error<E>> {
        let byte = self.read_bits(GYRO_CONFIG::ADDR, GYRO_CONFIG::FS_SEL).await?;
        GyroRange::from_u8(byte).ok_or(Error::InvalidRegisterValue(byte))
    }

    /// Sets accel range, readings are scaled accordingly
    pub async fn set_accel_range(&mut self, range: AccelRange) -> Result<(), Error<E>> {
        self.write_bits(ACCEL_CONFIG::ADDR, ACCEL_CONFIG::FS_SEL, range as u8)
            .await?;
        self.accel_range = range;
        Ok(())
    }

    pub async fn get_accel_range(&mut self) -> Result<AccelRange, Error<E>> {
        let byte = self
            .read_bits(ACCEL_CONFIG::ADDR, ACCEL_CONFIG::FS_SEL)
            .await?;
        AccelRange::from_u8(byte).ok_or(Error::InvalidRegisterValue(byte))
    }

    pub async fn reset_device<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Error<E>> {
        self.write_bit(PWR_MGMT_1::ADDR, PWR_MGMT_1::DEVICE_RESET, true)
            .await?;
        delay.delay_ms(100).await;
        // Note: reset puts the chip back to sleep
        Ok(())
    }

    pub async fn set_sleep_enabled(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.write_bit(PWR_MGMT_1::ADDR, PWR_MGMT_1::SLEEP, enable)
            .await
    }

    pub async fn get_sleep_enabled(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_bit(PWR_MGMT_1::ADDR, PWR_MGMT_1::SLEEP).await? != 0)
    }

    /// TEMP_DIS is a "disabled" bit, 1 turns the sensor off
    pub async fn set_temp_enabled(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.write_bit(PWR_MGMT_1::ADDR, PWR_MGMT_1::TEMP_DIS, !enable)
            .await
    }

    /// Reads three big-endian i16 words starting at `reg`
    async fn read_triple(&mut self, reg: u8) -> Result<Vector3<f32>, Error<E>> {
        let mut buf = [0u8; 6];
        self.read_bytes(reg, &mut buf).await?;

        Ok(Vector3::new(
            i16::from_be_bytes([buf[0], buf[1]]) as f32,
            i16::from_be_bytes([buf[2], buf[3]]) as f32,
            i16::from_be_bytes([buf[4], buf[5]]) as f32,
        ))
    }

    /// Accelerometer readings in g
    pub async fn get_acc(&mut self) -> Result<Vector3<f32>, Error<E>> {
        let acc = self.read_triple(ACC_REGX_H).await?;
        Ok(acc / self.accel_range.sensitivity())
    }

    /// Gyro readings in deg/s
    pub async fn get_gyro(&mut self) -> Result<Vector3<f32>, Error<E>> {
        let gyro = self.read_triple(GYRO_REGX_H).await?;
        Ok(gyro / self.gyro_range.sensitivity())
    }

    /// Die temperature in degrees Celsius
    pub async fn get_temp(&mut self) -> Result<f32, Error<E>> {
        let mut buf = [0u8; 2];
        self.read_bytes(TEMP_OUT_H, &mut buf).await?;
        let raw = i16::from_be_bytes(buf) as f32;

        Ok(raw / TEMP_SENSITIVITY + TEMP_OFFSET)
    }

    pub async fn write_byte(&mut self, reg: u8, byte: u8) -> Result<(), Error<E>> {
        self.i2c
            .write(self.addr, &[reg, byte])
            .await
            .map_err(Error::I2c)
    }

    pub async fn write_bit(&mut self, reg: u8, bit_n: u8, enable: bool) -> Result<(), Error<E>> {
        let mut byte = self.read_byte(reg).await?;
        bits::set_bit(&mut byte, bit_n, enable);
        self.write_byte(reg, byte).await
    }

    pub async fn write_bits(
        &mut self,
        reg: u8,
        block: bits::BitBlock,
        data: u8,
    ) -> Result<(), Error<E>> {
        let mut byte = self.read_byte(reg).await?;
        bits::set_bits(&mut byte, block, data);
        self.write_byte(reg, byte).await
    }

    async fn read_bit(&mut self, reg: u8, bit_n: u8) -> Result<u8, Error<E>> {
        let byte = self.read_byte(reg).await?;
        Ok(bits::get_bit(byte, bit_n))
    }

    pub async fn read_bits(&mut self, reg: u8, block: bits::BitBlock) -> Result<u8, Error<E>> {
        let byte = self.read_byte(reg).await?;
        Ok(bits::get_bits(byte, block))
    }

    pub async fn read_byte(&mut self, reg: u8) -> Result<u8, Error<E>> {
        let mut byte = [0u8; 1];
        self.read_bytes(reg, &mut byte).await?;
        Ok(byte[0])
    }

    pub async fn read_bytes(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), Error<E>> {
        self.i2c
            .write_read(self.addr, &[reg], buf)
            .await
            .map_err(Error::I2c)
    }
}

impl<I2C, E> ImuSource for Mpu6050<I2C>
where
    I2C: I2c<Error = E>,
    E: core::fmt::Debug,
{
    type Error = Error<E>;

    async fn read_accel(&mut self) -> Result<Vector3<f32>, Self::Error> {
        self.get_acc().await
    }

    async fn read_gyro(&mut self) -> Result<Vector3<f32>, Self::Error> {
        self.get_gyro().await
    }
}

#![allow(non_camel_case_types)]

use num_derive::FromPrimitive;

use super::bits::BitBlock;

pub const DEFAULT_MPU6050_ADDR: u8 = 0x68;

pub const WHOAMI_REG: u8 = 0x75;
pub const ACC_REGX_H: u8 = 0x3B;
pub const TEMP_OUT_H: u8 = 0x41;
pub const GYRO_REGX_H: u8 = 0x43;

/// LSB per degree Celsius, register map rev 4.2
pub const TEMP_SENSITIVITY: f32 = 340.0;
pub const TEMP_OFFSET: f32 = 36.53;

pub struct PWR_MGMT_1;

impl PWR_MGMT_1 {
    pub const ADDR: u8 = 0x6B;
    pub const DEVICE_RESET: u8 = 7;
    pub const SLEEP: u8 = 6;
    pub const TEMP_DIS: u8 = 3;
    pub const CLKSEL: BitBlock = BitBlock { bit: 2, length: 3 };
}

pub struct GYRO_CONFIG;

impl GYRO_CONFIG {
    pub const ADDR: u8 = 0x1B;
    pub const FS_SEL: BitBlock = BitBlock { bit: 4, length: 2 };
}

pub struct ACCEL_CONFIG;

impl ACCEL_CONFIG {
    pub const ADDR: u8 = 0x1C;
    pub const FS_SEL: BitBlock = BitBlock { bit: 4, length: 2 };
}

/// Clock source, PWR_MGMT_1 bits 2:0
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum CLKSEL {
    Internal8MHz = 0,
    GyroX = 1,
    GyroY = 2,
    GyroZ = 3,
    External32kHz = 4,
    External19MHz = 5,
    Stop = 7,
}

#[repr(u8)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum AccelRange {
    #[default]
    G2 = 0,
    G4 = 1,
    G8 = 2,
    G16 = 3,
}

impl AccelRange {
    /// LSB per g
    pub fn sensitivity(&self) -> f32 {
        match self {
            AccelRange::G2 => 16384.0,
            AccelRange::G4 => 8192.0,
            AccelRange::G8 => 4096.0,
            AccelRange::G16 => 2048.0,
        }
    }
}

#[repr(u8)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum GyroRange {
    #[default]
    D250 = 0,
    D500 = 1,
    D1000 = 2,
    D2000 = 3,
}

impl GyroRange {
    /// LSB per deg/s
    pub fn sensitivity(&self) -> f32 {
        match self {
            GyroRange::D250 => 131.0,
            GyroRange::D500 => 65.5,
            GyroRange::D1000 => 32.8,
            GyroRange::D2000 => 16.4,
        }
    }
}

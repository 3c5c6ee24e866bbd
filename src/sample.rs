use core::fmt::Debug;

use log::debug;
use nalgebra::Vector3;

/// Source of raw inertial readings, one accelerometer and one gyroscope read
/// per tick. The two reads are independent, either may fail on its own.
pub trait ImuSource {
    type Error: Debug;

    /// Acceleration in g
    #[allow(async_fn_in_trait)]
    async fn read_accel(&mut self) -> Result<Vector3<f32>, Self::Error>;

    /// Angular rate in deg/s
    #[allow(async_fn_in_trait)]
    async fn read_gyro(&mut self) -> Result<Vector3<f32>, Self::Error>;
}

/// Readings of one tick. A channel whose read failed holds zeros and has its
/// `*_ok` flag cleared, previous values are never carried over.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// g
    pub accel: Vector3<f32>,
    /// deg/s
    pub gyro: Vector3<f32>,
    pub accel_ok: bool,
    pub gyro_ok: bool,
}

impl SensorSample {
    pub fn new(accel: Option<Vector3<f32>>, gyro: Option<Vector3<f32>>) -> Self {
        Self {
            accel: accel.unwrap_or_else(Vector3::zeros),
            gyro: gyro.unwrap_or_else(Vector3::zeros),
            accel_ok: accel.is_some(),
            gyro_ok: gyro.is_some(),
        }
    }

    pub fn from_readings<AE: Debug, GE: Debug>(
        accel: Result<Vector3<f32>, AE>,
        gyro: Result<Vector3<f32>, GE>,
    ) -> Self {
        let accel = accel
            .map_err(|err| debug!("Accelerometer read error: {err:?}"))
            .ok();
        let gyro = gyro
            .map_err(|err| debug!("Gyroscope read error: {err:?}"))
            .ok();

        Self::new(accel, gyro)
    }
}

/// Reads both channels once. Never fails, read errors end up as cleared flags.
pub async fn acquire<S: ImuSource>(source: &mut S) -> SensorSample {
    let accel = source.read_accel().await;
    let gyro = source.read_gyro().await;

    SensorSample::from_readings(accel, gyro)
}

use nalgebra::Vector3;
use num_traits::Float;

use crate::orientation::Orientation;

/// Tilt from the gravity vector, `(pitch, roll)` in degrees.
/// No yaw: gravity says nothing about heading.
///
/// A zero vector gives `atan2(0, 0) = 0` for both angles.
pub fn accel_tilt(accel: &Vector3<f32>) -> (f32, f32) {
    let pitch = accel.y.atan2(accel.z);
    let roll = (-accel.x).atan2((accel.y * accel.y + accel.z * accel.z).sqrt());

    (pitch.to_degrees(), roll.to_degrees())
}

/// Complementary filter over pitch and roll.
///
/// `weight` is the share kept from gyro integration each tick, the rest comes
/// from the accelerometer tilt. Yaw is never touched and drifts with the gyro.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplementaryFilter {
    weight: f32,
}

impl ComplementaryFilter {
    pub fn new(weight: f32) -> Self {
        Self { weight }
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn blend(&self, orientation: &mut Orientation, accel: &Vector3<f32>) {
        let (acc_pitch, acc_roll) = accel_tilt(accel);

        orientation.pitch = self.weight * orientation.pitch + (1.0 - self.weight) * acc_pitch;
        orientation.roll = self.weight * orientation.roll + (1.0 - self.weight) * acc_roll;
    }
}

use nalgebra::Vector3;

use crate::sample::SensorSample;

/// Additive offsets for both sensors, subtracted before any other processing.
///
/// Taring *adds* the current corrected reading to the stored offsets rather
/// than replacing them. Offsets start at zero and are never cleared.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BiasCalibrator {
    accel: Vector3<f32>,
    gyro: Vector3<f32>,
}

impl BiasCalibrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accel_offset(&self) -> Vector3<f32> {
        self.accel
    }

    pub fn gyro_offset(&self) -> Vector3<f32> {
        self.gyro
    }

    /// Subtracts the offsets from the channels that were read successfully.
    /// Failed channels keep their zeros.
    pub fn apply(&self, raw: &SensorSample) -> SensorSample {
        let mut sample = *raw;
        if sample.accel_ok {
            sample.accel -= self.accel;
        }
        if sample.gyro_ok {
            sample.gyro -= self.gyro;
        }
        sample
    }

    /// Folds an already corrected sample into the offsets
    pub fn accumulate(&mut self, corrected: &SensorSample) {
        if corrected.accel_ok {
            self.accel += corrected.accel;
        }
        if corrected.gyro_ok {
            self.gyro += corrected.gyro;
        }
    }
}

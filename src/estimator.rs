use log::{debug, trace};
use nalgebra::Vector3;

use crate::{
    calibration::BiasCalibrator,
    clock::Clock,
    config::EstimatorConfig,
    filter::LowPassFilter,
    fusion::ComplementaryFilter,
    integrator::Integrator,
    orientation::Orientation,
    sample::{acquire, ImuSource, SensorSample},
};

/// Gyro integration with accelerometer tilt correction.
///
/// Per tick: bias correction, low-pass on the gyro, integration over the time
/// since the last good gyro read, then the complementary blend on pitch and
/// roll if the accelerometer was read too. A tick with a failed gyro read
/// changes nothing but the recorded sample.
///
/// `update` and `calibrate` take `&mut self`, callers sharing an estimator
/// between tasks have to serialize access themselves.
pub struct OrientationEstimator<C> {
    clock: C,
    bias: BiasCalibrator,
    gyro_filter: LowPassFilter,
    integrator: Integrator,
    fusion: ComplementaryFilter,
    orientation: Orientation,
    last_sample: SensorSample,
}

impl<C: Clock> OrientationEstimator<C> {
    pub fn new(clock: C, config: EstimatorConfig) -> Self {
        let integrator = Integrator::new(clock.now());
        Self {
            clock,
            bias: BiasCalibrator::new(),
            gyro_filter: LowPassFilter::new(config.gyro_smoothing),
            integrator,
            fusion: ComplementaryFilter::new(config.fusion_weight),
            orientation: Orientation::ZERO,
            last_sample: SensorSample::default(),
        }
    }

    /// Reads one sample from `source` and feeds it through [`Self::update`]
    pub async fn tick<S: ImuSource>(&mut self, source: &mut S) -> Orientation {
        let sample = acquire(source).await;
        self.update(&sample)
    }

    pub fn update(&mut self, raw: &SensorSample) -> Orientation {
        let sample = self.bias.apply(raw);
        self.last_sample = sample;

        if !sample.gyro_ok {
            trace!("No gyro reading, orientation held");
            return self.orientation;
        }

        let rate = self.gyro_filter.update(&sample.gyro);
        let dt = self
            .integrator
            .integrate(&mut self.orientation, &rate, self.clock.now());

        if sample.accel_ok {
            self.fusion.blend(&mut self.orientation, &sample.accel);
        }

        trace!(
            "dt: {dt}s, pitch: {}, roll: {}, yaw: {}",
            self.orientation.pitch,
            self.orientation.roll,
            self.orientation.yaw
        );

        self.orientation
    }

    /// Tare: adds the last corrected sample to the bias offsets, zeroes the
    /// orientation and the gyro filter, and restarts integration from now.
    pub fn calibrate(&mut self) {
        self.bias.accumulate(&self.last_sample);
        self.orientation = Orientation::ZERO;
        self.gyro_filter.reset();
        self.integrator.restart(self.clock.now());

        let accel = self.bias.accel_offset();
        let gyro = self.bias.gyro_offset();
        debug!(
            "Tare, accel bias: [{}, {}, {}], gyro bias: [{}, {}, {}]",
            accel.x, accel.y, accel.z, gyro.x, gyro.y, gyro.z
        );
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Bias corrected readings of the latest tick
    pub fn last_sample(&self) -> &SensorSample {
        &self.last_sample
    }

    pub fn bias(&self) -> &BiasCalibrator {
        &self.bias
    }

    pub fn filtered_gyro(&self) -> Vector3<f32> {
        self.gyro_filter.output()
    }
}

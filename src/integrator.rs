use embassy_time::Instant;
use nalgebra::Vector3;

use crate::orientation::Orientation;

/// Rectangular integration of angular rate into Euler angles.
///
/// `dt` is measured from the previous successful gyro read, or from the
/// instant the integrator was (re)started.
#[derive(Debug, Clone)]
pub struct Integrator {
    last_update: Instant,
}

impl Integrator {
    pub fn new(now: Instant) -> Self {
        Self { last_update: now }
    }

    pub fn restart(&mut self, now: Instant) {
        self.last_update = now;
    }

    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    /// Advances `orientation` by `rate` (deg/s) over the time since the last
    /// step. Returns the step length in seconds.
    pub fn integrate(
        &mut self,
        orientation: &mut Orientation,
        rate: &Vector3<f32>,
        now: Instant,
    ) -> f32 {
        let dt = now.saturating_duration_since(self.last_update).as_micros() as f32 / 1e6;
        self.last_update = now;

        orientation.pitch += rate.x * dt;
        orientation.roll += rate.y * dt;
        orientation.yaw += rate.z * dt;

        dt
    }
}

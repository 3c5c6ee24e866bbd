use nalgebra::Vector3;

/// Single-pole exponential smoothing, one pole per axis:
/// `out = out * (1 - alpha) + raw * alpha`.
///
/// There's no notion of elapsed time here, so the effective cutoff moves with
/// the sample rate. Changing the tick period changes how sluggish the gyro is.
#[derive(Debug, Clone, PartialEq)]
pub struct LowPassFilter {
    alpha: f32,
    state: Vector3<f32>,
}

impl LowPassFilter {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            state: Vector3::zeros(),
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn update(&mut self, raw: &Vector3<f32>) -> Vector3<f32> {
        self.state = self.state * (1.0 - self.alpha) + raw * self.alpha;
        self.state
    }

    pub fn output(&self) -> Vector3<f32> {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = Vector3::zeros();
    }
}

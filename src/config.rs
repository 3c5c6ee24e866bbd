use crate::orientation::Orientation;

/// Share of the new gyro reading taken by the low-pass filter each tick
pub const DEFAULT_GYRO_SMOOTHING: f32 = 0.1;

/// Share of gyro-integrated pitch/roll kept by the complementary filter
pub const DEFAULT_FUSION_WEIGHT: f32 = 0.98;

/// Fixed camera used to draw the world frame on screen
pub const VIEW_ANGLES: Orientation = Orientation::new(-30.0, -70.0, -60.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorConfig {
    pub gyro_smoothing: f32,
    pub fusion_weight: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            gyro_smoothing: DEFAULT_GYRO_SMOOTHING,
            fusion_weight: DEFAULT_FUSION_WEIGHT,
        }
    }
}

impl EstimatorConfig {
    /// Clamped into `[0, 1]`
    pub fn with_gyro_smoothing(mut self, alpha: f32) -> Self {
        self.gyro_smoothing = alpha.clamp(0.0, 1.0);
        self
    }

    /// Clamped into `[0, 1]`
    pub fn with_fusion_weight(mut self, weight: f32) -> Self {
        self.fusion_weight = weight.clamp(0.0, 1.0);
        self
    }
}

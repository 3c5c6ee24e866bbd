use crate::rotation::{rotate, Point3D};

/// Euler angles in degrees.
///
/// Values are never wrapped, a full turn about any axis just keeps adding
/// 360 to the accumulated angle.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub pitch: f32,
    pub roll: f32,
    pub yaw: f32,
}

impl Orientation {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(pitch: f32, roll: f32, yaw: f32) -> Self {
        Self { pitch, roll, yaw }
    }

    /// Maps a point through this orientation, see [`rotate`]
    pub fn rotate(&self, point: Point3D) -> Point3D {
        rotate(point, self.pitch, self.roll, self.yaw)
    }
}

use nalgebra::{Vector2, Vector3};
use num_traits::Float;

use crate::orientation::Orientation;

pub type Point3D = Vector3<f32>;

/// Rotates `point` by three chained single-axis rotations, angles in degrees.
///
/// Order is fixed: pitch around X (mixes y, z), then roll around Y (mixes x, z),
/// then yaw around Z (mixes x, y). The steps don't commute, so
/// `rotate(rotate(p, a, b, c), -c, -b, -a)` is not `p` in general.
pub fn rotate(point: Point3D, pitch: f32, roll: f32, yaw: f32) -> Point3D {
    let (sin_p, cos_p) = pitch.to_radians().sin_cos();
    let (sin_r, cos_r) = roll.to_radians().sin_cos();
    let (sin_y, cos_y) = yaw.to_radians().sin_cos();

    let [x, y, z]: [f32; 3] = point.into();

    // Pitch
    let (y, z) = (y * cos_p - z * sin_p, y * sin_p + z * cos_p);
    // Roll
    let (x, z) = (x * cos_r + z * sin_r, -x * sin_r + z * cos_r);
    // Yaw
    let (x, y) = (x * cos_y - y * sin_y, x * sin_y + y * cos_y);

    Point3D::new(x, y, z)
}

/// Orthographic projection: rotate by the `view` angles and drop depth
pub fn project(point: Point3D, view: &Orientation) -> Vector2<f32> {
    let rotated = view.rotate(point);
    Vector2::new(rotated.x, rotated.y)
}

#![cfg_attr(not(test), no_std)]
#![deny(unused_must_use)]

//! Pitch/roll/yaw estimation for a wrist-worn 6-axis IMU, plus the rotation
//! helpers used to draw that orientation.

pub mod calibration;
pub mod clock;
pub mod config;
pub mod estimator;
pub mod filter;
pub mod fusion;
pub mod gizmo;
pub mod integrator;
pub mod mpu6050;
pub mod orientation;
pub mod rotation;
pub mod sample;

pub use estimator::OrientationEstimator;
pub use orientation::Orientation;
pub use rotation::{project, rotate, Point3D};
pub use sample::{acquire, ImuSource, SensorSample};

//! Sensor fusion: turns accelerometer and magnetometer samples into shake
//! events and orientation-image decisions.

pub mod classifier;
pub mod rotation;

pub use classifier::{OrientationClassifier, OrientationEvent};
pub use rotation::RotationMatrix;

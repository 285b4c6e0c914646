use mascot_types::{Orientation, ScreenRotation, Vec3};

use crate::error::SensorError;

/// Standard gravity, m/s².
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// Gravity readings weaker than this fraction of g (squared) are treated as free fall.
const FREE_FALL_RATIO_SQUARED: f32 = 0.01;

/// Minimum magnitude of `field × gravity` for a usable heading.
const MIN_HORIZONTAL_FIELD: f32 = 0.1;

/// Row-major 3×3 rotation from the device frame to the world frame
/// (east, north, up).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix(pub [f32; 9]);

/// For each output column: (source column, sign).
type AxisRemap = [(usize, f32); 3];

const REMAP_0: AxisRemap = [(0, 1.0), (1, 1.0), (2, 1.0)];
const REMAP_90: AxisRemap = [(1, -1.0), (0, 1.0), (2, 1.0)];
const REMAP_180: AxisRemap = [(0, -1.0), (1, -1.0), (2, 1.0)];
const REMAP_270: AxisRemap = [(1, 1.0), (0, -1.0), (2, 1.0)];

impl RotationMatrix {
    /// Build the rotation from a gravity (accelerometer) and a magnetic field
    /// vector, both in device coordinates.
    pub fn from_gravity_and_field(gravity: Vec3, field: Vec3) -> Result<Self, SensorError> {
        let g_sq = gravity.length_squared();
        if g_sq < FREE_FALL_RATIO_SQUARED * STANDARD_GRAVITY * STANDARD_GRAVITY {
            return Err(SensorError::FreeFall);
        }

        let east = field.cross(gravity);
        let east_len = east.length();
        if east_len < MIN_HORIZONTAL_FIELD {
            return Err(SensorError::DegenerateField);
        }
        let east = east * (1.0 / east_len);
        let up = gravity * (1.0 / g_sq.sqrt());
        let north = up.cross(east);

        Ok(Self([
            east.x, east.y, east.z, //
            north.x, north.y, north.z, //
            up.x, up.y, up.z,
        ]))
    }

    /// Re-express the matrix for a screen rotated by `rotation`, so that the
    /// angles are relative to what the user sees as "up".
    pub fn remap(&self, rotation: ScreenRotation) -> Self {
        let table = match rotation {
            ScreenRotation::Deg0 => &REMAP_0,
            ScreenRotation::Deg90 => &REMAP_90,
            ScreenRotation::Deg180 => &REMAP_180,
            ScreenRotation::Deg270 => &REMAP_270,
        };
        let mut out = [0.0; 9];
        for row in 0..3 {
            for (col, &(src, sign)) in table.iter().enumerate() {
                out[row * 3 + col] = sign * self.0[row * 3 + src];
            }
        }
        Self(out)
    }

    /// Yaw/pitch/roll in degrees. Yaw is wrapped into `[0, 360)`.
    pub fn orientation(&self) -> Orientation {
        let r = &self.0;
        let yaw = r[1].atan2(r[4]).to_degrees();
        let pitch = (-r[7]).clamp(-1.0, 1.0).asin().to_degrees();
        let roll = (-r[6]).atan2(r[8]).to_degrees();
        Orientation {
            yaw: wrap_degrees(yaw),
            pitch,
            roll,
        }
    }
}

fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

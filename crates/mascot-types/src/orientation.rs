use crate::asset::AssetId;
use crate::error::ModelError;

/// Closed interval of angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    min: f32,
    max: f32,
}

impl AngleRange {
    /// Every yaw value, `[0, 360]`.
    pub const ANY_YAW: Self = Self {
        min: 0.0,
        max: 360.0,
    };
    /// Every pitch or roll value, `[-180, 180]`.
    pub const ANY_TILT: Self = Self {
        min: -180.0,
        max: 180.0,
    };

    pub fn new(min: f32, max: f32) -> Result<Self, ModelError> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(ModelError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    #[inline]
    pub fn contains(&self, degrees: f32) -> bool {
        self.min <= degrees && degrees <= self.max
    }
}

/// Device attitude in degrees: yaw in `[0, 360)`, pitch and roll in `[-180, 180]`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// Maps a yaw/pitch/roll box to a special image.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationRule {
    pub target_image: AssetId,
    pub yaw: AngleRange,
    pub pitch: AngleRange,
    pub roll: AngleRange,
}

impl OrientationRule {
    pub fn new(
        target_image: impl Into<AssetId>,
        yaw: AngleRange,
        pitch: AngleRange,
        roll: AngleRange,
    ) -> Self {
        Self {
            target_image: target_image.into(),
            yaw,
            pitch,
            roll,
        }
    }

    /// All three axes must fall inside their ranges.
    pub fn matches(&self, orientation: &Orientation) -> bool {
        self.yaw.contains(orientation.yaw)
            && self.pitch.contains(orientation.pitch)
            && self.roll.contains(orientation.roll)
    }
}

/// The four cardinal screen rotations reported by the display.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenRotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl ScreenRotation {
    pub fn degrees(self) -> u32 {
        match self {
            ScreenRotation::Deg0 => 0,
            ScreenRotation::Deg90 => 90,
            ScreenRotation::Deg180 => 180,
            ScreenRotation::Deg270 => 270,
        }
    }
}

impl TryFrom<u32> for ScreenRotation {
    type Error = ModelError;

    fn try_from(degrees: u32) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(ScreenRotation::Deg0),
            90 => Ok(ScreenRotation::Deg90),
            180 => Ok(ScreenRotation::Deg180),
            270 => Ok(ScreenRotation::Deg270),
            other => Err(ModelError::InvalidRotation(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn range(min: f32, max: f32) -> AngleRange {
        AngleRange::new(min, max).unwrap()
    }

    #[test]
    fn range_is_closed() {
        let r = range(-10.0, 10.0);
        assert!(r.contains(-10.0));
        assert!(r.contains(10.0));
        assert!(!r.contains(10.001));
    }

    #[test]
    fn inverted_range_rejected() {
        assert!(AngleRange::new(5.0, -5.0).is_err());
        assert!(AngleRange::new(f32::NAN, 0.0).is_err());
    }

    #[test]
    fn rule_needs_all_axes() {
        let rule = OrientationRule::new(
            "upside",
            AngleRange::ANY_YAW,
            range(60.0, 120.0),
            range(-30.0, 30.0),
        );
        let inside = Orientation {
            yaw: 200.0,
            pitch: 90.0,
            roll: 0.0,
        };
        let outside_roll = Orientation {
            roll: 45.0,
            ..inside
        };
        assert!(rule.matches(&inside));
        assert!(!rule.matches(&outside_roll));
    }

    #[test]
    fn rotation_from_degrees() {
        assert_eq!(ScreenRotation::try_from(270).unwrap(), ScreenRotation::Deg270);
        assert_eq!(ScreenRotation::Deg90.degrees(), 90);
        assert_eq!(
            ScreenRotation::try_from(45),
            Err(ModelError::InvalidRotation(45))
        );
    }

    proptest! {
        #[test]
        fn any_ranges_match_every_valid_orientation(
            yaw in 0.0f32..360.0,
            pitch in -180.0f32..=180.0,
            roll in -180.0f32..=180.0,
        ) {
            let rule = OrientationRule::new(
                "any",
                AngleRange::ANY_YAW,
                AngleRange::ANY_TILT,
                AngleRange::ANY_TILT,
            );
            let orientation = Orientation { yaw, pitch, roll };
            prop_assert!(rule.matches(&orientation));
        }

        #[test]
        fn contains_agrees_with_bounds(
            a in -180.0f32..180.0,
            b in -180.0f32..180.0,
            x in -200.0f32..200.0,
        ) {
            let r = range(a.min(b), a.max(b));
            prop_assert_eq!(r.contains(x), r.min() <= x && x <= r.max());
        }
    }
}

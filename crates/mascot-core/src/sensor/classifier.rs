use mascot_types::{AssetId, Orientation, OrientationRule, ScreenRotation, Vec3};

use super::rotation::RotationMatrix;
use crate::error::SensorError;

/// Magnetic field assumed until the first magnetometer sample arrives.
pub const DEFAULT_MAGNETIC_FIELD: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Change of the orientation-driven image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrientationEvent {
    /// A rule matched; show its image.
    Special(AssetId),
    /// No rule matches any more; go back to the default image.
    Revert,
}

/// Converts raw acceleration and magnetic-field samples into shake events and
/// a stable orientation-image decision.
///
/// Rules are scanned in the order given and the first match wins, so
/// overlapping rules resolve the same way on every call.
#[derive(Debug, Clone)]
pub struct OrientationClassifier {
    shake_threshold: f32,
    last_acceleration: Option<Vec3>,
    last_magnetic_field: Vec3,
    stable_acceleration: Option<Vec3>,
    current_special_image: Option<AssetId>,
}

impl OrientationClassifier {
    pub fn new(shake_threshold: f32) -> Self {
        Self {
            shake_threshold,
            last_acceleration: None,
            last_magnetic_field: DEFAULT_MAGNETIC_FIELD,
            stable_acceleration: None,
            current_special_image: None,
        }
    }

    /// Feed an accelerometer sample. Returns `true` when it counts as a shake.
    ///
    /// A sample of exactly `(0, 0, 0)` is a warm-up artifact: it neither moves
    /// the shake baseline nor triggers a shake. The raw sample is kept for the
    /// rotation estimate either way.
    pub fn on_acceleration(&mut self, sample: Vec3) -> bool {
        self.last_acceleration = Some(sample);
        if sample.is_exact_zero() {
            return false;
        }

        let shaken = self
            .stable_acceleration
            .is_some_and(|prev| sample.abs_diff(prev).max_component() > self.shake_threshold);
        self.stable_acceleration = Some(sample);
        if shaken {
            log::debug!(
                "Shake detected: {sample:?} (threshold {})",
                self.shake_threshold
            );
        }
        shaken
    }

    pub fn on_magnetic_field(&mut self, sample: Vec3) {
        self.last_magnetic_field = sample;
    }

    /// Current device attitude as seen from a screen rotated by `rotation`.
    pub fn orientation(&self, rotation: ScreenRotation) -> Result<Orientation, SensorError> {
        let gravity = self.last_acceleration.ok_or(SensorError::NoAcceleration)?;
        let matrix = RotationMatrix::from_gravity_and_field(gravity, self.last_magnetic_field)?;
        Ok(matrix.remap(rotation).orientation())
    }

    /// Match the current attitude against `rules`.
    ///
    /// Returns an event only when the decision changes: a new matching image,
    /// or the first miss after a match. `None` means "nothing changed", not
    /// "no special image": a rule that keeps matching returns `None` after its
    /// first `Special`. Ask [`current_special_image`](Self::current_special_image)
    /// for the image currently in effect.
    pub fn classify(
        &mut self,
        rotation: ScreenRotation,
        rules: &[OrientationRule],
    ) -> Result<Option<OrientationEvent>, SensorError> {
        let orientation = self.orientation(rotation)?;
        let matched = rules
            .iter()
            .find(|rule| rule.matches(&orientation))
            .map(|rule| &rule.target_image);

        let event = match matched {
            Some(image) if self.current_special_image.as_ref() == Some(image) => None,
            Some(image) => {
                log::debug!("Orientation {orientation:?} matched {image}");
                self.current_special_image = Some(image.clone());
                Some(OrientationEvent::Special(image.clone()))
            }
            None if self.current_special_image.is_some() => {
                log::debug!("Orientation {orientation:?} left special image");
                self.current_special_image = None;
                Some(OrientationEvent::Revert)
            }
            None => None,
        };
        Ok(event)
    }

    /// Forget the current special image without emitting a revert, e.g. when
    /// an animation takes over the display.
    pub fn reset_special_image(&mut self) {
        self.current_special_image = None;
    }

    pub fn current_special_image(&self) -> Option<&AssetId> {
        self.current_special_image.as_ref()
    }

    pub fn stable_acceleration(&self) -> Option<Vec3> {
        self.stable_acceleration
    }
}

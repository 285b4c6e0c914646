use crate::asset::AssetId;
use crate::error::ModelError;

/// One step of an animation: show `image` for `duration_factor` times the
/// animation's base interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub image: AssetId,
    pub duration_factor: f32,
}

impl Frame {
    pub fn new(image: impl Into<AssetId>, duration_factor: f32) -> Self {
        Self {
            image: image.into(),
            duration_factor,
        }
    }
}

/// Ordered frame list played `repeat_count` times.
///
/// Constructed only through [`Animation::new`], which guarantees at least one
/// frame, `repeat_count >= 1` and strictly positive duration factors.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    id: AssetId,
    frames: Vec<Frame>,
    repeat_count: u32,
    base_interval_ms: u32,
    visible_in_menu: bool,
    sound: Option<AssetId>,
}

impl Animation {
    pub fn new(
        id: impl Into<AssetId>,
        frames: Vec<Frame>,
        repeat_count: u32,
        base_interval_ms: u32,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if frames.is_empty() {
            return Err(ModelError::EmptyFrames {
                animation: id.to_string(),
            });
        }
        if repeat_count == 0 {
            return Err(ModelError::ZeroRepeat {
                animation: id.to_string(),
            });
        }
        if let Some((index, frame)) = frames
            .iter()
            .enumerate()
            .find(|(_, f)| !(f.duration_factor.is_finite() && f.duration_factor > 0.0))
        {
            return Err(ModelError::InvalidDurationFactor {
                animation: id.to_string(),
                index,
                factor: frame.duration_factor,
            });
        }
        Ok(Self {
            id,
            frames,
            repeat_count,
            base_interval_ms,
            visible_in_menu: false,
            sound: None,
        })
    }

    pub fn with_menu_visibility(mut self, visible: bool) -> Self {
        self.visible_in_menu = visible;
        self
    }

    /// Sound started together with the first frame.
    pub fn with_sound(mut self, sound: impl Into<AssetId>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    pub fn id(&self) -> &AssetId {
        &self.id
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    pub fn base_interval_ms(&self) -> u32 {
        self.base_interval_ms
    }

    pub fn visible_in_menu(&self) -> bool {
        self.visible_in_menu
    }

    pub fn sound(&self) -> Option<&AssetId> {
        self.sound.as_ref()
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use mascot_types::{Animation, AssetId};

use crate::cache::ResourceCache;
use crate::error::AnimationError;

/// One concrete step of a playback sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackFrame {
    pub image: AssetId,
    pub duration_ms: u64,
}

/// Expands animation descriptors into playback sequences, memoized per animation id.
///
/// Expansions are only valid for the theme they were built from; the theme
/// loader clears them on every switch.
#[derive(Debug, Default)]
pub struct AnimationSequencer {
    expansions: HashMap<AssetId, Arc<[PlaybackFrame]>>,
}

impl AnimationSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build (or return the memoized) playback sequence for `animation`.
    ///
    /// The frames repeat `repeat_count` times and are followed by one frame of
    /// `idle_image` lasting the base interval. Every image involved must be
    /// cached; a single missing image fails the whole expansion.
    pub fn expand(
        &mut self,
        animation: &Animation,
        idle_image: &AssetId,
        cache: &ResourceCache,
    ) -> Result<Arc<[PlaybackFrame]>, AnimationError> {
        if let Some(sequence) = self.expansions.get(animation.id()) {
            return Ok(Arc::clone(sequence));
        }

        let missing = animation
            .frames()
            .iter()
            .map(|f| &f.image)
            .chain(std::iter::once(idle_image))
            .find(|image| !cache.contains(image.as_str()));
        if let Some(image) = missing {
            return Err(AnimationError::MissingAsset {
                animation: animation.id().clone(),
                image: image.clone(),
            });
        }

        let base = animation.base_interval_ms();
        let repeats = animation.repeat_count() as usize;
        let mut frames = Vec::with_capacity(repeats * animation.frames().len() + 1);
        for _ in 0..repeats {
            frames.extend(animation.frames().iter().map(|f| PlaybackFrame {
                image: f.image.clone(),
                duration_ms: (f64::from(base) * f64::from(f.duration_factor)).round() as u64,
            }));
        }
        frames.push(PlaybackFrame {
            image: idle_image.clone(),
            duration_ms: u64::from(base),
        });

        let sequence: Arc<[PlaybackFrame]> = frames.into();
        log::debug!(
            "Expanded animation {} into {} frames",
            animation.id(),
            sequence.len()
        );
        self.expansions
            .insert(animation.id().clone(), Arc::clone(&sequence));
        Ok(sequence)
    }

    /// Forget every expansion.
    pub fn clear(&mut self) {
        self.expansions.clear();
    }

    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }
}

/// Total playing time of a sequence.
pub fn sequence_duration_ms(sequence: &[PlaybackFrame]) -> u64 {
    sequence.iter().map(|f| f.duration_ms).sum()
}

use mascot_types::{AssetId, Theme};

use crate::cache::ResourceCache;
use crate::error::{CacheError, ThemeError};
use crate::sequencer::AnimationSequencer;
use crate::traits::decoder::AssetDecoder;

/// Everything a presentation session keeps resident for its current theme.
///
/// Owned by exactly one party at a time: the controller while a theme is
/// shown, the loader thread while a switch runs.
#[derive(Debug, Default)]
pub struct SessionResources {
    pub cache: ResourceCache,
    pub sequencer: AnimationSequencer,
}

/// Incremental progress of a theme switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadProgress {
    pub done: usize,
    pub total: usize,
    pub label: String,
}

/// Loads all assets of a theme into a session's cache, replacing the previous theme.
pub struct ThemeLoader<'a> {
    decoder: &'a dyn AssetDecoder,
}

impl<'a> ThemeLoader<'a> {
    pub fn new(decoder: &'a dyn AssetDecoder) -> Self {
        Self { decoder }
    }

    /// Reject themes that could leave the display without an image.
    pub fn validate(theme: &Theme) -> Result<(), ThemeError> {
        if theme.images.is_empty() {
            return Err(ThemeError::InvalidTheme {
                theme: theme.id.clone(),
                reason: "theme has no images".to_string(),
            });
        }
        if !theme.images.contains_key(&theme.default_image) {
            return Err(ThemeError::InvalidTheme {
                theme: theme.id.clone(),
                reason: format!("default image {} is not defined", theme.default_image),
            });
        }
        Ok(())
    }

    /// Progress units for a theme: two per image (load and prepare), one per sound.
    pub fn progress_total(theme: &Theme) -> usize {
        theme.images.len() * 2 + theme.sounds.len()
    }

    /// Replace whatever the session holds with the assets of `next`.
    ///
    /// `next` is validated before anything is evicted. Images load before
    /// sounds, each in id order. On failure the assets loaded so far stay in
    /// the cache and the caller decides what to show instead.
    pub fn switch_theme(
        &self,
        resources: &mut SessionResources,
        previous: Option<&Theme>,
        next: &Theme,
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<(), ThemeError> {
        Self::validate(next)?;

        let evicted = resources.cache.evict_all();
        resources.sequencer.clear();
        match previous {
            Some(prev) => log::info!(
                "Switching theme {} -> {} ({evicted} assets released)",
                prev.id,
                next.id
            ),
            None => log::info!("Loading theme {}", next.id),
        }

        let total = Self::progress_total(next);
        let image_units = next.images.len() * 2;
        let decoder = self.decoder;
        let wrap = |source: CacheError| ThemeError::Decode {
            theme: next.id.clone(),
            source,
        };

        resources
            .cache
            .load_all(
                next.images.keys(),
                |id: &AssetId, subsample| decoder.decode_image(&next.images[id].source, subsample),
                |id, n, _| {
                    progress(LoadProgress {
                        done: n * 2,
                        total,
                        label: format!("image {id}"),
                    })
                },
            )
            .map_err(wrap)?;

        resources
            .cache
            .load_all(
                next.sounds.keys(),
                |id: &AssetId, _| decoder.decode_sound(&next.sounds[id].source),
                |id, n, _| {
                    progress(LoadProgress {
                        done: image_units + n,
                        total,
                        label: format!("sound {id}"),
                    })
                },
            )
            .map_err(wrap)?;

        log::info!(
            "Theme {} ready: {} assets, {} bytes",
            next.id,
            resources.cache.len(),
            resources.cache.resident_bytes()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockDecoder, cat_theme, dog_theme};
    use std::collections::BTreeSet;

    fn cached_ids(resources: &SessionResources) -> BTreeSet<String> {
        resources.cache.ids().map(|id| id.to_string()).collect()
    }

    fn theme_ids(theme: &Theme) -> BTreeSet<String> {
        theme.asset_ids().map(|id| id.to_string()).collect()
    }

    #[test]
    fn switch_replaces_previous_assets() {
        let decoder = MockDecoder::new();
        let loader = ThemeLoader::new(&decoder);
        let mut resources = SessionResources::default();
        let cat = cat_theme();
        let dog = dog_theme();

        loader
            .switch_theme(&mut resources, None, &cat, &mut |_| {})
            .unwrap();
        assert_eq!(cached_ids(&resources), theme_ids(&cat));

        loader
            .switch_theme(&mut resources, Some(&cat), &dog, &mut |_| {})
            .unwrap();
        assert_eq!(cached_ids(&resources), theme_ids(&dog));
    }

    #[test]
    fn progress_is_monotonic_and_weights_images_double() {
        let decoder = MockDecoder::new();
        let loader = ThemeLoader::new(&decoder);
        let mut resources = SessionResources::default();
        let cat = cat_theme();
        let mut events = Vec::new();

        loader
            .switch_theme(&mut resources, None, &cat, &mut |p| events.push(p))
            .unwrap();

        let total = cat.images.len() * 2 + cat.sounds.len();
        assert_eq!(events.len(), cat.images.len() + cat.sounds.len());
        assert!(events.iter().all(|p| p.total == total));
        assert!(events.windows(2).all(|w| w[0].done < w[1].done));
        assert_eq!(events[0].done, 2);
        assert!(events[0].label.starts_with("image"));
        assert_eq!(events.last().unwrap().done, total);
        assert!(events.last().unwrap().label.starts_with("sound"));
    }

    #[test]
    fn empty_theme_rejected_before_eviction() {
        let decoder = MockDecoder::new();
        let loader = ThemeLoader::new(&decoder);
        let mut resources = SessionResources::default();
        let cat = cat_theme();
        loader
            .switch_theme(&mut resources, None, &cat, &mut |_| {})
            .unwrap();

        let empty = Theme::builder("void", "idle").build();
        let err = loader
            .switch_theme(&mut resources, Some(&cat), &empty, &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, ThemeError::InvalidTheme { .. }));
        assert_eq!(cached_ids(&resources), theme_ids(&cat));
    }

    #[test]
    fn missing_default_image_is_invalid() {
        let theme = Theme::builder("odd", "idle").image("walk", "odd/walk.png").build();
        let err = ThemeLoader::validate(&theme).unwrap_err();
        assert!(matches!(
            err,
            ThemeError::InvalidTheme { ref reason, .. } if reason.contains("idle")
        ));
    }

    #[test]
    fn decode_failure_reports_theme_and_keeps_partial_entries() {
        let decoder = MockDecoder::new().failing("cat/walk2.png");
        let loader = ThemeLoader::new(&decoder);
        let mut resources = SessionResources::default();
        let cat = cat_theme();

        let err = loader
            .switch_theme(&mut resources, None, &cat, &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, ThemeError::Decode { ref theme, .. } if theme == "cat"));
        assert!(resources.cache.contains("idle"));
        assert!(!resources.cache.contains("walk2"));
    }
}

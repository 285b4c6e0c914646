use std::collections::BTreeMap;

use crate::animation::Animation;
use crate::asset::{AssetId, Image, Sound, SourceRef};
use crate::orientation::OrientationRule;

/// A self-contained bundle of images, animations, sounds and orientation rules.
///
/// Maps are ordered by asset id so that iteration, and therefore load order
/// and progress numbering, is deterministic. Orientation rules keep the
/// order in which the catalog defined them.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub id: String,
    /// Idle image shown when nothing else is playing.
    pub default_image: AssetId,
    pub images: BTreeMap<AssetId, Image>,
    pub animations: BTreeMap<AssetId, Animation>,
    pub sounds: BTreeMap<AssetId, Sound>,
    pub orientation_rules: Vec<OrientationRule>,
    pub touch_animation: Option<AssetId>,
    pub shake_animation: Option<AssetId>,
}

impl Theme {
    pub fn builder(id: impl Into<String>, default_image: impl Into<AssetId>) -> ThemeBuilder {
        ThemeBuilder::new(id, default_image)
    }

    pub fn animation(&self, id: &str) -> Option<&Animation> {
        self.animations.get(id)
    }

    /// Animations flagged for the menu, in id order.
    pub fn menu_animations(&self) -> impl Iterator<Item = &Animation> {
        self.animations.values().filter(|a| a.visible_in_menu())
    }

    /// Images first, then sounds.
    pub fn asset_ids(&self) -> impl Iterator<Item = &AssetId> {
        self.images.keys().chain(self.sounds.keys())
    }
}

pub struct ThemeBuilder {
    theme: Theme,
}

impl ThemeBuilder {
    pub fn new(id: impl Into<String>, default_image: impl Into<AssetId>) -> Self {
        Self {
            theme: Theme {
                id: id.into(),
                default_image: default_image.into(),
                images: BTreeMap::new(),
                animations: BTreeMap::new(),
                sounds: BTreeMap::new(),
                orientation_rules: Vec::new(),
                touch_animation: None,
                shake_animation: None,
            },
        }
    }

    pub fn image(mut self, id: impl Into<AssetId>, source: impl Into<SourceRef>) -> Self {
        let id = id.into();
        self.theme.images.insert(
            id.clone(),
            Image {
                id,
                source: source.into(),
            },
        );
        self
    }

    pub fn sound(mut self, id: impl Into<AssetId>, source: impl Into<SourceRef>) -> Self {
        let id = id.into();
        self.theme.sounds.insert(
            id.clone(),
            Sound {
                id,
                source: source.into(),
            },
        );
        self
    }

    pub fn animation(mut self, animation: Animation) -> Self {
        self.theme
            .animations
            .insert(animation.id().clone(), animation);
        self
    }

    pub fn rule(mut self, rule: OrientationRule) -> Self {
        self.theme.orientation_rules.push(rule);
        self
    }

    pub fn touch_animation(mut self, id: impl Into<AssetId>) -> Self {
        self.theme.touch_animation = Some(id.into());
        self
    }

    pub fn shake_animation(mut self, id: impl Into<AssetId>) -> Self {
        self.theme.shake_animation = Some(id.into());
        self
    }

    pub fn build(self) -> Theme {
        self.theme
    }
}

//! Built-in themes and collaborators for running the engine without a UI.

use mascot_core::traits::{AssetDecoder, MemoryCatalog, PresentationListener};
use mascot_core::{DecodeError, ThemeError};
use mascot_types::{
    AngleRange, Animation, AssetId, DecodedAsset, DecodedKind, Frame, ModelError, OrientationRule,
    SourceRef, Theme,
};

/// Edge length of a synthetic image at full resolution.
const FULL_EDGE: u32 = 256;
const SOUND_BYTES: usize = 8 * 1024;

/// Decoder producing blank buffers, optionally refusing anything larger than
/// `memory_budget` bytes to exercise the subsampling retries.
#[derive(Debug, Default, Clone)]
pub struct SyntheticDecoder {
    memory_budget: Option<usize>,
}

impl SyntheticDecoder {
    pub fn new(memory_budget: Option<usize>) -> Self {
        Self { memory_budget }
    }

    fn check_budget(
        &self,
        source: &SourceRef,
        bytes: usize,
        subsample: u32,
    ) -> Result<(), DecodeError> {
        match self.memory_budget {
            Some(budget) if bytes > budget => Err(DecodeError::OutOfMemory {
                source_ref: source.as_str().to_string(),
                subsample,
            }),
            _ => Ok(()),
        }
    }
}

impl AssetDecoder for SyntheticDecoder {
    fn decode_image(
        &self,
        source: &SourceRef,
        subsample: u32,
    ) -> Result<DecodedAsset, DecodeError> {
        let edge = (FULL_EDGE / subsample.max(1)).max(1);
        let bytes = (edge * edge * 4) as usize;
        self.check_budget(source, bytes, subsample)?;
        Ok(DecodedAsset::image(edge, edge, subsample, vec![0u8; bytes]))
    }

    fn decode_sound(&self, source: &SourceRef) -> Result<DecodedAsset, DecodeError> {
        if !source.as_str().ends_with(".ogg") {
            return Err(DecodeError::Corrupt {
                source_ref: source.as_str().to_string(),
                reason: "unsupported sound container".to_string(),
            });
        }
        self.check_budget(source, SOUND_BYTES, 1)?;
        Ok(DecodedAsset::sound(44_100, 1, vec![0u8; SOUND_BYTES]))
    }
}

/// Listener that writes every presentation callback to the log.
#[derive(Debug, Default)]
pub struct LoggingListener;

impl PresentationListener for LoggingListener {
    fn on_progress(&mut self, done: usize, total: usize, label: &str) {
        log::debug!("Loading {done}/{total}: {label}");
    }

    fn on_theme_ready(&mut self, theme_id: &str) {
        log::info!("Theme {theme_id} ready");
    }

    fn on_theme_failed(&mut self, theme_id: &str, error: &ThemeError) {
        log::error!("Theme {theme_id} failed: {error}");
    }

    fn on_display_asset(&mut self, id: &AssetId, asset: &DecodedAsset) {
        match asset.kind() {
            DecodedKind::Image {
                width,
                height,
                subsample,
            } => log::info!(
                "Display {id} ({width}x{height}, subsample {subsample}, {} bytes)",
                asset.data().len()
            ),
            DecodedKind::Sound { .. } => log::warn!("Display {id}: not an image"),
        }
    }

    fn on_play_sound(&mut self, id: &AssetId) {
        log::info!("Play sound {id}");
    }
}

fn cat() -> Result<Theme, ModelError> {
    let wave = Animation::new(
        "wave",
        vec![Frame::new("paw_up", 1.0), Frame::new("paw_down", 1.0)],
        3,
        120,
    )?
    .with_menu_visibility(true)
    .with_sound("meow");
    let blink = Animation::new(
        "blink",
        vec![Frame::new("blink", 0.5), Frame::new("sit", 1.0)],
        2,
        200,
    )?
    .with_menu_visibility(true);
    let dizzy = Animation::new(
        "dizzy",
        vec![Frame::new("belly", 1.0), Frame::new("stretch", 1.5)],
        2,
        80,
    )?
    .with_sound("purr");

    Ok(Theme::builder("cat", "sit")
        .image("sit", "cat/sit.png")
        .image("blink", "cat/blink.png")
        .image("paw_up", "cat/paw_up.png")
        .image("paw_down", "cat/paw_down.png")
        .image("belly", "cat/belly.png")
        .image("stretch", "cat/stretch.png")
        .sound("meow", "cat/meow.ogg")
        .sound("purr", "cat/purr.ogg")
        .animation(wave)
        .animation(blink)
        .animation(dizzy)
        .rule(OrientationRule::new(
            "belly",
            AngleRange::ANY_YAW,
            AngleRange::new(-20.0, 20.0)?,
            AngleRange::new(150.0, 180.0)?,
        ))
        .rule(OrientationRule::new(
            "stretch",
            AngleRange::ANY_YAW,
            AngleRange::new(-100.0, -70.0)?,
            AngleRange::ANY_TILT,
        ))
        .touch_animation("wave")
        .shake_animation("dizzy")
        .build())
}

fn dog() -> Result<Theme, ModelError> {
    let wag = Animation::new(
        "wag",
        vec![Frame::new("tail_left", 1.0), Frame::new("tail_right", 1.0)],
        4,
        90,
    )?
    .with_menu_visibility(true)
    .with_sound("woof");

    Ok(Theme::builder("dog", "stand")
        .image("stand", "dog/stand.png")
        .image("tail_left", "dog/tail_left.png")
        .image("tail_right", "dog/tail_right.png")
        .image("roll", "dog/roll.png")
        .sound("woof", "dog/woof.ogg")
        .animation(wag)
        .rule(OrientationRule::new(
            "roll",
            AngleRange::ANY_YAW,
            AngleRange::ANY_TILT,
            AngleRange::new(60.0, 120.0)?,
        ))
        .touch_animation("wag")
        .build())
}

/// Catalog holding the built-in cat and dog themes.
pub fn catalog() -> Result<MemoryCatalog, ModelError> {
    Ok(MemoryCatalog::new().with_theme(cat()?).with_theme(dog()?))
}

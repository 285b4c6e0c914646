//! Decoder double and theme fixtures for the unit tests.

use std::collections::HashSet;

use mascot_types::{DecodedAsset, SourceRef, Theme};

use crate::error::DecodeError;
use crate::traits::decoder::AssetDecoder;

/// Square RGBA buffer of `side / subsample` pixels per edge.
pub fn pixels(side: u32, subsample: u32) -> DecodedAsset {
    let edge = (side / subsample).max(1);
    DecodedAsset::image(edge, edge, subsample, vec![0u8; (edge * edge * 4) as usize])
}

pub fn oom(subsample: u32) -> DecodeError {
    DecodeError::OutOfMemory {
        source_ref: "test".to_string(),
        subsample,
    }
}

/// Decoder that succeeds for every source except the ones marked failing.
/// Failing images run out of memory, failing sounds are corrupt.
#[derive(Default)]
pub struct MockDecoder {
    failing: HashSet<String>,
}

impl MockDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, source: &str) -> Self {
        self.failing.insert(source.to_string());
        self
    }
}

impl AssetDecoder for MockDecoder {
    fn decode_image(
        &self,
        source: &SourceRef,
        subsample: u32,
    ) -> Result<DecodedAsset, DecodeError> {
        if self.failing.contains(source.as_str()) {
            return Err(oom(subsample));
        }
        Ok(pixels(8, subsample))
    }

    fn decode_sound(&self, source: &SourceRef) -> Result<DecodedAsset, DecodeError> {
        if self.failing.contains(source.as_str()) {
            return Err(DecodeError::Corrupt {
                source_ref: source.as_str().to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(DecodedAsset::sound(22_050, 1, vec![0u8; 32]))
    }
}

/// Theme whose default image is `idle`. Image sources are `{id}/{name}.png`,
/// sound sources `{id}/{name}.ogg`.
pub fn asset_theme(id: &str, images: &[&str], sounds: &[&str]) -> Theme {
    let mut builder = Theme::builder(id, "idle");
    for name in images {
        builder = builder.image(*name, format!("{id}/{name}.png").as_str());
    }
    for name in sounds {
        builder = builder.sound(*name, format!("{id}/{name}.ogg").as_str());
    }
    builder.build()
}

pub fn cat_theme() -> Theme {
    asset_theme("cat", &["idle", "look_up", "walk1", "walk2"], &["meow"])
}

pub fn dog_theme() -> Theme {
    asset_theme("dog", &["idle", "bark1"], &["woof"])
}

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Condvar, Mutex};

use mascot_core::traits::{AssetDecoder, PresentationListener};
use mascot_core::{DecodeError, ThemeError};
use mascot_types::{
    AngleRange, Animation, AssetId, DecodedAsset, Frame, OrientationRule, SourceRef, Theme,
};

/// Decoder whose image decoding can be held back until the test opens the gate.
#[derive(Default)]
pub struct GatedDecoder {
    failing: HashSet<String>,
    gate: Arc<(Mutex<bool>, Condvar)>,
}

impl GatedDecoder {
    pub fn open() -> Self {
        let decoder = Self::default();
        decoder.release();
        decoder
    }

    pub fn closed() -> Self {
        Self::default()
    }

    pub fn failing(mut self, source: &str) -> Self {
        self.failing.insert(source.to_string());
        self
    }

    pub fn release(&self) {
        let (lock, cvar) = &*self.gate;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    fn pass_gate(&self) {
        let (lock, cvar) = &*self.gate;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
    }
}

impl AssetDecoder for GatedDecoder {
    fn decode_image(
        &self,
        source: &SourceRef,
        subsample: u32,
    ) -> Result<DecodedAsset, DecodeError> {
        self.pass_gate();
        if self.failing.contains(source.as_str()) {
            return Err(DecodeError::OutOfMemory {
                source_ref: source.as_str().to_string(),
                subsample,
            });
        }
        let edge = 16 / subsample;
        Ok(DecodedAsset::image(edge, edge, subsample, vec![0u8; (edge * edge * 4) as usize]))
    }

    fn decode_sound(&self, _source: &SourceRef) -> Result<DecodedAsset, DecodeError> {
        Ok(DecodedAsset::sound(44_100, 2, vec![0u8; 64]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Progress(usize, usize),
    Ready(String),
    Failed(String),
    Display(String),
    Sound(String),
}

#[derive(Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingListener {
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    /// Everything except progress, which tests rarely care about.
    pub fn take_significant(&self) -> Vec<Event> {
        self.take()
            .into_iter()
            .filter(|e| !matches!(e, Event::Progress(..)))
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl PresentationListener for RecordingListener {
    fn on_progress(&mut self, done: usize, total: usize, _label: &str) {
        self.push(Event::Progress(done, total));
    }

    fn on_theme_ready(&mut self, theme_id: &str) {
        self.push(Event::Ready(theme_id.to_string()));
    }

    fn on_theme_failed(&mut self, theme_id: &str, _error: &ThemeError) {
        self.push(Event::Failed(theme_id.to_string()));
    }

    fn on_display_asset(&mut self, id: &AssetId, _asset: &DecodedAsset) {
        self.push(Event::Display(id.to_string()));
    }

    fn on_play_sound(&mut self, id: &AssetId) {
        self.push(Event::Sound(id.to_string()));
    }
}

pub fn display(id: &str) -> Event {
    Event::Display(id.to_string())
}

pub fn cat_theme() -> Theme {
    let walk = Animation::new(
        "walk",
        vec![Frame::new("walk1", 1.0), Frame::new("walk2", 1.0)],
        1,
        100,
    )
    .unwrap()
    .with_menu_visibility(true)
    .with_sound("meow");
    let dizzy = Animation::new(
        "dizzy",
        vec![Frame::new("look_left", 1.0), Frame::new("look_up", 2.0)],
        1,
        50,
    )
    .unwrap();
    // Refers to an image the theme never defines.
    let broken = Animation::new("broken", vec![Frame::new("ghost", 1.0)], 1, 100).unwrap();

    Theme::builder("cat", "idle")
        .image("idle", "cat/idle.png")
        .image("look_left", "cat/look_left.png")
        .image("look_up", "cat/look_up.png")
        .image("walk1", "cat/walk1.png")
        .image("walk2", "cat/walk2.png")
        .sound("meow", "cat/meow.ogg")
        .animation(walk)
        .animation(dizzy)
        .animation(broken)
        .rule(OrientationRule::new(
            "look_up",
            AngleRange::ANY_YAW,
            AngleRange::new(-100.0, -80.0).unwrap(),
            AngleRange::ANY_TILT,
        ))
        .touch_animation("walk")
        .shake_animation("dizzy")
        .build()
}

pub fn dog_theme() -> Theme {
    let bark = Animation::new("bark", vec![Frame::new("bark1", 1.0)], 1, 200)
        .unwrap()
        .with_menu_visibility(true)
        .with_sound("woof");
    Theme::builder("dog", "idle")
        .image("idle", "dog/idle.png")
        .image("bark1", "dog/bark1.png")
        .sound("woof", "dog/woof.ogg")
        .animation(bark)
        .touch_animation("bark")
        .build()
}

/// Its animation names a sound the theme never defines.
pub fn owl_theme() -> Theme {
    let hoot = Animation::new("hoot", vec![Frame::new("hoot1", 1.0)], 1, 100)
        .unwrap()
        .with_sound("hoot_sound");
    Theme::builder("owl", "idle")
        .image("idle", "owl/idle.png")
        .image("hoot1", "owl/hoot1.png")
        .animation(hoot)
        .touch_animation("hoot")
        .build()
}

/// Two menu animations for the idle timer to alternate between.
pub fn fox_theme() -> Theme {
    let hop = Animation::new("hop", vec![Frame::new("hop1", 1.0)], 1, 100)
        .unwrap()
        .with_menu_visibility(true);
    let spin = Animation::new("spin", vec![Frame::new("spin1", 1.0)], 1, 100)
        .unwrap()
        .with_menu_visibility(true);
    Theme::builder("fox", "idle")
        .image("idle", "fox/idle.png")
        .image("hop1", "fox/hop1.png")
        .image("spin1", "fox/spin1.png")
        .animation(hop)
        .animation(spin)
        .build()
}

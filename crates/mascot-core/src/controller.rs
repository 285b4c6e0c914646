use std::sync::Arc;

use mascot_types::{AssetId, ScreenRotation, Theme, Vec3};

use crate::config::EngineConfig;
use crate::error::{AnimationError, ControllerError, ThemeError};
use crate::load_task::{LoadMessage, LoadOutcome, ThemeLoadTask};
use crate::loader::{SessionResources, ThemeLoader};
use crate::sensor::{OrientationClassifier, OrientationEvent};
use crate::sequencer::{PlaybackFrame, sequence_duration_ms};
use crate::traits::{AssetDecoder, Clock, PresentationListener, ThemeCatalog};

/// Lifecycle of the presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationState {
    /// No theme shown.
    Idle,
    /// A theme switch is running on the loader thread.
    Loading(String),
    /// Theme shown, reacting to orientation, touch and shake.
    Ready(String),
    /// An animation owns the display until its sequence ends.
    Animating(AssetId),
}

struct Playback {
    frames: Arc<[PlaybackFrame]>,
    index: usize,
    displayed: usize,
    frame_started_ms: i64,
}

/// Glues the cache, loader, sequencer and classifier together for the UI layer.
///
/// Every method runs on the caller's thread; the only background work is the
/// asset decoding of a theme switch, whose results are picked up in
/// [`update`](Self::update).
pub struct PresentationController {
    config: EngineConfig,
    catalog: Box<dyn ThemeCatalog>,
    decoder: Arc<dyn AssetDecoder>,
    clock: Box<dyn Clock>,
    listener: Box<dyn PresentationListener>,

    state: PresentationState,
    /// `None` while the loader thread owns them.
    resources: Option<SessionResources>,
    load_task: Option<ThemeLoadTask>,
    pending_theme: Option<String>,
    theme: Option<Arc<Theme>>,
    last_good_theme: Option<String>,

    classifier: OrientationClassifier,
    rotation: ScreenRotation,
    playback: Option<Playback>,
    last_classified_ms: Option<i64>,
    last_activity_ms: i64,
    idle_cursor: usize,
}

impl PresentationController {
    pub fn new(
        config: EngineConfig,
        catalog: Box<dyn ThemeCatalog>,
        decoder: Arc<dyn AssetDecoder>,
        clock: Box<dyn Clock>,
        listener: Box<dyn PresentationListener>,
    ) -> Self {
        let classifier = OrientationClassifier::new(config.shake_threshold);
        let now = clock.now_ms();
        Self {
            config,
            catalog,
            decoder,
            clock,
            listener,
            state: PresentationState::Idle,
            resources: Some(SessionResources::default()),
            load_task: None,
            pending_theme: None,
            theme: None,
            last_good_theme: None,
            classifier,
            rotation: ScreenRotation::default(),
            playback: None,
            last_classified_ms: None,
            last_activity_ms: now,
            idle_cursor: 0,
        }
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn current_theme(&self) -> Option<&Arc<Theme>> {
        self.theme.as_ref()
    }

    pub fn pending_theme(&self) -> Option<&str> {
        self.pending_theme.as_deref()
    }

    /// Cache and sequencer, unless a theme switch currently owns them.
    pub fn resources(&self) -> Option<&SessionResources> {
        self.resources.as_ref()
    }

    pub fn classifier(&self) -> &OrientationClassifier {
        &self.classifier
    }

    /// Ids of the current theme's menu animations.
    pub fn menu_animations(&self) -> Vec<AssetId> {
        self.theme
            .as_ref()
            .map(|t| t.menu_animations().map(|a| a.id().clone()).collect())
            .unwrap_or_default()
    }

    /// Request a theme switch.
    ///
    /// While another switch is loading the request is deferred and replaces
    /// any earlier deferred request. Rejected while an animation plays.
    pub fn use_theme(&mut self, id: &str) -> Result<(), ControllerError> {
        if matches!(self.state, PresentationState::Animating(_)) {
            return Err(ControllerError::Busy);
        }
        if matches!(&self.state, PresentationState::Ready(current) if current == id) {
            return Ok(());
        }

        let theme = self
            .catalog
            .theme(id)
            .ok_or_else(|| ThemeError::UnknownTheme(id.to_string()))?;
        ThemeLoader::validate(&theme)?;

        if let PresentationState::Loading(current) = &self.state {
            if current == id {
                self.pending_theme = None;
            } else {
                log::info!("Theme {current} still loading; deferring {id}");
                self.pending_theme = Some(id.to_string());
            }
            return Ok(());
        }

        self.start_load(theme);
        Ok(())
    }

    /// Drive the presentation: collect loader progress, advance playback and
    /// run orientation checks. Call once per frame.
    pub fn update(&mut self) {
        self.pump_load();
        let now = self.clock.now_ms();
        match self.state {
            PresentationState::Animating(_) => self.advance_playback(now),
            PresentationState::Ready(_) => {
                self.run_orientation(now);
                self.run_idle_timer(now);
            }
            PresentationState::Idle | PresentationState::Loading(_) => {}
        }
    }

    /// Wait for any running theme switch, including deferred and fallback
    /// switches it triggers, and deliver its callbacks.
    pub fn block_until_loaded(&mut self) {
        while let Some(task) = self.load_task.as_mut() {
            let messages = task.wait();
            self.handle_load_messages(messages);
        }
    }

    pub fn on_acceleration_sample(&mut self, x: f32, y: f32, z: f32) {
        let shaken = self.classifier.on_acceleration(Vec3::new(x, y, z));
        if !shaken || !matches!(self.state, PresentationState::Ready(_)) {
            return;
        }
        self.last_activity_ms = self.clock.now_ms();
        if let Some(id) = self.theme.as_ref().and_then(|t| t.shake_animation.clone()) {
            self.start_reaction(&id, "shake");
        }
    }

    pub fn on_magnetic_field_sample(&mut self, x: f32, y: f32, z: f32) {
        self.classifier.on_magnetic_field(Vec3::new(x, y, z));
    }

    pub fn on_screen_rotation(&mut self, degrees: u32) -> Result<(), ControllerError> {
        let rotation = ScreenRotation::try_from(degrees)?;
        if rotation != self.rotation {
            log::debug!(
                "Screen rotation {} -> {}",
                self.rotation.degrees(),
                rotation.degrees()
            );
        }
        self.rotation = rotation;
        self.last_classified_ms = None;
        Ok(())
    }

    pub fn on_touch(&mut self) {
        if !matches!(self.state, PresentationState::Ready(_)) {
            return;
        }
        self.last_activity_ms = self.clock.now_ms();
        if let Some(id) = self.theme.as_ref().and_then(|t| t.touch_animation.clone()) {
            self.start_reaction(&id, "touch");
        }
    }

    /// Start an animation of the current theme, replacing one already playing.
    pub fn play_animation(&mut self, id: &str) -> Result<(), ControllerError> {
        if !matches!(
            self.state,
            PresentationState::Ready(_) | PresentationState::Animating(_)
        ) {
            return Err(ControllerError::NotReady);
        }
        let theme = self.theme.clone().ok_or(ControllerError::NotReady)?;
        let animation = theme
            .animation(id)
            .ok_or_else(|| AnimationError::UnknownAnimation(id.to_string()))?;
        let resources = self.resources.as_mut().ok_or(ControllerError::NotReady)?;
        let frames = resources
            .sequencer
            .expand(animation, &theme.default_image, &resources.cache)?;

        let now = self.clock.now_ms();
        log::info!(
            "Playing animation {id} ({} frames, {} ms)",
            frames.len(),
            sequence_duration_ms(&frames)
        );
        self.classifier.reset_special_image();
        self.state = PresentationState::Animating(animation.id().clone());
        self.last_activity_ms = now;
        let first = frames[0].image.clone();
        self.playback = Some(Playback {
            frames,
            index: 0,
            displayed: 0,
            frame_started_ms: now,
        });
        self.display(&first);

        if let Some(sound) = animation.sound() {
            if self.is_cached(sound) {
                self.listener.on_play_sound(sound);
            } else {
                log::debug!("Sound {sound} for animation {id} not loaded");
            }
        }
        Ok(())
    }

    /// Stop the playing animation and show the default image.
    pub fn stop_animation(&mut self) {
        if !matches!(self.state, PresentationState::Animating(_)) {
            return;
        }
        self.finish_animation();
        if let Some(idle) = self.theme.as_ref().map(|t| t.default_image.clone()) {
            self.display(&idle);
        }
    }

    fn start_load(&mut self, theme: Arc<Theme>) {
        let resources = self.resources.take().unwrap_or_default();
        let previous = self.theme.take();
        self.playback = None;
        self.classifier.reset_special_image();
        self.state = PresentationState::Loading(theme.id.clone());
        self.load_task = Some(ThemeLoadTask::start(
            resources,
            previous,
            theme,
            Arc::clone(&self.decoder),
        ));
    }

    fn pump_load(&mut self) {
        let Some(task) = self.load_task.as_mut() else {
            return;
        };
        let messages = task.poll();
        self.handle_load_messages(messages);
    }

    fn handle_load_messages(&mut self, messages: Vec<LoadMessage>) {
        for msg in messages {
            match msg {
                LoadMessage::Progress(p) => self.listener.on_progress(p.done, p.total, &p.label),
                LoadMessage::Finished(outcome) => {
                    self.load_task = None;
                    self.finish_load(outcome);
                }
            }
        }
    }

    fn finish_load(&mut self, outcome: LoadOutcome) {
        let LoadOutcome {
            theme,
            mut resources,
            result,
        } = outcome;

        match result {
            Ok(()) => {
                self.resources = Some(resources);
                self.last_good_theme = Some(theme.id.clone());
                self.state = PresentationState::Ready(theme.id.clone());
                self.last_activity_ms = self.clock.now_ms();
                self.last_classified_ms = None;
                self.theme = Some(Arc::clone(&theme));
                self.listener.on_theme_ready(&theme.id);
                self.display(&theme.default_image);

                if let Some(next) = self.pending_theme.take() {
                    if let Err(e) = self.use_theme(&next) {
                        log::warn!("Deferred theme {next} rejected: {e}");
                    }
                }
            }
            Err(e) => {
                log::error!("Theme {} failed: {e}", theme.id);
                resources.cache.evict_all();
                resources.sequencer.clear();
                self.resources = Some(resources);
                self.state = PresentationState::Idle;
                self.listener.on_theme_failed(&theme.id, &e);

                let fallback = self.pending_theme.take().or_else(|| {
                    self.last_good_theme
                        .clone()
                        .filter(|good| *good != theme.id)
                });
                if let Some(next) = fallback {
                    log::warn!("Falling back to theme {next}");
                    if let Err(e) = self.use_theme(&next) {
                        log::error!("Fallback theme {next} rejected: {e}");
                    }
                }
            }
        }
    }

    fn advance_playback(&mut self, now: i64) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        let last = playback.frames.len() - 1;
        let mut finished = false;
        loop {
            let duration = playback.frames[playback.index].duration_ms as i64;
            if now - playback.frame_started_ms < duration {
                break;
            }
            if playback.index == last {
                finished = true;
                break;
            }
            playback.frame_started_ms += duration;
            playback.index += 1;
        }

        if finished {
            let idle_missed = playback.displayed != last;
            let idle = playback.frames[last].image.clone();
            self.finish_animation();
            if idle_missed {
                self.display(&idle);
            }
        } else if playback.index != playback.displayed {
            playback.displayed = playback.index;
            let image = playback.frames[playback.index].image.clone();
            self.display(&image);
        }
    }

    fn finish_animation(&mut self) {
        self.playback = None;
        self.last_activity_ms = self.clock.now_ms();
        self.last_classified_ms = None;
        self.state = match &self.theme {
            Some(theme) => PresentationState::Ready(theme.id.clone()),
            None => PresentationState::Idle,
        };
    }

    fn run_orientation(&mut self, now: i64) {
        if let Some(last) = self.last_classified_ms {
            if now - last < self.config.orientation_interval_ms as i64 {
                return;
            }
        }
        self.last_classified_ms = Some(now);
        let Some(theme) = self.theme.clone() else {
            return;
        };
        match self
            .classifier
            .classify(self.rotation, &theme.orientation_rules)
        {
            Ok(Some(OrientationEvent::Special(id))) => {
                self.last_activity_ms = now;
                self.display(&id);
            }
            Ok(Some(OrientationEvent::Revert)) => {
                self.last_activity_ms = now;
                self.display(&theme.default_image);
            }
            Ok(None) => {}
            Err(e) => log::trace!("Orientation check skipped: {e}"),
        }
    }

    fn run_idle_timer(&mut self, now: i64) {
        let Some(interval) = self.config.idle_animation_interval_ms else {
            return;
        };
        if self.classifier.current_special_image().is_some()
            || now - self.last_activity_ms < interval as i64
        {
            return;
        }
        self.last_activity_ms = now;
        let menu = self.menu_animations();
        if menu.is_empty() {
            return;
        }
        let id = menu[self.idle_cursor % menu.len()].clone();
        self.idle_cursor += 1;
        self.start_reaction(&id, "idle");
    }

    fn start_reaction(&mut self, id: &AssetId, trigger: &str) {
        if let Err(e) = self.play_animation(id.as_str()) {
            log::warn!("Skipping {trigger} animation {id}: {e}");
        }
    }

    fn is_cached(&self, id: &AssetId) -> bool {
        self.resources
            .as_ref()
            .is_some_and(|r| r.cache.contains(id.as_str()))
    }

    // Assets still decoding are skipped silently; the next decision shows them.
    fn display(&mut self, id: &AssetId) {
        match self.resources.as_ref().and_then(|r| r.cache.get(id.as_str())) {
            Some(asset) if asset.is_image() => self.listener.on_display_asset(id, &asset),
            Some(_) => log::warn!("Asset {id} is not an image; display skipped"),
            None => log::debug!("Asset {id} not loaded; display skipped"),
        }
    }
}

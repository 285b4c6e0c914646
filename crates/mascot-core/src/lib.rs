pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod load_task;
pub mod loader;
pub mod sensor;
pub mod sequencer;
pub mod traits;

pub use cache::{MAX_DECODE_ATTEMPTS, ResourceCache};
pub use config::EngineConfig;
pub use controller::{PresentationController, PresentationState};
pub use error::{AnimationError, CacheError, ControllerError, DecodeError, SensorError, ThemeError};
pub use loader::{LoadProgress, SessionResources, ThemeLoader};
pub use sensor::{OrientationClassifier, OrientationEvent};
pub use sequencer::{AnimationSequencer, PlaybackFrame};

#[cfg(test)]
mod test_utils;

use mascot_types::{AssetId, ModelError};
use thiserror::Error;

/// Failure reported by an [`AssetDecoder`](crate::traits::decoder::AssetDecoder).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not enough memory for the requested resolution. Retryable with a
    /// larger subsample factor.
    #[error("out of memory decoding {source_ref} at subsample {subsample}")]
    OutOfMemory { source_ref: String, subsample: u32 },

    #[error("corrupt or unreadable asset {source_ref}: {reason}")]
    Corrupt { source_ref: String, reason: String },
}

impl DecodeError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, DecodeError::OutOfMemory { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("failed to decode {id} after {attempts} attempt(s)")]
    DecodeFailure {
        id: AssetId,
        attempts: u32,
        #[source]
        source: DecodeError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnimationError {
    #[error("animation {0} is not part of the current theme")]
    UnknownAnimation(String),

    #[error("animation {animation} unavailable: image {image} is not loaded")]
    MissingAsset { animation: AssetId, image: AssetId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("theme {0} not found in catalog")]
    UnknownTheme(String),

    #[error("theme {theme} is invalid: {reason}")]
    InvalidTheme { theme: String, reason: String },

    #[error("theme {theme} failed to load")]
    Decode {
        theme: String,
        #[source]
        source: CacheError,
    },

    #[error("loading theme {0} stopped before completion")]
    Interrupted(String),
}

/// Reasons a rotation estimate cannot be computed. Never surfaced to the user;
/// classification is simply skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("no acceleration sample received yet")]
    NoAcceleration,

    #[error("acceleration too small for a gravity estimate")]
    FreeFall,

    #[error("magnetic field parallel to gravity")]
    DegenerateField,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    #[error("an animation is playing")]
    Busy,

    #[error("no theme is ready")]
    NotReady,

    #[error(transparent)]
    InvalidRotation(#[from] ModelError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Animation(#[from] AnimationError),
}

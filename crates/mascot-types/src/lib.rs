//! Immutable records describing a mascot theme and its assets.
//!
//! Everything here is produced by the theme catalog and never mutated
//! afterwards; the engine crates only read these values.

pub mod animation;
pub mod asset;
pub mod error;
pub mod orientation;
pub mod theme;
pub mod vector;

pub use animation::{Animation, Frame};
pub use asset::{AssetId, DecodedAsset, DecodedKind, Image, Sound, SourceRef};
pub use error::ModelError;
pub use orientation::{AngleRange, Orientation, OrientationRule, ScreenRotation};
pub use theme::{Theme, ThemeBuilder};
pub use vector::Vec3;

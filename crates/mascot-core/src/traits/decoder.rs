use mascot_types::{DecodedAsset, SourceRef};

use crate::error::DecodeError;

/// Abstraction over platform decoders.
/// Implementations live outside the engine; tests use scripted mocks.
///
/// Decoding runs on the background loader thread, hence `Send + Sync`.
pub trait AssetDecoder: Send + Sync {
    /// Decode an image, reducing each dimension by `subsample` (1 = full size).
    fn decode_image(&self, source: &SourceRef, subsample: u32) -> Result<DecodedAsset, DecodeError>;

    fn decode_sound(&self, source: &SourceRef) -> Result<DecodedAsset, DecodeError>;
}

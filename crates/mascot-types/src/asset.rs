use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Opaque identifier of an image, sound or animation, unique within a theme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(Arc<str>);

impl AssetId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AssetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Locator handed to the decoder. The engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef(pub String);

impl SourceRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SourceRef {
    fn from(source: &str) -> Self {
        Self(source.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub id: AssetId,
    pub source: SourceRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    pub id: AssetId,
    pub source: SourceRef,
}

/// What a decoded buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedKind {
    /// Pixel buffer. `subsample` is the reduction factor the decoder used
    /// (1 = full resolution).
    Image {
        width: u32,
        height: u32,
        subsample: u32,
    },
    Sound { sample_rate: u32, channels: u16 },
}

/// In-memory pixel or audio buffer produced by a decoder.
///
/// The buffer is never mutated once built. Consumers that need to modify it
/// take a copy with [`DecodedAsset::to_vec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAsset {
    kind: DecodedKind,
    data: Box<[u8]>,
}

impl DecodedAsset {
    pub fn new(kind: DecodedKind, data: impl Into<Box<[u8]>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    pub fn image(width: u32, height: u32, subsample: u32, data: impl Into<Box<[u8]>>) -> Self {
        Self::new(
            DecodedKind::Image {
                width,
                height,
                subsample,
            },
            data,
        )
    }

    pub fn sound(sample_rate: u32, channels: u16, data: impl Into<Box<[u8]>>) -> Self {
        Self::new(
            DecodedKind::Sound {
                sample_rate,
                channels,
            },
            data,
        )
    }

    pub fn kind(&self) -> DecodedKind {
        self.kind
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, DecodedKind::Image { .. })
    }

    /// Owned copy of the buffer for consumers that need to edit pixels or samples.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

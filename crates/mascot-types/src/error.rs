use thiserror::Error;

/// Invariant violations detected while constructing theme records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("animation {animation} has no frames")]
    EmptyFrames { animation: String },

    #[error("animation {animation} must repeat at least once")]
    ZeroRepeat { animation: String },

    #[error("animation {animation} frame {index} has invalid duration factor {factor}")]
    InvalidDurationFactor {
        animation: String,
        index: usize,
        factor: f32,
    },

    #[error("invalid angle range [{min}, {max}]")]
    InvalidRange { min: f32, max: f32 },

    #[error("unsupported screen rotation: {0} degrees")]
    InvalidRotation(u32),
}

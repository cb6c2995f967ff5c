// error.rs - Scene configuration errors
//
// Everything here is raised while building a Simulation. Once a Simulation
// exists its data is known-good and the per-frame path cannot fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Fold axis has (near) zero length or non-finite components
    #[error("fold {index}: axis {axis:?} cannot be normalized")]
    InvalidFoldAxis { index: usize, axis: [f32; 3] },

    /// A numeric field is NaN or infinite
    #[error("{field} must be finite")]
    NonFinite { field: String },

    /// Fold would never reach its target
    #[error("fold {index}: speed must be positive, got {speed}")]
    NonPositiveSpeed { index: usize, speed: f32 },

    #[error("fold sequence is empty")]
    EmptySequence,

    #[error("mesh subdivisions must be in 1..={max}, got {0}", max = crate::config::MAX_SUBDIVISIONS)]
    InvalidSubdivisions(u32),

    /// Out-of-range scalar (scale, epsilon, bounds, ...)
    #[error("{field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to parse scene config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue { field: field.to_string(), reason: reason.into() }
    }

    pub(crate) fn non_finite(field: &str) -> Self {
        Self::NonFinite { field: field.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

//! Configuration errors raised when building agents, spawners and gates.

/// A tunable that would leave a behaviour undefined.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A duration or interval that must be strictly positive.
    #[error("{name} must be positive (got {value})")]
    NonPositiveDuration { name: &'static str, value: f32 },

    /// A speed or distance that must not be negative.
    #[error("{name} must not be negative (got {value})")]
    Negative { name: &'static str, value: f32 },

    /// Field of view outside `(0, 360]` degrees.
    #[error("field of view must be in (0, 360] degrees (got {0})")]
    FieldOfView(f32),

    /// Spawn bounds whose minimum exceeds the maximum on some axis.
    #[error("spawn bounds are inverted: min {min:?} > max {max:?}")]
    InvertedBounds { min: [f32; 3], max: [f32; 3] },

    /// More safe-location slots than a defensive agent supports.
    #[error("at most {max} safe-location slots are supported (got {got})")]
    TooManySafeSlots { max: usize, got: usize },
}

/// Reject zero, negative and NaN durations.
pub(crate) fn positive(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositiveDuration { name, value })
    }
}

/// Reject negative and NaN speeds or distances.
pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

//! Error types for the animation core.

use thiserror::Error;

/// Result type for animation operations.
pub type Result<T> = std::result::Result<T, AnimationError>;

/// Errors that can occur when configuring or driving an animation.
///
/// All of these are caller bugs surfaced immediately; nothing here is
/// recoverable internally and nothing is retried.
#[derive(Error, Debug)]
pub enum AnimationError {
    /// A value handed to the normalization step was neither an animation nor
    /// a deferred builder.
    #[error("value cannot be converted to an animation: {0}")]
    NotAnimation(String),

    /// `interpolate` or `finish` called before `begin`.
    #[error("animation has not been started")]
    NotStarted,

    /// `begin` called on an animation that is already active.
    #[error("animation has already been started")]
    AlreadyStarted,

    /// The animation already ran to completion; animations are single-use.
    #[error("animation has already finished")]
    AlreadyFinished,

    /// Run time must be strictly positive.
    #[error("run_time must be positive, got {0}")]
    InvalidRunTime(f64),

    /// Lag ratio must lie in [0, 1].
    #[error("lag_ratio must be in [0, 1], got {0}")]
    InvalidLagRatio(f64),

    /// Time span bounds must satisfy 0 <= start < end.
    #[error("invalid time span: start {start}, end {end}")]
    InvalidTimeSpan { start: f64, end: f64 },
}

//! Animation configuration.
//!
//! [`AnimationConfig`] carries the temporal parameters of one playback with
//! named, typed fields and documented defaults. [`ConfigOverrides`] is the
//! sparse counterpart used by deferred builders and by the bulk
//! `update_config` operation: every field optional, `None` meaning "keep the
//! current value".

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::rates::RateFunction;

/// Default run time of an animation, in seconds.
pub const DEFAULT_RUN_TIME: f64 = 1.0;

/// Sub-interval of the run during which the animation is active.
///
/// Outside the span the motion is clamped to the nearer endpoint's value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Start of the active window, in seconds from the animation's start.
    pub start: f64,
    /// End of the active window, in seconds.
    pub end: f64,
}

impl TimeSpan {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Temporal parameters of one animation playback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Total playback duration in seconds. Must be strictly positive.
    #[serde(default = "default_run_time")]
    pub run_time: f64,

    /// Optional active window within the run. A span ending past `run_time`
    /// widens the run time at `begin` rather than erroring.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_span: Option<TimeSpan>,

    /// Easing curve applied to each node's local progress.
    #[serde(default)]
    pub rate_func: RateFunction,

    /// Display label. Falls back to the effect's name when unset.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether completing this animation removes its target from the stage.
    #[serde(default)]
    pub remover: bool,

    /// Alpha passed to the closing `interpolate` call, normally 1.
    #[serde(default = "default_final_alpha")]
    pub final_alpha_value: f64,

    /// Stagger factor in [0, 1]: 0 animates all nodes in lockstep, 1 animates
    /// them strictly one after another, values in between overlap.
    #[serde(default)]
    pub lag_ratio: f64,

    /// Whether the live tree's own per-frame updaters are suspended for the
    /// duration of the playback.
    #[serde(default = "default_true")]
    pub suspend_node_updating: bool,
}

fn default_run_time() -> f64 {
    DEFAULT_RUN_TIME
}

fn default_final_alpha() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            run_time: DEFAULT_RUN_TIME,
            time_span: None,
            rate_func: RateFunction::default(),
            name: None,
            remover: false,
            final_alpha_value: 1.0,
            lag_ratio: 0.0,
            suspend_node_updating: true,
        }
    }
}

impl AnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run time in seconds.
    pub fn with_run_time(mut self, run_time: f64) -> Self {
        self.run_time = run_time;
        self
    }

    /// Restrict the animation to an active window within the run.
    pub fn with_time_span(mut self, span: TimeSpan) -> Self {
        self.time_span = Some(span);
        self
    }

    /// Set the easing curve.
    pub fn with_rate_func(mut self, rate_func: RateFunction) -> Self {
        self.rate_func = rate_func;
        self
    }

    /// Set the display label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark the animation as a remover.
    pub fn with_remover(mut self, remover: bool) -> Self {
        self.remover = remover;
        self
    }

    /// Set the alpha of the closing interpolate call.
    pub fn with_final_alpha_value(mut self, alpha: f64) -> Self {
        self.final_alpha_value = alpha;
        self
    }

    /// Set the stagger factor.
    pub fn with_lag_ratio(mut self, lag_ratio: f64) -> Self {
        self.lag_ratio = lag_ratio;
        self
    }

    /// Control suspension of the live tree's updaters during playback.
    pub fn with_suspend_node_updating(mut self, suspend: bool) -> Self {
        self.suspend_node_updating = suspend;
        self
    }

    /// Merge a set of overrides into this configuration. `None` fields keep
    /// their current value.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(run_time) = overrides.run_time {
            self.run_time = run_time;
        }
        if let Some(span) = overrides.time_span {
            self.time_span = Some(span);
        }
        if let Some(rate_func) = overrides.rate_func {
            self.rate_func = rate_func;
        }
        if let Some(name) = overrides.name {
            self.name = Some(name);
        }
        if let Some(remover) = overrides.remover {
            self.remover = remover;
        }
        if let Some(alpha) = overrides.final_alpha_value {
            self.final_alpha_value = alpha;
        }
        if let Some(lag_ratio) = overrides.lag_ratio {
            self.lag_ratio = lag_ratio;
        }
        if let Some(suspend) = overrides.suspend_node_updating {
            self.suspend_node_updating = suspend;
        }
    }

    /// Validate the configuration. A `time_span` ending past `run_time` is
    /// deliberately not an error; `begin` widens the run time instead.
    pub fn validate(&self) -> Result<()> {
        if !(self.run_time > 0.0) {
            return Err(AnimationError::InvalidRunTime(self.run_time));
        }
        if !(0.0..=1.0).contains(&self.lag_ratio) {
            return Err(AnimationError::InvalidLagRatio(self.lag_ratio));
        }
        if let Some(span) = self.time_span {
            if !(span.start >= 0.0 && span.start < span.end) {
                return Err(AnimationError::InvalidTimeSpan {
                    start: span.start,
                    end: span.end,
                });
            }
        }
        Ok(())
    }
}

/// Sparse configuration overrides.
///
/// Every field mirrors [`AnimationConfig`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_time: Option<f64>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_span: Option<TimeSpan>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_func: Option<RateFunction>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remover: Option<bool>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_alpha_value: Option<f64>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag_ratio: Option<f64>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspend_node_updating: Option<bool>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_time(mut self, run_time: f64) -> Self {
        self.run_time = Some(run_time);
        self
    }

    pub fn with_time_span(mut self, span: TimeSpan) -> Self {
        self.time_span = Some(span);
        self
    }

    pub fn with_rate_func(mut self, rate_func: RateFunction) -> Self {
        self.rate_func = Some(rate_func);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_remover(mut self, remover: bool) -> Self {
        self.remover = Some(remover);
        self
    }

    pub fn with_final_alpha_value(mut self, alpha: f64) -> Self {
        self.final_alpha_value = Some(alpha);
        self
    }

    pub fn with_lag_ratio(mut self, lag_ratio: f64) -> Self {
        self.lag_ratio = Some(lag_ratio);
        self
    }

    pub fn with_suspend_node_updating(mut self, suspend: bool) -> Self {
        self.suspend_node_updating = Some(suspend);
        self
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

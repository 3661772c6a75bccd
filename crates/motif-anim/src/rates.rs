//! Rate functions for animation timing.
//!
//! A rate function maps normalized progress to normalized progress,
//! controlling how an animation's motion is distributed over its run time.
//! `Smooth` (a quintic smoothstep) is the default curve; `Squished`
//! concentrates a curve onto a sub-interval of the timeline and clamps to
//! the endpoint values outside it.

use serde::{Deserialize, Serialize};

/// Easing curve applied to a node's local progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateFunction {
    /// Identity: no easing.
    Linear,

    /// Quintic smoothstep: zero first and second derivatives at both ends.
    Smooth,

    /// First half of `Smooth`, rescaled: starts gently, ends at full speed.
    RushInto,

    /// Second half of `Smooth`, rescaled: starts at full speed, eases out.
    RushFrom,

    /// Quarter-circle arc: slow approach into the final value.
    SlowInto,

    /// Runs `Smooth` forward over the first half, backward over the second.
    ThereAndBack,

    /// `inner` compressed onto `[start, end]` of the timeline, clamped to
    /// its endpoint values outside that window.
    Squished {
        inner: Box<RateFunction>,
        start: f64,
        end: f64,
    },
}

impl Default for RateFunction {
    fn default() -> Self {
        Self::Smooth
    }
}

impl RateFunction {
    /// Evaluate the curve at progress `t`. Input is clamped to [0, 1].
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Smooth => smooth(t),
            Self::RushInto => 2.0 * smooth(0.5 * t),
            Self::RushFrom => 2.0 * smooth(0.5 * (t + 1.0)) - 1.0,
            Self::SlowInto => (1.0 - (1.0 - t) * (1.0 - t)).sqrt(),
            Self::ThereAndBack => {
                let local = if t < 0.5 { 2.0 * t } else { 2.0 * (1.0 - t) };
                smooth(local)
            }
            Self::Squished { inner, start, end } => {
                if (end - start).abs() < f64::EPSILON {
                    // Degenerate window: step at `start`.
                    if t < *start {
                        inner.evaluate(0.0)
                    } else {
                        inner.evaluate(1.0)
                    }
                } else {
                    inner.evaluate(((t - start) / (end - start)).clamp(0.0, 1.0))
                }
            }
        }
    }

    /// Compress this curve onto the `[start, end]` sub-interval of the
    /// timeline: `squish(f, s, e)(t) = f(clamp((t - s) / (e - s), 0, 1))`.
    pub fn squished(self, start: f64, end: f64) -> Self {
        Self::Squished {
            inner: Box::new(self),
            start,
            end,
        }
    }
}

/// Quintic smoothstep: 10t³ - 15t⁴ + 6t⁵.
fn smooth(t: f64) -> f64 {
    let s = 1.0 - t;
    t * t * t * (10.0 * s * s + 5.0 * s * t + t * t)
}

//! Per-node interpolation hook.
//!
//! The animation core never computes visual formulas itself; it dispatches
//! to an [`Effect`] once per paired node per frame. Concrete effects (color
//! blends, path morphs, fades) implement this trait over their payload type.

use motif_tree::NodeHandle;

/// Capability interface for effect-specific per-node interpolation.
pub trait Effect<T> {
    /// Display label used when the animation has no configured name.
    fn name(&self) -> &str {
        "Animation"
    }

    /// Write the visual state for one node at local progress `sub_alpha`,
    /// reading from the node's pre-animation state `starting`.
    fn interpolate_node(&mut self, live: &mut T, starting: &T, sub_alpha: f64);

    /// Extra trees whose updaters should advance alongside the starting
    /// snapshot during playback (for effects that track a separate
    /// target-state tree). Must not include the live target.
    fn auxiliary_roots(&self) -> Vec<NodeHandle<T>> {
        Vec::new()
    }
}

/// Placeholder effect that leaves every node untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEffect;

impl<T> Effect<T> for NoOpEffect {
    fn interpolate_node(&mut self, _live: &mut T, _starting: &T, _sub_alpha: f64) {}
}

/// Adapts a closure `(live, starting, sub_alpha)` into an [`Effect`].
pub struct EffectFn<F> {
    name: String,
    func: F,
}

impl<F> EffectFn<F> {
    pub fn new(func: F) -> Self {
        Self {
            name: "Animation".to_string(),
            func,
        }
    }

    pub fn named(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<T, F: FnMut(&mut T, &T, f64)> Effect<T> for EffectFn<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn interpolate_node(&mut self, live: &mut T, starting: &T, sub_alpha: f64) {
        (self.func)(live, starting, sub_alpha);
    }
}

//! The animation lifecycle and per-node timing algorithm.
//!
//! An [`Animation`] binds one effect to one live tree for one playback. The
//! driving player calls [`Animation::begin`], then a non-decreasing sequence
//! of [`Animation::interpolate`] with alpha in [0, 1], then
//! [`Animation::finish`] and optionally [`Animation::cleanup`]. `begin` takes
//! a deep snapshot of the tree, suspends its own per-frame updaters, and
//! pairs the live and snapshot families index by index; every `interpolate`
//! fans the global alpha out per node through the staggered sub-alpha
//! algorithm and dispatches the effect hook on each `(live, starting)` pair.
//!
//! Animations are single-use: `Unstarted → Active → Finished`, no way back.

use std::fmt;

use motif_tree::NodeHandle;
use tracing::debug;

use crate::config::{AnimationConfig, ConfigOverrides};
use crate::effect::{Effect, NoOpEffect};
use crate::error::{AnimationError, Result};
use crate::rates::RateFunction;
use crate::stage::Stage;

/// Lifecycle state of an animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Created but not yet begun.
    Unstarted,
    /// Between `begin` and `finish`; owns the target's suspension.
    Active,
    /// Ran to completion (or was aborted); replay is not possible.
    Finished,
}

/// Map a global alpha onto one node's local window.
///
/// The global [0, 1] timeline is spread over `total` overlapping local
/// windows whose starts are offset by `lag_ratio` node-widths. `lag_ratio`
/// of 0 collapses every window onto [0, 1] (lockstep); 1 places them
/// back-to-back (strictly sequential). The result is the clamped raw local
/// progress, before easing.
pub fn staggered_alpha(alpha: f64, index: usize, total: usize, lag_ratio: f64) -> f64 {
    let full_length = total.saturating_sub(1) as f64 * lag_ratio + 1.0;
    let value = alpha * full_length;
    let lower = index as f64 * lag_ratio;
    (value - lower).clamp(0.0, 1.0)
}

/// One playback of one effect on one tree root.
pub struct Animation<T: Clone + 'static> {
    target: NodeHandle<T>,
    config: AnimationConfig,
    effect: Box<dyn Effect<T>>,
    state: PlaybackState,
    starting: Option<NodeHandle<T>>,
    families: Vec<(NodeHandle<T>, NodeHandle<T>)>,
    prior_suspended: bool,
    cleaned_up: bool,
}

impl<T: Clone + 'static> Animation<T> {
    /// Create an animation over `target` with the default (no-op) effect.
    pub fn new(target: NodeHandle<T>) -> Self {
        Self::with_effect(target, NoOpEffect)
    }

    /// Create an animation over `target` driven by the given effect.
    pub fn with_effect(target: NodeHandle<T>, effect: impl Effect<T> + 'static) -> Self {
        Self::with_boxed_effect(target, Box::new(effect))
    }

    /// Like [`Animation::with_effect`] for an already-boxed effect.
    pub fn with_boxed_effect(target: NodeHandle<T>, effect: Box<dyn Effect<T>>) -> Self {
        Self {
            target,
            config: AnimationConfig::default(),
            effect,
            state: PlaybackState::Unstarted,
            starting: None,
            families: Vec::new(),
            prior_suspended: false,
            cleaned_up: false,
        }
    }

    /// Replace the configuration wholesale. Intended for use before `begin`.
    pub fn with_config(mut self, config: AnimationConfig) -> Self {
        self.config = config;
        self
    }

    /// Start the playback: validate, reconcile the time span, snapshot the
    /// tree, suspend its updaters, pair the families, and drive the initial
    /// frame at alpha 0 so the target is in its pre-animation pose before
    /// anything is rendered.
    pub fn begin(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Unstarted => {}
            PlaybackState::Active => return Err(AnimationError::AlreadyStarted),
            PlaybackState::Finished => return Err(AnimationError::AlreadyFinished),
        }
        self.config.validate()?;

        if let Some(span) = self.config.time_span {
            // A span ending past run_time widens the run rather than erroring.
            self.config.run_time = self.config.run_time.max(span.end);
            let run_time = self.config.run_time;
            let rate_func = std::mem::replace(&mut self.config.rate_func, RateFunction::Linear);
            self.config.rate_func = rate_func.squished(span.start / run_time, span.end / run_time);
        }

        debug!(
            name = %self.name(),
            run_time = self.config.run_time,
            lag_ratio = self.config.lag_ratio,
            "beginning animation"
        );

        self.prior_suspended = self.target.is_updating_suspended();
        self.target.set_animating(true);
        let starting = self.target.clone_tree();
        if self.config.suspend_node_updating {
            // Only this animation (or the surrounding player) mutates the
            // visible state from here on; the snapshot's updaters stay live
            // and are advanced through `update_auxiliary`.
            self.target.suspend_updating();
        }
        self.families = self
            .target
            .family()
            .into_iter()
            .zip(starting.family())
            .collect();
        self.starting = Some(starting);

        self.state = PlaybackState::Active;
        self.interpolate(0.0)
    }

    /// Drive one frame at global progress `alpha` in [0, 1].
    pub fn interpolate(&mut self, alpha: f64) -> Result<()> {
        match self.state {
            PlaybackState::Unstarted => return Err(AnimationError::NotStarted),
            PlaybackState::Finished => return Err(AnimationError::AlreadyFinished),
            PlaybackState::Active => {}
        }

        let total = self.families.len();
        let lag_ratio = self.config.lag_ratio;
        for (index, (live, starting)) in self.families.iter().enumerate() {
            let raw = staggered_alpha(alpha, index, total, lag_ratio);
            let sub_alpha = self.config.rate_func.evaluate(raw);
            let mut live_data = live.data_mut();
            let starting_data = starting.data();
            self.effect
                .interpolate_node(&mut live_data, &starting_data, sub_alpha);
        }
        Ok(())
    }

    /// A node's eased local progress at global `alpha`. Exposed for drivers
    /// that need to reason about per-node timing without a frame dispatch.
    pub fn sub_alpha(&self, alpha: f64, index: usize, total: usize) -> f64 {
        self.config
            .rate_func
            .evaluate(staggered_alpha(alpha, index, total, self.config.lag_ratio))
    }

    /// Close the playback: drive the final frame at `final_alpha_value` and
    /// restore the target's flags.
    pub fn finish(&mut self) -> Result<()> {
        if self.state != PlaybackState::Active {
            return match self.state {
                PlaybackState::Unstarted => Err(AnimationError::NotStarted),
                _ => Err(AnimationError::AlreadyFinished),
            };
        }
        let final_alpha = self.config.final_alpha_value;
        self.interpolate(final_alpha)?;
        self.restore_target();
        self.state = PlaybackState::Finished;
        debug!(name = %self.name(), "finished animation");
        Ok(())
    }

    /// Restore the target's flags without driving a final frame. For
    /// drivers that stop playback early instead of calling `finish`; also
    /// runs on drop of an animation abandoned mid-playback, so the
    /// suspension never leaks.
    pub fn abort(&mut self) {
        if self.state == PlaybackState::Active {
            debug!(name = %self.name(), "aborting animation");
            self.restore_target();
            self.state = PlaybackState::Finished;
        }
    }

    fn restore_target(&mut self) {
        self.target.set_animating(false);
        if self.config.suspend_node_updating && !self.prior_suspended {
            self.target.resume_updating();
        }
    }

    /// If this animation is a remover, ask the stage to drop the target.
    /// Idempotent, and safe to call on an animation that never played.
    pub fn cleanup(&mut self, stage: &mut dyn Stage<T>) {
        if self.cleaned_up {
            return;
        }
        if self.config.remover {
            stage.remove(&self.target);
        }
        self.cleaned_up = true;
    }

    /// Advance the per-frame updaters of every tree in the pairing except
    /// the live target: the starting snapshot, plus any separate trees the
    /// effect tracks. The player may call this zero or many times between
    /// two `interpolate` calls.
    pub fn update_auxiliary(&mut self, dt: f64) {
        if let Some(starting) = &self.starting {
            starting.update(dt);
        }
        for root in self.effect.auxiliary_roots() {
            if !root.ptr_eq(&self.target) {
                root.update(dt);
            }
        }
    }

    /// Effective run time in seconds. When a time span is set this is
    /// `max(run_time, span.end)`; before `begin` the two may differ, after
    /// `begin` the stored run time has been widened and they coincide.
    pub fn run_time(&self) -> f64 {
        match self.config.time_span {
            Some(span) => self.config.run_time.max(span.end),
            None => self.config.run_time,
        }
    }

    /// Display label: the configured name, else the effect's name.
    pub fn name(&self) -> String {
        self.config
            .name
            .clone()
            .unwrap_or_else(|| self.effect.name().to_string())
    }

    pub fn rate_func(&self) -> &RateFunction {
        &self.config.rate_func
    }

    pub fn is_remover(&self) -> bool {
        self.config.remover
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn target(&self) -> &NodeHandle<T> {
        &self.target
    }

    /// The starting snapshot taken at `begin`; `None` before playback.
    pub fn starting(&self) -> Option<&NodeHandle<T>> {
        self.starting.as_ref()
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Set the run time. Fluent; intended for use before `begin`.
    pub fn set_run_time(&mut self, run_time: f64) -> &mut Self {
        self.config.run_time = run_time;
        self
    }

    /// Set the easing curve. Fluent; intended for use before `begin`.
    pub fn set_rate_func(&mut self, rate_func: RateFunction) -> &mut Self {
        self.config.rate_func = rate_func;
        self
    }

    /// Set the display label. Fluent.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.config.name = Some(name.into());
        self
    }

    /// Merge configuration overrides. Fluent; mutating configuration after
    /// `begin` has undefined effect on in-flight timing, since the paired
    /// families and the squished rate function are not recomputed.
    pub fn update_config(&mut self, overrides: ConfigOverrides) -> &mut Self {
        self.config.apply(overrides);
        self
    }
}

impl<T: Clone + 'static> Drop for Animation<T> {
    fn drop(&mut self) {
        self.abort();
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Animation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("name", &self.name())
            .field("state", &self.state)
            .field("config", &self.config)
            .field("nodes", &self.families.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeSpan;
    use crate::effect::EffectFn;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn three_leaves() -> NodeHandle<f64> {
        NodeHandle::new(0.0)
            .with_child(NodeHandle::new(0.0))
            .with_child(NodeHandle::new(0.0))
    }

    fn linear_config() -> AnimationConfig {
        AnimationConfig::new().with_rate_func(RateFunction::Linear)
    }

    #[test]
    fn test_staggered_alpha_lockstep() {
        // lag_ratio = 0: every index sees the global alpha.
        for index in 0..5 {
            for step in 0..=10 {
                let alpha = step as f64 / 10.0;
                assert!(approx_eq(staggered_alpha(alpha, index, 5, 0.0), alpha));
            }
        }
    }

    #[test]
    fn test_staggered_alpha_single_node() {
        // total = 1 degenerates to clamp(alpha) whatever the lag.
        for lag in [0.0, 0.3, 1.0] {
            assert!(approx_eq(staggered_alpha(0.7, 0, 1, lag), 0.7));
            assert!(approx_eq(staggered_alpha(1.4, 0, 1, lag), 1.0));
        }
    }

    #[test]
    fn test_staggered_alpha_monotonic() {
        for index in 0..4 {
            let mut prev = 0.0;
            for step in 0..=100 {
                let alpha = step as f64 / 100.0;
                let raw = staggered_alpha(alpha, index, 4, 0.6);
                assert!(raw >= prev);
                prev = raw;
            }
        }
    }

    #[test]
    fn test_staggered_alpha_boundaries() {
        for index in 0..4 {
            assert!(approx_eq(staggered_alpha(0.0, index, 4, 0.7), 0.0));
            assert!(approx_eq(staggered_alpha(1.0, index, 4, 0.7), 1.0));
        }
    }

    #[test]
    fn test_staggered_alpha_three_nodes_half_lag() {
        // full_length = 2.0 at alpha = 0.5.
        assert!(approx_eq(staggered_alpha(0.5, 0, 3, 0.5), 1.0));
        assert!(approx_eq(staggered_alpha(0.5, 1, 3, 0.5), 0.5));
        assert!(approx_eq(staggered_alpha(0.5, 2, 3, 0.5), 0.0));
    }

    #[test]
    fn test_interpolate_dispatches_staggered_values() {
        let root = three_leaves();
        let set = EffectFn::new(|live: &mut f64, _starting: &f64, sub_alpha| {
            *live = sub_alpha;
        });
        let mut anim = Animation::with_effect(root.clone(), set)
            .with_config(linear_config().with_lag_ratio(0.5));

        anim.begin().unwrap();
        anim.interpolate(0.5).unwrap();

        let values: Vec<f64> = root.family().iter().map(|n| *n.data()).collect();
        assert!(approx_eq(values[0], 1.0));
        assert!(approx_eq(values[1], 0.5));
        assert!(approx_eq(values[2], 0.0));

        anim.finish().unwrap();
        let values: Vec<f64> = root.family().iter().map(|n| *n.data()).collect();
        assert!(values.iter().all(|v| approx_eq(*v, 1.0)));
    }

    #[test]
    fn test_begin_sets_flags_finish_restores() {
        let root = three_leaves();
        let mut anim = Animation::new(root.clone());

        assert!(!root.is_animating());
        anim.begin().unwrap();
        assert!(root.is_animating());
        assert!(root.is_updating_suspended());
        assert!(root.family().iter().all(|n| n.is_updating_suspended()));

        anim.finish().unwrap();
        assert!(!root.is_animating());
        assert!(!root.is_updating_suspended());
        assert_eq!(anim.state(), PlaybackState::Finished);
    }

    #[test]
    fn test_suspension_can_be_disabled() {
        let root = three_leaves();
        let mut anim = Animation::new(root.clone())
            .with_config(AnimationConfig::new().with_suspend_node_updating(false));

        anim.begin().unwrap();
        assert!(!root.is_updating_suspended());
        anim.finish().unwrap();
    }

    #[test]
    fn test_interpolate_before_begin_errors() {
        let mut anim = Animation::new(NodeHandle::new(0.0_f64));
        assert!(matches!(
            anim.interpolate(0.5),
            Err(AnimationError::NotStarted)
        ));
        assert!(matches!(anim.finish(), Err(AnimationError::NotStarted)));
    }

    #[test]
    fn test_single_use() {
        let mut anim = Animation::new(NodeHandle::new(0.0_f64));
        anim.begin().unwrap();
        assert!(matches!(anim.begin(), Err(AnimationError::AlreadyStarted)));
        anim.finish().unwrap();
        assert!(matches!(anim.begin(), Err(AnimationError::AlreadyFinished)));
        assert!(matches!(
            anim.interpolate(0.5),
            Err(AnimationError::AlreadyFinished)
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_begin() {
        let mut anim = Animation::new(NodeHandle::new(0.0_f64))
            .with_config(AnimationConfig::new().with_lag_ratio(2.0));
        assert!(matches!(
            anim.begin(),
            Err(AnimationError::InvalidLagRatio(_))
        ));
    }

    #[test]
    fn test_time_span_widens_run_time() {
        let mut anim = Animation::new(NodeHandle::new(0.0_f64))
            .with_config(linear_config().with_time_span(TimeSpan::new(1.0, 3.0)));

        // Before begin: stored run_time and the effective value differ.
        assert!(approx_eq(anim.config().run_time, 1.0));
        assert!(approx_eq(anim.run_time(), 3.0));

        anim.begin().unwrap();
        // After begin the stored run_time has been widened to the span end.
        assert!(approx_eq(anim.config().run_time, 3.0));
        assert!(approx_eq(anim.run_time(), 3.0));
        anim.finish().unwrap();
    }

    #[test]
    fn test_time_span_clamps_outside_window() {
        // run_time 4, active in (1, 3): alpha maps to time = alpha * 4.
        let root = NodeHandle::new(0.0_f64);
        let set = EffectFn::new(|live: &mut f64, _s: &f64, sub_alpha| *live = sub_alpha);
        let mut anim = Animation::with_effect(root.clone(), set).with_config(
            linear_config()
                .with_run_time(4.0)
                .with_time_span(TimeSpan::new(1.0, 3.0)),
        );
        anim.begin().unwrap();

        // Before the window: pinned to the window-start value.
        anim.interpolate(0.125).unwrap(); // t = 0.5
        assert!(approx_eq(*root.data(), 0.0));
        anim.interpolate(0.25).unwrap(); // t = 1.0, window start
        assert!(approx_eq(*root.data(), 0.0));

        // Inside the window the motion spans the full [0, 1].
        anim.interpolate(0.5).unwrap(); // t = 2.0, window midpoint
        assert!(approx_eq(*root.data(), 0.5));

        // Past the window: pinned to the window-end value.
        anim.interpolate(0.75).unwrap(); // t = 3.0
        assert!(approx_eq(*root.data(), 1.0));
        anim.interpolate(0.875).unwrap(); // t = 3.5
        assert!(approx_eq(*root.data(), 1.0));

        anim.finish().unwrap();
    }

    #[test]
    fn test_drop_while_active_restores_flags() {
        let root = three_leaves();
        {
            let mut anim = Animation::new(root.clone());
            anim.begin().unwrap();
            assert!(root.is_updating_suspended());
            // Abandoned without finish.
        }
        assert!(!root.is_updating_suspended());
        assert!(!root.is_animating());
    }

    #[test]
    fn test_abort_restores_without_final_frame() {
        let root = NodeHandle::new(0.0_f64);
        let set = EffectFn::new(|live: &mut f64, _s: &f64, sub_alpha| *live = sub_alpha);
        let mut anim = Animation::with_effect(root.clone(), set).with_config(linear_config());

        anim.begin().unwrap();
        anim.interpolate(0.3).unwrap();
        anim.abort();

        // No closing interpolate(1); the value stays where playback stopped.
        assert!(approx_eq(*root.data(), 0.3));
        assert!(!root.is_animating());
        assert_eq!(anim.state(), PlaybackState::Finished);
    }

    #[test]
    fn test_prior_suspension_is_preserved() {
        let root = three_leaves();
        root.suspend_updating();

        let mut anim = Animation::new(root.clone());
        anim.begin().unwrap();
        anim.finish().unwrap();

        // The tree was suspended before the animation; finish leaves it so.
        assert!(root.is_updating_suspended());
    }

    #[test]
    fn test_final_alpha_value() {
        let root = NodeHandle::new(0.0_f64);
        let set = EffectFn::new(|live: &mut f64, _s: &f64, sub_alpha| *live = sub_alpha);
        let mut anim = Animation::with_effect(root.clone(), set)
            .with_config(linear_config().with_final_alpha_value(0.0));

        anim.begin().unwrap();
        anim.interpolate(0.6).unwrap();
        anim.finish().unwrap();
        // Closing frame ran at alpha 0, not 1.
        assert!(approx_eq(*root.data(), 0.0));
    }

    #[test]
    fn test_name_falls_back_to_effect() {
        let target = NodeHandle::new(0.0_f64);
        let anim = Animation::with_effect(
            target.clone(),
            EffectFn::named("FadeIn", |_: &mut f64, _: &f64, _| {}),
        );
        assert_eq!(anim.name(), "FadeIn");

        let mut named = Animation::new(target);
        named.set_name("intro");
        assert_eq!(named.name(), "intro");
    }

    #[test]
    fn test_update_config_is_fluent() {
        let mut anim = Animation::new(NodeHandle::new(0.0_f64));
        anim.update_config(ConfigOverrides::new().with_run_time(2.5))
            .set_name("combo");
        assert!(approx_eq(anim.config().run_time, 2.5));
        assert_eq!(anim.name(), "combo");
    }
}

//! Deferred animation builders and playback normalization.
//!
//! A player accepts "animation-like" values: an already-built [`Animation`]
//! or an [`AnimationBuilder`] still waiting to be materialized. Normalization
//! collapses both into a concrete `Animation` exactly once, before `begin`,
//! so the rest of the core never distinguishes the two. The statically-typed
//! path is [`AnimationLike::prepare`]; [`prepare_animation`] covers
//! dynamically-typed playback queues, where handing over anything else is a
//! usage error.

use std::any::Any;

use motif_tree::NodeHandle;

use crate::animation::Animation;
use crate::config::{AnimationConfig, ConfigOverrides, TimeSpan};
use crate::effect::Effect;
use crate::error::{AnimationError, Result};
use crate::rates::RateFunction;

/// Deferred specification of an animation: a target, sparse configuration
/// overrides, and an optional effect, materialized by [`AnimationBuilder::build`].
pub struct AnimationBuilder<T: Clone + 'static> {
    target: NodeHandle<T>,
    overrides: ConfigOverrides,
    effect: Option<Box<dyn Effect<T>>>,
}

impl<T: Clone + 'static> AnimationBuilder<T> {
    pub fn new(target: NodeHandle<T>) -> Self {
        Self {
            target,
            overrides: ConfigOverrides::new(),
            effect: None,
        }
    }

    /// Set the effect driving the per-node interpolation.
    pub fn effect(mut self, effect: impl Effect<T> + 'static) -> Self {
        self.effect = Some(Box::new(effect));
        self
    }

    pub fn run_time(mut self, run_time: f64) -> Self {
        self.overrides.run_time = Some(run_time);
        self
    }

    pub fn time_span(mut self, span: TimeSpan) -> Self {
        self.overrides.time_span = Some(span);
        self
    }

    pub fn rate_func(mut self, rate_func: RateFunction) -> Self {
        self.overrides.rate_func = Some(rate_func);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.overrides.name = Some(name.into());
        self
    }

    pub fn remover(mut self, remover: bool) -> Self {
        self.overrides.remover = Some(remover);
        self
    }

    pub fn final_alpha_value(mut self, alpha: f64) -> Self {
        self.overrides.final_alpha_value = Some(alpha);
        self
    }

    pub fn lag_ratio(mut self, lag_ratio: f64) -> Self {
        self.overrides.lag_ratio = Some(lag_ratio);
        self
    }

    pub fn suspend_node_updating(mut self, suspend: bool) -> Self {
        self.overrides.suspend_node_updating = Some(suspend);
        self
    }

    /// Materialize the deferred specification into a concrete animation.
    pub fn build(self) -> Animation<T> {
        let mut config = AnimationConfig::default();
        config.apply(self.overrides);
        let animation = match self.effect {
            Some(effect) => Animation::with_boxed_effect(self.target, effect),
            None => Animation::new(self.target),
        };
        animation.with_config(config)
    }
}

/// A value claimed to represent "an animation to play".
pub enum AnimationLike<T: Clone + 'static> {
    /// Already a concrete animation; passes through unchanged.
    Built(Animation<T>),
    /// Still a deferred builder; materialized on prepare.
    Deferred(AnimationBuilder<T>),
}

impl<T: Clone + 'static> AnimationLike<T> {
    /// Normalize to a concrete [`Animation`].
    pub fn prepare(self) -> Animation<T> {
        match self {
            Self::Built(animation) => animation,
            Self::Deferred(builder) => builder.build(),
        }
    }
}

impl<T: Clone + 'static> From<Animation<T>> for AnimationLike<T> {
    fn from(animation: Animation<T>) -> Self {
        Self::Built(animation)
    }
}

impl<T: Clone + 'static> From<AnimationBuilder<T>> for AnimationLike<T> {
    fn from(builder: AnimationBuilder<T>) -> Self {
        Self::Deferred(builder)
    }
}

/// Normalize a dynamically-typed playback value.
///
/// Accepts a boxed [`Animation`] (returned unchanged) or a boxed
/// [`AnimationBuilder`] (built); anything else is a type-mismatch usage
/// error. Type erasure means the offending value cannot name its own type,
/// so the error names the expected kinds instead.
pub fn prepare_animation<T: Clone + 'static>(value: Box<dyn Any>) -> Result<Animation<T>> {
    let value = match value.downcast::<Animation<T>>() {
        Ok(animation) => return Ok(*animation),
        Err(other) => other,
    };
    match value.downcast::<AnimationBuilder<T>>() {
        Ok(builder) => Ok(builder.build()),
        Err(_) => Err(AnimationError::NotAnimation(
            "expected an Animation or an AnimationBuilder".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::PlaybackState;
    use crate::effect::EffectFn;

    #[test]
    fn test_builder_materializes_overrides() {
        let target = NodeHandle::new(0.0_f64);
        let anim = AnimationBuilder::new(target)
            .effect(EffectFn::named("Grow", |_: &mut f64, _: &f64, _| {}))
            .run_time(2.0)
            .lag_ratio(0.5)
            .remover(true)
            .build();

        assert_eq!(anim.config().run_time, 2.0);
        assert_eq!(anim.config().lag_ratio, 0.5);
        assert!(anim.is_remover());
        assert_eq!(anim.name(), "Grow");
        assert_eq!(anim.state(), PlaybackState::Unstarted);
    }

    #[test]
    fn test_builder_defaults_without_effect() {
        let anim = AnimationBuilder::new(NodeHandle::new(0.0_f64)).build();
        assert_eq!(anim.config(), &AnimationConfig::default());
        assert_eq!(anim.name(), "Animation");
    }

    #[test]
    fn test_prepare_passes_built_through() {
        let mut anim = Animation::new(NodeHandle::new(0.0_f64));
        anim.set_name("untouched").set_run_time(1.5);

        let prepared = AnimationLike::from(anim).prepare();
        assert_eq!(prepared.name(), "untouched");
        assert_eq!(prepared.config().run_time, 1.5);
    }

    #[test]
    fn test_prepare_builds_deferred() {
        let builder = AnimationBuilder::new(NodeHandle::new(0.0_f64)).name("deferred");
        let prepared = AnimationLike::from(builder).prepare();
        assert_eq!(prepared.name(), "deferred");
    }

    #[test]
    fn test_prepare_animation_dynamic_paths() {
        let built = Animation::new(NodeHandle::new(0.0_f64));
        assert!(prepare_animation::<f64>(Box::new(built)).is_ok());

        let deferred = AnimationBuilder::new(NodeHandle::new(0.0_f64)).name("late");
        let prepared = prepare_animation::<f64>(Box::new(deferred)).unwrap();
        assert_eq!(prepared.name(), "late");

        let err = prepare_animation::<f64>(Box::new(42_i32)).unwrap_err();
        assert!(matches!(err, AnimationError::NotAnimation(_)));
    }
}

//! Animation timing core for the motif engine.
//!
//! This crate turns a global progress value into per-node visual state over a
//! renderable tree (`motif-tree`). It provides:
//!
//! - **Rate functions**: easing curves and the squish combinator that maps a
//!   curve onto a sub-interval of the timeline
//! - **Animation**: the begin/interpolate/finish lifecycle, snapshot pairing,
//!   and the staggered per-node sub-alpha algorithm
//! - **Effects**: the per-node interpolation hook concrete effects implement
//! - **Builders**: deferred animation specifications and their normalization
//!
//! # Architecture
//!
//! ```text
//! AnimationLike / prepare_animation
//!   └── normalizes builders into a concrete Animation before playback
//!
//! Animation
//!   ├── begin()        snapshot the tree, suspend its updaters, pair families
//!   ├── interpolate(a) fan a out per node via the sub-alpha algorithm,
//!   │                  dispatch the Effect hook per (live, starting) pair
//!   ├── finish()       final frame, restore flags
//!   └── cleanup(stage) remove the target if the animation is a remover
//! ```
//!
//! The driving player calls `begin()`, a non-decreasing sequence of
//! `interpolate(alpha)` for alpha in [0, 1], then `finish()` and
//! `cleanup(stage)`, all on one thread. An animation is single-use.

pub mod animation;
pub mod config;
pub mod effect;
pub mod error;
pub mod prepare;
pub mod rates;
pub mod stage;

pub use animation::{Animation, PlaybackState, staggered_alpha};
pub use config::{AnimationConfig, ConfigOverrides, TimeSpan};
pub use effect::{Effect, EffectFn, NoOpEffect};
pub use error::{AnimationError, Result};
pub use prepare::{AnimationBuilder, AnimationLike, prepare_animation};
pub use rates::RateFunction;
pub use stage::Stage;

//! Renderable-object tree model for the motif animation engine.
//!
//! A scene is a tree of renderable nodes. Each node carries a payload (the
//! renderable data: geometry, style, whatever the embedding engine draws),
//! an ordered list of children, and a set of per-frame updaters. The
//! animation core consumes this tree through a small surface:
//!
//! - `clone_tree` — deep, independent snapshot of a subtree
//! - `family` — stable-order flattening of a subtree into a node sequence
//! - `suspend_updating` / `resume_updating` — gate the per-frame updaters
//! - `set_animating` — mark a subtree as driven by an animation
//! - `update` — advance the per-frame updaters by a time delta

mod node;

pub use node::{NodeHandle, Updater};

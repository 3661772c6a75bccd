//! Interface to the surrounding scene.
//!
//! The core asks exactly one thing of the scene that owns the trees it
//! animates: removing a target once a remover animation has cleaned up.

use motif_tree::NodeHandle;

/// The scene-side surface consumed by [`crate::Animation::cleanup`].
pub trait Stage<T> {
    /// Remove the given node (and its subtree) from the stage.
    fn remove(&mut self, node: &NodeHandle<T>);
}

//! Shared node handles and tree operations.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

/// Per-frame updater attached to a node.
///
/// Updaters are pure callables over the node payload; they hold no per-tree
/// state, which lets a deep clone share them with the original tree.
pub type Updater<T> = Rc<dyn Fn(&mut T, f64)>;

struct NodeInner<T> {
    data: T,
    children: Vec<NodeHandle<T>>,
    updaters: Vec<Updater<T>>,
    updating_suspended: bool,
    animating: bool,
}

/// Shared handle to a node in a renderable tree.
///
/// Handles are cheap to clone and refer to the same underlying node; use
/// [`NodeHandle::clone_tree`] for a deep, independent copy of a subtree.
/// Trees are expected to be acyclic; traversal does not guard against cycles.
pub struct NodeHandle<T>(Rc<RefCell<NodeInner<T>>>);

impl<T> Clone for NodeHandle<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> NodeHandle<T> {
    /// Create a leaf node holding the given payload.
    pub fn new(data: T) -> Self {
        Self(Rc::new(RefCell::new(NodeInner {
            data,
            children: Vec::new(),
            updaters: Vec::new(),
            updating_suspended: false,
            animating: false,
        })))
    }

    /// Append a child to this node.
    pub fn add_child(&self, child: NodeHandle<T>) {
        self.0.borrow_mut().children.push(child);
    }

    /// Builder-style variant of [`NodeHandle::add_child`].
    pub fn with_child(self, child: NodeHandle<T>) -> Self {
        self.add_child(child);
        self
    }

    /// Handles to this node's direct children, in insertion order.
    pub fn children(&self) -> Vec<NodeHandle<T>> {
        self.0.borrow().children.clone()
    }

    /// Borrow the node payload.
    pub fn data(&self) -> Ref<'_, T> {
        Ref::map(self.0.borrow(), |inner| &inner.data)
    }

    /// Mutably borrow the node payload.
    pub fn data_mut(&self) -> RefMut<'_, T> {
        RefMut::map(self.0.borrow_mut(), |inner| &mut inner.data)
    }

    /// Whether two handles refer to the same underlying node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Flatten the subtree rooted at this node into a stable preorder
    /// sequence: the node itself first, then each child's family in
    /// insertion order.
    ///
    /// Two trees related by [`NodeHandle::clone_tree`] flatten to
    /// index-aligned families of equal length.
    pub fn family(&self) -> Vec<NodeHandle<T>> {
        let mut out = Vec::new();
        self.collect_family(&mut out);
        out
    }

    fn collect_family(&self, out: &mut Vec<NodeHandle<T>>) {
        out.push(self.clone());
        for child in self.0.borrow().children.iter() {
            child.collect_family(out);
        }
    }

    /// Set the animating flag on every node of this subtree.
    pub fn set_animating(&self, animating: bool) {
        for node in self.family() {
            node.0.borrow_mut().animating = animating;
        }
    }

    /// Whether this node is currently driven by an animation.
    pub fn is_animating(&self) -> bool {
        self.0.borrow().animating
    }

    /// Suspend the per-frame updaters of every node in this subtree.
    ///
    /// While suspended, [`NodeHandle::update`] is a no-op for the whole
    /// subtree.
    pub fn suspend_updating(&self) {
        let family = self.family();
        trace!(nodes = family.len(), "suspending tree updaters");
        for node in family {
            node.0.borrow_mut().updating_suspended = true;
        }
    }

    /// Resume the per-frame updaters of every node in this subtree.
    pub fn resume_updating(&self) {
        let family = self.family();
        trace!(nodes = family.len(), "resuming tree updaters");
        for node in family {
            node.0.borrow_mut().updating_suspended = false;
        }
    }

    /// Whether this node's per-frame updaters are suspended.
    pub fn is_updating_suspended(&self) -> bool {
        self.0.borrow().updating_suspended
    }

    /// Register a per-frame updater on this node.
    pub fn add_updater(&self, updater: impl Fn(&mut T, f64) + 'static) {
        self.0.borrow_mut().updaters.push(Rc::new(updater));
    }

    /// Advance this subtree's updaters by `dt` seconds.
    ///
    /// Does nothing while updating is suspended. Updaters run on this node's
    /// payload first, then children are updated recursively.
    pub fn update(&self, dt: f64) {
        if self.0.borrow().updating_suspended {
            return;
        }
        let updaters = self.0.borrow().updaters.clone();
        for updater in &updaters {
            updater(&mut self.data_mut(), dt);
        }
        let children = self.children();
        for child in &children {
            child.update(dt);
        }
    }
}

impl<T: Clone> NodeHandle<T> {
    /// Deep, independent clone of the subtree rooted at this node.
    ///
    /// Every node gets a fresh handle and a cloned payload; no mutable
    /// structure is shared between the clone and the original. Updaters are
    /// shared as immutable callables (see [`Updater`]). Flags are copied
    /// as-is.
    pub fn clone_tree(&self) -> Self {
        let inner = self.0.borrow();
        Self(Rc::new(RefCell::new(NodeInner {
            data: inner.data.clone(),
            children: inner.children.iter().map(NodeHandle::clone_tree).collect(),
            updaters: inner.updaters.clone(),
            updating_suspended: inner.updating_suspended,
            animating: inner.animating,
        })))
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.0.borrow();
        f.debug_struct("NodeHandle")
            .field("data", &inner.data)
            .field("children", &inner.children.len())
            .field("animating", &inner.animating)
            .field("updating_suspended", &inner.updating_suspended)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> NodeHandle<&'static str> {
        // root -> (a -> a1, b)
        let a = NodeHandle::new("a").with_child(NodeHandle::new("a1"));
        NodeHandle::new("root")
            .with_child(a)
            .with_child(NodeHandle::new("b"))
    }

    #[test]
    fn test_family_preorder() {
        let root = sample_tree();
        let labels: Vec<_> = root.family().iter().map(|n| *n.data()).collect();
        assert_eq!(labels, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_clone_tree_is_independent() {
        let root = sample_tree();
        let snapshot = root.clone_tree();

        assert_eq!(root.family().len(), snapshot.family().len());
        assert!(!root.ptr_eq(&snapshot));

        // Mutating the live tree must not touch the snapshot.
        *root.family()[1].data_mut() = "changed";
        assert_eq!(*snapshot.family()[1].data(), "a");
    }

    #[test]
    fn test_clone_tree_families_align() {
        let root = sample_tree();
        let snapshot = root.clone_tree();
        for (live, start) in root.family().iter().zip(snapshot.family()) {
            assert_eq!(*live.data(), *start.data());
            assert!(!live.ptr_eq(&start));
        }
    }

    #[test]
    fn test_updaters_advance_payload() {
        let node = NodeHandle::new(0.0_f64);
        node.add_updater(|value, dt| *value += dt);

        node.update(0.25);
        node.update(0.25);
        assert_eq!(*node.data(), 0.5);
    }

    #[test]
    fn test_suspend_blocks_update_recursively() {
        let child = NodeHandle::new(0.0_f64);
        child.add_updater(|value, dt| *value += dt);
        let root = NodeHandle::new(0.0_f64).with_child(child.clone());

        root.suspend_updating();
        root.update(1.0);
        assert_eq!(*child.data(), 0.0);
        assert!(child.is_updating_suspended());

        root.resume_updating();
        root.update(1.0);
        assert_eq!(*child.data(), 1.0);
    }

    #[test]
    fn test_set_animating_is_family_wide() {
        let root = sample_tree();
        root.set_animating(true);
        assert!(root.family().iter().all(NodeHandle::is_animating));

        root.set_animating(false);
        assert!(!root.family().iter().any(NodeHandle::is_animating));
    }

    #[test]
    fn test_cloned_handle_is_same_node() {
        let node = NodeHandle::new(1);
        let alias = node.clone();
        *alias.data_mut() = 2;
        assert_eq!(*node.data(), 2);
        assert!(node.ptr_eq(&alias));
    }
}

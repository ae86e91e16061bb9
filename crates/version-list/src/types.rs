//! Node trait definitions.
//!
//! Tree nodes live in a [`Vec`]-backed arena and each "pointer" is an
//! `Option<u32>` index into that arena. All tree-manipulation functions take
//! the arena plus indices instead of owning references.

/// Parent/left/right links.
pub trait Node {
    fn p(&self) -> Option<u32>;
    fn l(&self) -> Option<u32>;
    fn r(&self) -> Option<u32>;
    fn set_p(&mut self, v: Option<u32>);
    fn set_l(&mut self, v: Option<u32>);
    fn set_r(&mut self, v: Option<u32>);
}

/// AVL-specific node behavior.
pub trait AvlNode: Node {
    /// Balance factor, `height(left) - height(right)`.
    fn bf(&self) -> i32;
    fn set_bf(&mut self, bf: i32);
}

/// Node carrying an ordered key.
pub trait Keyed: Node {
    type Key: Ord;

    fn key(&self) -> &Self::Key;
}

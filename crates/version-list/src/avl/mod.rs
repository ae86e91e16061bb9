//! AVL balancing over index arenas.

pub mod util;

pub use util::{assert_avl_tree, insert_left, insert_right, remove};

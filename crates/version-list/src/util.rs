//! Positional and key-based helpers shared by every arena tree.
//!
//! Positional helpers (`first`, `last`, `next`, `prev`, `size`) only follow
//! `p` / `l` / `r` links. Key-based helpers (`find`, `floor`, `ceil`) need
//! nodes that expose an ordered key through [`Keyed`].

use std::cmp::Ordering;

use crate::types::{Keyed, Node};

#[inline]
pub(crate) fn get_p<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].p()
}

#[inline]
pub(crate) fn get_l<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].l()
}

#[inline]
pub(crate) fn get_r<N: Node>(arena: &[N], idx: u32) -> Option<u32> {
    arena[idx as usize].r()
}

#[inline]
pub(crate) fn set_p<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_p(v);
}

#[inline]
pub(crate) fn set_l<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_l(v);
}

#[inline]
pub(crate) fn set_r<N: Node>(arena: &mut [N], idx: u32, v: Option<u32>) {
    arena[idx as usize].set_r(v);
}

/// Leftmost node in the tree.
pub fn first<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_l(arena, idx) {
            Some(l) => curr = Some(l),
            None => return Some(idx),
        }
    }
    curr
}

/// Rightmost node in the tree.
pub fn last<N: Node>(arena: &[N], root: Option<u32>) -> Option<u32> {
    let mut curr = root;
    while let Some(idx) = curr {
        match get_r(arena, idx) {
            Some(r) => curr = Some(r),
            None => return Some(idx),
        }
    }
    curr
}

/// In-order successor.
pub fn next<N: Node>(arena: &[N], mut curr: u32) -> Option<u32> {
    if let Some(r) = get_r(arena, curr) {
        return first(arena, Some(r));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_r(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

/// In-order predecessor.
pub fn prev<N: Node>(arena: &[N], mut curr: u32) -> Option<u32> {
    if let Some(l) = get_l(arena, curr) {
        return last(arena, Some(l));
    }
    let mut p = get_p(arena, curr);
    while let Some(pi) = p {
        if get_l(arena, pi) == Some(curr) {
            curr = pi;
            p = get_p(arena, pi);
        } else {
            return Some(pi);
        }
    }
    None
}

fn size_inner<N: Node>(arena: &[N], root: u32) -> usize {
    1 + get_l(arena, root).map_or(0, |l| size_inner(arena, l))
        + get_r(arena, root).map_or(0, |r| size_inner(arena, r))
}

/// Number of nodes under `root`.
pub fn size<N: Node>(arena: &[N], root: Option<u32>) -> usize {
    root.map_or(0, |r| size_inner(arena, r))
}

/// Finds a node by key.
pub fn find<N: Keyed>(arena: &[N], root: Option<u32>, key: &N::Key) -> Option<u32> {
    let mut curr = root;
    while let Some(i) = curr {
        curr = match key.cmp(arena[i as usize].key()) {
            Ordering::Equal => return Some(i),
            Ordering::Less => get_l(arena, i),
            Ordering::Greater => get_r(arena, i),
        };
    }
    None
}

/// Finds the node with `key`, or the greatest node below it.
pub fn floor<N: Keyed>(arena: &[N], root: Option<u32>, key: &N::Key) -> Option<u32> {
    let mut curr = root;
    let mut result = None;
    while let Some(i) = curr {
        curr = match arena[i as usize].key().cmp(key) {
            Ordering::Equal => return Some(i),
            Ordering::Greater => get_l(arena, i),
            Ordering::Less => {
                result = Some(i);
                get_r(arena, i)
            }
        };
    }
    result
}

/// Finds the node with `key`, or the smallest node above it.
pub fn ceil<N: Keyed>(arena: &[N], root: Option<u32>, key: &N::Key) -> Option<u32> {
    let mut curr = root;
    let mut result = None;
    while let Some(i) = curr {
        curr = match arena[i as usize].key().cmp(key) {
            Ordering::Equal => return Some(i),
            Ordering::Less => get_r(arena, i),
            Ordering::Greater => {
                result = Some(i);
                get_l(arena, i)
            }
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf {
        p: Option<u32>,
        l: Option<u32>,
        r: Option<u32>,
        k: i64,
    }

    impl Node for Leaf {
        fn p(&self) -> Option<u32> {
            self.p
        }
        fn l(&self) -> Option<u32> {
            self.l
        }
        fn r(&self) -> Option<u32> {
            self.r
        }
        fn set_p(&mut self, v: Option<u32>) {
            self.p = v;
        }
        fn set_l(&mut self, v: Option<u32>) {
            self.l = v;
        }
        fn set_r(&mut self, v: Option<u32>) {
            self.r = v;
        }
    }

    impl Keyed for Leaf {
        type Key = i64;
        fn key(&self) -> &i64 {
            &self.k
        }
    }

    //       20 (0)
    //      /      \
    //  10 (1)    30 (2)
    //              \
    //             40 (3)
    fn sample() -> (Vec<Leaf>, Option<u32>) {
        let leaf = |p, l, r, k| Leaf { p, l, r, k };
        let arena = vec![
            leaf(None, Some(1), Some(2), 20),
            leaf(Some(0), None, None, 10),
            leaf(Some(0), None, Some(3), 30),
            leaf(Some(2), None, None, 40),
        ];
        (arena, Some(0))
    }

    #[test]
    fn positional_walk() {
        let (arena, root) = sample();
        assert_eq!(first(&arena, root), Some(1));
        assert_eq!(last(&arena, root), Some(3));
        assert_eq!(next(&arena, 1), Some(0));
        assert_eq!(next(&arena, 0), Some(2));
        assert_eq!(next(&arena, 2), Some(3));
        assert_eq!(next(&arena, 3), None);
        assert_eq!(prev(&arena, 3), Some(2));
        assert_eq!(prev(&arena, 2), Some(0));
        assert_eq!(prev(&arena, 1), None);
        assert_eq!(size(&arena, root), 4);
        assert_eq!(size::<Leaf>(&arena, None), 0);
    }

    #[test]
    fn key_lookups() {
        let (arena, root) = sample();
        assert_eq!(find(&arena, root, &30), Some(2));
        assert_eq!(find(&arena, root, &35), None);
        assert_eq!(floor(&arena, root, &35), Some(2));
        assert_eq!(floor(&arena, root, &20), Some(0));
        assert_eq!(floor(&arena, root, &5), None);
        assert_eq!(ceil(&arena, root, &35), Some(3));
        assert_eq!(ceil(&arena, root, &10), Some(1));
        assert_eq!(ceil(&arena, root, &41), None);
    }
}

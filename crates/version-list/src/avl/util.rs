//! AVL insertion, removal and validation over an index arena.
//!
//! Every function takes the arena plus the current root and returns the new
//! root, since rotations may move a different node to the top.

use crate::error::TreeError;
use crate::types::{AvlNode, Keyed};
use crate::util::{first, get_l, get_p, get_r, next, set_l, set_p, set_r};

#[inline]
fn bf<N: AvlNode>(arena: &[N], i: u32) -> i32 {
    arena[i as usize].bf()
}

#[inline]
fn set_bf<N: AvlNode>(arena: &mut [N], i: u32, v: i32) {
    arena[i as usize].set_bf(v);
}

/// Points whichever child slot of `p` held `old` at `new`.
#[inline]
fn replace_child<N: AvlNode>(arena: &mut [N], p: u32, old: u32, new: Option<u32>) {
    if get_l(arena, p) == Some(old) {
        set_l(arena, p, new);
    } else {
        set_r(arena, p, new);
    }
}

/// Returns `node` when it was lifted to the top by a rotation, else `root`.
#[inline]
fn lifted<N: AvlNode>(arena: &[N], root: u32, node: u32) -> u32 {
    if get_p(arena, node).is_some() {
        root
    } else {
        node
    }
}

fn rebalance_after_insert<N: AvlNode>(arena: &mut [N], root: u32, node: u32, child: u32) -> u32 {
    let Some(p) = get_p(arena, node) else {
        return root;
    };

    let is_left = get_l(arena, p) == Some(node);
    let pbf = bf(arena, p) + if is_left { 1 } else { -1 };
    set_bf(arena, p, pbf);

    match pbf {
        0 => root,
        1 | -1 => rebalance_after_insert(arena, root, p, node),
        _ => {
            let is_child_left = get_l(arena, node) == Some(child);
            match (is_left, is_child_left) {
                (true, true) => {
                    ll_rotate(arena, p, node);
                    lifted(arena, root, node)
                }
                (true, false) => {
                    lr_rotate(arena, p, node, child);
                    lifted(arena, root, child)
                }
                (false, true) => {
                    rl_rotate(arena, p, node, child);
                    lifted(arena, root, child)
                }
                (false, false) => {
                    rr_rotate(arena, p, node);
                    lifted(arena, root, node)
                }
            }
        }
    }
}

fn ll_rotate<N: AvlNode>(arena: &mut [N], n: u32, nl: u32) {
    let p = get_p(arena, n);
    let nlr = get_r(arena, nl);

    set_p(arena, nl, p);
    set_r(arena, nl, Some(n));
    set_p(arena, n, Some(nl));
    set_l(arena, n, nlr);
    if let Some(nlr) = nlr {
        set_p(arena, nlr, Some(n));
    }
    if let Some(p) = p {
        replace_child(arena, p, n, Some(nl));
    }

    let mut nbf = bf(arena, n);
    let mut nlbf = bf(arena, nl);
    nbf += -1 - nlbf.max(0);
    nlbf += -1 + nbf.min(0);
    set_bf(arena, n, nbf);
    set_bf(arena, nl, nlbf);
}

fn rr_rotate<N: AvlNode>(arena: &mut [N], n: u32, nr: u32) {
    let p = get_p(arena, n);
    let nrl = get_l(arena, nr);

    set_p(arena, nr, p);
    set_l(arena, nr, Some(n));
    set_p(arena, n, Some(nr));
    set_r(arena, n, nrl);
    if let Some(nrl) = nrl {
        set_p(arena, nrl, Some(n));
    }
    if let Some(p) = p {
        replace_child(arena, p, n, Some(nr));
    }

    let mut nbf = bf(arena, n);
    let mut nrbf = bf(arena, nr);
    nbf += 1 - nrbf.min(0);
    nrbf += 1 + nbf.max(0);
    set_bf(arena, n, nbf);
    set_bf(arena, nr, nrbf);
}

fn lr_rotate<N: AvlNode>(arena: &mut [N], n: u32, nl: u32, nlr: u32) {
    rr_rotate(arena, nl, nlr);
    ll_rotate(arena, n, nlr);
}

fn rl_rotate<N: AvlNode>(arena: &mut [N], n: u32, nr: u32, nrl: u32) {
    ll_rotate(arena, nr, nrl);
    rr_rotate(arena, n, nrl);
}

/// Attaches `n` as the right child of leaf-side slot `p` and rebalances.
pub fn insert_right<N: AvlNode>(arena: &mut [N], root: u32, n: u32, p: u32) -> u32 {
    set_r(arena, p, Some(n));
    set_p(arena, n, Some(p));
    let pbf = bf(arena, p) - 1;
    set_bf(arena, p, pbf);
    if get_l(arena, p).is_some() {
        root
    } else {
        rebalance_after_insert(arena, root, p, n)
    }
}

/// Attaches `n` as the left child of leaf-side slot `p` and rebalances.
pub fn insert_left<N: AvlNode>(arena: &mut [N], root: u32, n: u32, p: u32) -> u32 {
    set_l(arena, p, Some(n));
    set_p(arena, n, Some(p));
    let pbf = bf(arena, p) + 1;
    set_bf(arena, p, pbf);
    if get_r(arena, p).is_some() {
        root
    } else {
        rebalance_after_insert(arena, root, p, n)
    }
}

/// Unlinks `n` from the tree rooted at `root` and returns the new root.
///
/// The removed node is left with no links so its slot can be reused.
pub fn remove<N: AvlNode>(arena: &mut [N], root: u32, n: u32) -> Option<u32> {
    let p = get_p(arena, n);
    let l = get_l(arena, n);
    let r = get_r(arena, n);
    set_p(arena, n, None);
    set_l(arena, n, None);
    set_r(arena, n, None);

    if let (Some(l), Some(r)) = (l, r) {
        let Some(lr) = get_r(arena, l) else {
            // Left child is the in-order predecessor: lift it into place.
            if let Some(p) = p {
                replace_child(arena, p, n, Some(l));
            }
            set_p(arena, l, p);
            set_r(arena, l, Some(r));
            set_p(arena, r, Some(l));
            let nbf = bf(arena, n);
            if p.is_some() {
                set_bf(arena, l, nbf);
                return l_rebalance(arena, root, l, 1);
            }

            let lbf = nbf - 1;
            set_bf(arena, l, lbf);
            if lbf >= -1 {
                return Some(l);
            }
            return Some(match get_l(arena, r) {
                Some(rl) if bf(arena, r) > 0 => {
                    rl_rotate(arena, l, r, rl);
                    rl
                }
                _ => {
                    rr_rotate(arena, l, r);
                    r
                }
            });
        };

        // In-order predecessor sits deeper on the right spine of `l`.
        let mut vp = l;
        let mut v = lr;
        while let Some(tmp) = get_r(arena, v) {
            vp = v;
            v = tmp;
        }
        let vc = get_l(arena, v);

        if let Some(p) = p {
            replace_child(arena, p, n, Some(v));
        }
        set_p(arena, v, p);
        set_r(arena, v, Some(r));
        let nbf = bf(arena, n);
        set_bf(arena, v, nbf);
        set_l(arena, v, Some(l));
        set_p(arena, l, Some(v));
        set_p(arena, r, Some(v));

        set_r(arena, vp, vc);
        if let Some(vc) = vc {
            set_p(arena, vc, Some(vp));
        }

        let root = if p.is_some() { root } else { v };
        return r_rebalance(arena, root, vp, 1);
    }

    let c = l.or(r);
    if let Some(c) = c {
        set_p(arena, c, p);
    }
    let Some(p) = p else {
        return c;
    };

    if get_l(arena, p) == Some(n) {
        set_l(arena, p, c);
        l_rebalance(arena, root, p, 1)
    } else {
        set_r(arena, p, c);
        r_rebalance(arena, root, p, 1)
    }
}

/// Left subtree of `n` got `d` shorter.
fn l_rebalance<N: AvlNode>(arena: &mut [N], root: u32, mut n: u32, d: i32) -> Option<u32> {
    let nbf = bf(arena, n) - d;
    set_bf(arena, n, nbf);
    let mut next_d = d;

    if nbf == -1 {
        return Some(root);
    }

    if nbf < -1 {
        if let Some(u) = get_r(arena, n) {
            n = match get_l(arena, u) {
                Some(ul) if bf(arena, u) > 0 => {
                    rl_rotate(arena, n, u, ul);
                    ul
                }
                ul => {
                    if ul.is_some() && bf(arena, u) == 0 {
                        next_d = 0;
                    }
                    rr_rotate(arena, n, u);
                    u
                }
            };
        }
    }

    let Some(p) = get_p(arena, n) else {
        return Some(n);
    };

    if get_l(arena, p) == Some(n) {
        l_rebalance(arena, root, p, next_d)
    } else {
        r_rebalance(arena, root, p, next_d)
    }
}

/// Right subtree of `n` got `d` shorter.
fn r_rebalance<N: AvlNode>(arena: &mut [N], root: u32, mut n: u32, d: i32) -> Option<u32> {
    let nbf = bf(arena, n) + d;
    set_bf(arena, n, nbf);
    let mut next_d = d;

    if nbf == 1 {
        return Some(root);
    }

    if nbf > 1 {
        if let Some(u) = get_l(arena, n) {
            n = match get_r(arena, u) {
                Some(ur) if bf(arena, u) < 0 => {
                    lr_rotate(arena, n, u, ur);
                    ur
                }
                ur => {
                    if ur.is_some() && bf(arena, u) == 0 {
                        next_d = 0;
                    }
                    ll_rotate(arena, n, u);
                    u
                }
            };
        }
    }

    let Some(p) = get_p(arena, n) else {
        return Some(n);
    };

    if get_l(arena, p) == Some(n) {
        l_rebalance(arena, root, p, next_d)
    } else {
        r_rebalance(arena, root, p, next_d)
    }
}

fn tree_height<N: AvlNode>(arena: &[N], node: u32) -> i32 {
    let l = get_l(arena, node).map_or(0, |i| tree_height(arena, i));
    let r = get_r(arena, node).map_or(0, |i| tree_height(arena, i));
    1 + l.max(r)
}

fn validate_links_and_bf<N: AvlNode>(arena: &[N], node: u32) -> Result<(), TreeError> {
    let l = get_l(arena, node);
    let r = get_r(arena, node);

    if let Some(l) = l {
        if get_p(arena, l) != Some(node) {
            return Err(TreeError::BrokenParentLink { node, side: "left" });
        }
        validate_links_and_bf(arena, l)?;
    }
    if let Some(r) = r {
        if get_p(arena, r) != Some(node) {
            return Err(TreeError::BrokenParentLink { node, side: "right" });
        }
        validate_links_and_bf(arena, r)?;
    }

    let lh = l.map_or(0, |i| tree_height(arena, i));
    let rh = r.map_or(0, |i| tree_height(arena, i));
    let expected = lh - rh;
    let actual = bf(arena, node);
    if actual != expected {
        return Err(TreeError::BalanceFactor {
            node,
            expected,
            actual,
        });
    }
    if !(-1..=1).contains(&actual) {
        return Err(TreeError::Unbalanced(node));
    }

    Ok(())
}

/// Checks parent links, balance factors and strict in-order key ordering.
pub fn assert_avl_tree<N>(arena: &[N], root: Option<u32>) -> Result<(), TreeError>
where
    N: AvlNode + Keyed,
{
    let Some(root) = root else {
        return Ok(());
    };

    if get_p(arena, root).is_some() {
        return Err(TreeError::RootHasParent(root));
    }

    validate_links_and_bf(arena, root)?;

    let mut curr = first(arena, Some(root));
    let mut prev_node: Option<u32> = None;
    while let Some(i) = curr {
        if let Some(prev) = prev_node {
            if arena[prev as usize].key() >= arena[i as usize].key() {
                return Err(TreeError::OrderViolated(i));
            }
        }
        prev_node = Some(i);
        curr = next(arena, i);
    }

    Ok(())
}

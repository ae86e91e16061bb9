//! Version-keyed AVL tree holding [`Entry`] handles.

use std::cmp::Ordering;

use crate::avl;
use crate::entry::Entry;
use crate::error::TreeError;
use crate::find::Find;
use crate::types::{AvlNode, Keyed, Node};
use crate::util::{ceil, find, first, floor, last, next, prev, size};

/// Arena slot. Recycled slots have no entry and no links.
#[derive(Clone, Debug)]
pub struct VersionNode {
    pub p: Option<u32>,
    pub l: Option<u32>,
    pub r: Option<u32>,
    pub bf: i32,
    pub ver: i64,
    pub entry: Option<Entry>,
}

impl VersionNode {
    pub fn new(entry: Entry) -> Self {
        Self {
            p: None,
            l: None,
            r: None,
            bf: 0,
            ver: entry.ver(),
            entry: Some(entry),
        }
    }
}

impl Node for VersionNode {
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

impl AvlNode for VersionNode {
    fn bf(&self) -> i32 {
        self.bf
    }

    fn set_bf(&mut self, bf: i32) {
        self.bf = bf;
    }
}

impl Keyed for VersionNode {
    type Key = i64;

    fn key(&self) -> &i64 {
        &self.ver
    }
}

/// Arena-backed AVL tree ordered by version.
///
/// Not synchronized; [`VersionList`](crate::VersionList) wraps it in a lock.
/// Indices returned by this type stay valid until the node is removed.
#[derive(Debug, Default)]
pub struct VersionTree {
    arena: Vec<VersionNode>,
    free: Vec<u32>,
    root: Option<u32>,
    min: Option<u32>,
    max: Option<u32>,
    len: usize,
}

impl VersionTree {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn first(&self) -> Option<u32> {
        self.min
    }

    pub fn last(&self) -> Option<u32> {
        self.max
    }

    pub fn next(&self, idx: u32) -> Option<u32> {
        next(&self.arena, idx)
    }

    pub fn prev(&self, idx: u32) -> Option<u32> {
        prev(&self.arena, idx)
    }

    pub fn key(&self, idx: u32) -> i64 {
        self.arena[idx as usize].ver
    }

    pub fn entry(&self, idx: u32) -> Option<&Entry> {
        self.arena[idx as usize].entry.as_ref()
    }

    /// Exact match.
    pub fn find(&self, ver: i64) -> Option<u32> {
        find(&self.arena, self.root, &ver)
    }

    /// Greatest version `<= ver`.
    pub fn floor(&self, ver: i64) -> Option<u32> {
        floor(&self.arena, self.root, &ver)
    }

    /// Smallest version `>= ver`.
    pub fn ceil(&self, ver: i64) -> Option<u32> {
        ceil(&self.arena, self.root, &ver)
    }

    /// Resolves `ver` to at most one node according to `mode`.
    ///
    /// `Prev` and `Next` start from the inclusive boundary and step over an
    /// exact hit. `Nearest` is `Upto`, falling back to `Next`.
    pub fn seek(&self, ver: i64, mode: Find) -> Option<u32> {
        match mode {
            Find::Exact => self.find(ver),
            Find::Upto => self.floor(ver),
            Find::Prev => {
                let idx = self.floor(ver)?;
                if self.key(idx) == ver {
                    self.prev(idx)
                } else {
                    Some(idx)
                }
            }
            Find::Next => {
                let idx = self.ceil(ver)?;
                if self.key(idx) == ver {
                    self.next(idx)
                } else {
                    Some(idx)
                }
            }
            Find::Nearest => self
                .seek(ver, Find::Upto)
                .or_else(|| self.seek(ver, Find::Next)),
        }
    }

    /// Seeks and clones out the resolved entry handle.
    pub fn get(&self, ver: i64, mode: Find) -> Option<Entry> {
        self.seek(ver, mode)
            .and_then(|idx| self.entry(idx))
            .cloned()
    }

    fn alloc(&mut self, entry: Entry) -> u32 {
        let node = VersionNode::new(entry);
        match self.free.pop() {
            Some(idx) => {
                self.arena[idx as usize] = node;
                idx
            }
            None => {
                self.arena.push(node);
                (self.arena.len() - 1) as u32
            }
        }
    }

    fn replace(&mut self, idx: u32, entry: Entry) -> u32 {
        self.arena[idx as usize].entry = Some(entry);
        idx
    }

    /// Inserts `entry` at its version and returns its index.
    ///
    /// If the version is already present the slot's entry handle is swapped
    /// for `entry`; the tree shape is unchanged.
    pub fn insert(&mut self, entry: Entry) -> u32 {
        let ver = entry.ver();
        let (Some(root), Some(min), Some(max)) = (self.root, self.min, self.max) else {
            let idx = self.alloc(entry);
            self.root = Some(idx);
            self.min = Some(idx);
            self.max = Some(idx);
            self.len = 1;
            return idx;
        };

        match ver.cmp(&self.key(max)) {
            Ordering::Equal => return self.replace(max, entry),
            Ordering::Greater => {
                let idx = self.alloc(entry);
                self.root = Some(avl::insert_right(&mut self.arena, root, idx, max));
                self.max = Some(idx);
                self.len += 1;
                return idx;
            }
            Ordering::Less => {}
        }

        match ver.cmp(&self.key(min)) {
            Ordering::Equal => return self.replace(min, entry),
            Ordering::Less => {
                let idx = self.alloc(entry);
                self.root = Some(avl::insert_left(&mut self.arena, root, idx, min));
                self.min = Some(idx);
                self.len += 1;
                return idx;
            }
            Ordering::Greater => {}
        }

        let mut curr = root;
        loop {
            let VersionNode { l, r, ver: at, .. } = self.arena[curr as usize];
            match ver.cmp(&at) {
                Ordering::Equal => return self.replace(curr, entry),
                Ordering::Less => match l {
                    Some(l) => curr = l,
                    None => {
                        let idx = self.alloc(entry);
                        self.root = Some(avl::insert_left(&mut self.arena, root, idx, curr));
                        self.len += 1;
                        return idx;
                    }
                },
                Ordering::Greater => match r {
                    Some(r) => curr = r,
                    None => {
                        let idx = self.alloc(entry);
                        self.root = Some(avl::insert_right(&mut self.arena, root, idx, curr));
                        self.len += 1;
                        return idx;
                    }
                },
            }
        }
    }

    /// Unlinks the node at `idx`, recycles its slot and returns its entry.
    pub fn remove(&mut self, idx: u32) -> Option<Entry> {
        let root = self.root?;
        self.arena[idx as usize].entry.as_ref()?;

        if self.max == Some(idx) {
            self.max = prev(&self.arena, idx);
        }
        if self.min == Some(idx) {
            self.min = next(&self.arena, idx);
        }

        self.root = avl::remove(&mut self.arena, root, idx);
        self.len -= 1;
        if self.root.is_none() {
            self.min = None;
            self.max = None;
            self.len = 0;
        }

        let node = &mut self.arena[idx as usize];
        node.bf = 0;
        let entry = node.entry.take();
        self.free.push(idx);
        entry
    }

    /// Ascending iterator over entries.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            curr: self.min,
        }
    }

    pub fn assert_valid(&self) -> Result<(), TreeError> {
        avl::assert_avl_tree(&self.arena, self.root)?;
        if size(&self.arena, self.root) != self.len
            || self.len + self.free.len() != self.arena.len()
        {
            return Err(TreeError::StaleCache { what: "len" });
        }
        if first(&self.arena, self.root) != self.min {
            return Err(TreeError::StaleCache { what: "min" });
        }
        if last(&self.arena, self.root) != self.max {
            return Err(TreeError::StaleCache { what: "max" });
        }
        Ok(())
    }
}

pub struct Iter<'a> {
    tree: &'a VersionTree,
    curr: Option<u32>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(idx) = self.curr {
            self.curr = self.tree.next(idx);
            if let Some(entry) = self.tree.entry(idx) {
                return Some(entry);
            }
        }
        None
    }
}

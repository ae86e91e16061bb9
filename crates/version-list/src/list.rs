use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::entry::{Entry, Owner};
use crate::error::TreeError;
use crate::find::Find;
use crate::options::ListOptions;
use crate::tree::VersionTree;

/// State shared between a list and the entries it hands out.
pub(crate) struct Shared {
    pub(crate) tree: RwLock<VersionTree>,
    /// Bumped by every `clr`, always while holding the write lock.
    epoch: AtomicU64,
    capacity: usize,
}

impl Shared {
    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }
}

/// Concurrent in-memory list of entries ordered by version.
///
/// All access goes through a single reader/writer lock: `clr`, `put`, `del`
/// and `exp` are exclusive, `get`, `len`, `min`, `max` and `walk` are
/// shared. Cloning the list clones the handle; clones see the same entries.
#[derive(Clone)]
pub struct VersionList {
    shared: Arc<Shared>,
}

impl Default for VersionList {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_options(ListOptions::default())
    }

    pub fn with_options(options: ListOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                tree: RwLock::new(VersionTree::with_capacity(options.capacity)),
                epoch: AtomicU64::new(0),
                capacity: options.capacity,
            }),
        }
    }

    /// Removes every entry.
    ///
    /// Entries obtained before the clear are detached: they keep their last
    /// version and value, but `prev`, `next` and `del` on them no longer
    /// reach this list.
    pub fn clr(&self) {
        let old = {
            let mut tree = self.shared.tree.write();
            self.shared.epoch.fetch_add(1, Ordering::AcqRel);
            std::mem::replace(&mut *tree, VersionTree::with_capacity(self.shared.capacity))
        };
        debug!(dropped = old.len(), "list cleared");
    }

    /// Inserts a value at `ver`, or replaces the value of the entry already
    /// stored there. Returns the attached entry.
    ///
    /// An existing entry's value is replaced after the list lock is
    /// released, exactly like [`Entry::set`].
    pub fn put(&self, ver: i64, val: impl Into<Vec<u8>>) -> Entry {
        let val = val.into();
        let existing = {
            let mut tree = self.shared.tree.write();
            match tree.get(ver, Find::Exact) {
                Some(entry) => entry,
                None => {
                    let owner = Owner {
                        list: Arc::downgrade(&self.shared),
                        epoch: self.shared.epoch(),
                    };
                    let entry = Entry::attached(ver, val, owner);
                    tree.insert(entry.clone());
                    trace!(ver, "entry inserted");
                    return entry;
                }
            }
        };

        // Value locks are never taken under the list lock.
        existing.replace(val);
        trace!(ver, "entry updated");
        existing
    }

    /// Removes and detaches the entry resolved by `ver` and `mode`.
    pub fn del(&self, ver: i64, mode: Find) -> Option<Entry> {
        let mut tree = self.shared.tree.write();
        let idx = tree.seek(ver, mode)?;
        let entry = tree.remove(idx)?;
        entry.detach();
        trace!(ver = entry.ver(), %mode, "entry deleted");
        Some(entry)
    }

    /// Removes every entry up to and including the one resolved by `ver` and
    /// `mode`, and returns that entry.
    ///
    /// All removed entries are detached. Nothing is removed if `mode`
    /// resolves to no entry.
    pub fn exp(&self, ver: i64, mode: Find) -> Option<Entry> {
        let mut tree = self.shared.tree.write();
        let target = tree.get(ver, mode)?;
        let upto = target.ver();

        let mut removed = 0usize;
        while let Some(idx) = tree.first() {
            if tree.key(idx) > upto {
                break;
            }
            if let Some(entry) = tree.remove(idx) {
                entry.detach();
            }
            removed += 1;
        }

        debug!(upto, removed, "entries expunged");
        Some(target)
    }

    /// Looks up the entry resolved by `ver` and `mode`.
    pub fn get(&self, ver: i64, mode: Find) -> Option<Entry> {
        self.shared.tree.read().get(ver, mode)
    }

    pub fn len(&self) -> usize {
        self.shared.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.tree.read().is_empty()
    }

    /// Entry with the smallest version. In a time-series list this is the
    /// initial version.
    pub fn min(&self) -> Option<Entry> {
        let tree = self.shared.tree.read();
        tree.first().and_then(|idx| tree.entry(idx)).cloned()
    }

    /// Entry with the largest version. In a time-series list this is the
    /// latest version.
    pub fn max(&self) -> Option<Entry> {
        let tree = self.shared.tree.read();
        tree.last().and_then(|idx| tree.entry(idx)).cloned()
    }

    /// Visits entries in ascending version order while `visit` returns
    /// `true`.
    ///
    /// The read lock is held for the whole walk, so `visit` must not call
    /// back into this list or into the locking methods of its entries
    /// (`del`, `prev`, `next`); doing so deadlocks.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&Entry) -> bool,
    {
        let tree = self.shared.tree.read();
        for entry in tree.iter() {
            if !visit(entry) {
                break;
            }
        }
    }

    /// Validates the underlying tree under the read lock.
    pub fn assert_valid(&self) -> Result<(), TreeError> {
        self.shared.tree.read().assert_valid()
    }
}

impl std::fmt::Debug for VersionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries: Vec<Entry> = self.shared.tree.read().iter().cloned().collect();
        f.debug_list().entries(&entries).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(versions: &[i64]) -> VersionList {
        let list = VersionList::new();
        for &v in versions {
            list.put(v, v.to_string());
        }
        list
    }

    fn versions(list: &VersionList) -> Vec<i64> {
        let mut out = Vec::new();
        list.walk(|e| {
            out.push(e.ver());
            true
        });
        out
    }

    #[test]
    fn empty_list() {
        let list = VersionList::new();
        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        assert!(list.min().is_none());
        assert!(list.max().is_none());
        for mode in Find::ALL {
            assert!(list.get(0, mode).is_none());
            assert!(list.del(0, mode).is_none());
            assert!(list.exp(0, mode).is_none());
        }
    }

    #[test]
    fn put_same_version_updates_in_place() {
        let list = VersionList::new();
        let a = list.put(5, "a");
        let b = list.put(5, "b");
        assert_eq!(list.len(), 1);
        assert!(a.ptr_eq(&b));
        assert_eq!(a.val(), b"b");
        assert_eq!(list.get(5, Find::Exact).unwrap().val(), b"b");
    }

    #[test]
    fn clones_share_entries() {
        let list = list_of(&[1, 2]);
        let other = list.clone();
        other.put(3, "3");
        assert_eq!(versions(&list), vec![1, 2, 3]);
    }

    #[test]
    fn exp_detaches_everything_it_removes() {
        let list = list_of(&[10, 20, 30]);
        let ten = list.get(10, Find::Exact).unwrap();
        let twenty = list.exp(20, Find::Upto).unwrap();
        assert_eq!(twenty.ver(), 20);
        assert!(!twenty.is_attached());
        assert!(!ten.is_attached());
        assert_eq!(versions(&list), vec![30]);
        list.assert_valid().unwrap();
    }

    #[test]
    fn clr_detaches_previous_entries() {
        let list = list_of(&[1, 2, 3]);
        let two = list.get(2, Find::Exact).unwrap();
        list.clr();
        assert!(list.is_empty());
        assert!(!two.is_attached());
        assert!(two.next().is_none());

        let fresh = list.put(2, "new");
        two.del();
        assert!(fresh.is_attached());
        assert_eq!(list.len(), 1);
        assert_eq!(two.val(), b"2");
    }

    #[test]
    fn debug_lists_entries() {
        let list = VersionList::new();
        list.put(1, vec![9]);
        assert_eq!(format!("{list:?}"), "[Entry { ver: 1, val: [9] }]");
    }
}

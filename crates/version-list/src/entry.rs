//! Version/value pairs handed out by a [`VersionList`](crate::VersionList).

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::find::Find;
use crate::list::Shared;

// Both per-entry locks are leaves: neither is held while taking any other
// lock or while running caller code.

/// Back-reference to the list holding an entry.
///
/// `epoch` is the list epoch at attach time; a later `clr` bumps the list
/// epoch and so detaches every entry issued before it.
#[derive(Clone)]
pub(crate) struct Owner {
    pub(crate) list: Weak<Shared>,
    pub(crate) epoch: u64,
}

struct Inner {
    ver: i64,
    val: RwLock<Arc<[u8]>>,
    owner: Mutex<Option<Owner>>,
}

/// A version and its value.
///
/// Cloning an `Entry` clones the handle, not the data: all clones observe
/// the same value and the same attachment state. An entry removed from its
/// list becomes a detached snapshot of its last version and value.
#[derive(Clone)]
pub struct Entry(Arc<Inner>);

impl Entry {
    pub(crate) fn attached(ver: i64, val: Vec<u8>, owner: Owner) -> Self {
        Self(Arc::new(Inner {
            ver,
            val: RwLock::new(val.into()),
            owner: Mutex::new(Some(owner)),
        }))
    }

    #[cfg(test)]
    pub(crate) fn detached(ver: i64, val: Vec<u8>) -> Self {
        Self(Arc::new(Inner {
            ver,
            val: RwLock::new(val.into()),
            owner: Mutex::new(None),
        }))
    }

    /// Returns the version of this entry.
    pub fn ver(&self) -> i64 {
        self.0.ver
    }

    /// Returns a copy of the current value.
    pub fn val(&self) -> Vec<u8> {
        self.0.val.read().to_vec()
    }

    /// Runs `f` against the current value without copying it.
    ///
    /// `f` sees the value as it was when called; no lock is held while it
    /// runs, so it may use the list and this entry freely.
    pub fn with_val<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let val = Arc::clone(&*self.0.val.read());
        f(&val)
    }

    /// Replaces the value in place and returns the entry for chaining.
    ///
    /// Does not touch the list lock since ordering is unaffected.
    pub fn set(&self, val: impl Into<Vec<u8>>) -> &Self {
        self.replace(val.into());
        self
    }

    pub(crate) fn replace(&self, val: Vec<u8>) {
        *self.0.val.write() = val.into();
    }

    /// Whether both handles refer to the same entry.
    pub fn ptr_eq(&self, other: &Entry) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether this entry is still held by a live list.
    pub fn is_attached(&self) -> bool {
        self.owner().is_some()
    }

    /// Live owning list and attach epoch, if the entry is attached and the
    /// list has not been cleared since. The owner mutex is released before
    /// returning so callers can take the list lock.
    fn owner(&self) -> Option<(Arc<Shared>, u64)> {
        let owner = self.0.owner.lock().clone()?;
        let shared = owner.list.upgrade()?;
        (shared.epoch() == owner.epoch).then_some((shared, owner.epoch))
    }

    pub(crate) fn detach(&self) {
        *self.0.owner.lock() = None;
    }

    /// Removes this entry from its list and detaches it.
    ///
    /// Detached entries are returned unchanged.
    pub fn del(&self) -> &Self {
        let Some((shared, _)) = self.owner() else {
            self.detach();
            return self;
        };
        let mut tree = shared.tree.write();
        let idx = tree
            .find(self.ver())
            .filter(|&idx| tree.entry(idx).is_some_and(|e| e.ptr_eq(self)));
        if let Some(idx) = idx {
            tree.remove(idx);
            trace!(ver = self.ver(), "entry removed itself");
        }
        self.detach();
        self
    }

    /// Entry just before this one in its list.
    pub fn prev(&self) -> Option<Entry> {
        self.seek(Find::Prev)
    }

    /// Entry just after this one in its list.
    pub fn next(&self) -> Option<Entry> {
        self.seek(Find::Next)
    }

    fn seek(&self, mode: Find) -> Option<Entry> {
        let (shared, epoch) = self.owner()?;
        let tree = shared.tree.read();
        if shared.epoch() != epoch {
            return None;
        }
        tree.get(self.ver(), mode)
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("ver", &self.0.ver)
            .field("val", &&**self.0.val.read())
            .finish()
    }
}

//! Concurrent, in-memory, version-ordered list.
//!
//! Each [`Entry`] pairs a monotonic `i64` version (a logical timestamp or
//! sequence number) with an opaque byte value. A [`VersionList`] keeps
//! entries sorted by version in an arena-backed AVL tree behind a single
//! reader/writer lock, and resolves lookups by exact version or by direction
//! through [`Find`].
//!
//! ```
//! use version_list::{Find, VersionList};
//!
//! let list = VersionList::new();
//! list.put(10, "a");
//! list.put(20, "b");
//! list.put(30, "c");
//!
//! assert_eq!(list.get(25, Find::Upto).map(|e| e.ver()), Some(20));
//! assert_eq!(list.get(20, Find::Prev).map(|e| e.ver()), Some(10));
//!
//! let twenty = list.get(20, Find::Exact).unwrap();
//! assert_eq!(twenty.next().map(|e| e.val()), Some(b"c".to_vec()));
//!
//! list.exp(20, Find::Upto);
//! assert_eq!(list.min().map(|e| e.ver()), Some(30));
//! ```

pub(crate) mod avl;
pub mod entry;
pub mod error;
pub mod find;
pub mod list;
pub mod options;
pub(crate) mod tree;
pub(crate) mod types;
pub(crate) mod util;

pub use entry::Entry;
pub use error::{FindError, TreeError};
pub use find::Find;
pub use list::VersionList;
pub use options::ListOptions;

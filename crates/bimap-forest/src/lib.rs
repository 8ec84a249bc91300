//! Arena-backed bidirectional ordered map.
//!
//! A [`BiTreeMap<L, R>`] stores pairs with a unique left key and a unique
//! right key. Each pair is one record in an arena, and each record carries
//! two sets of tree links:
//!
//! - **Left tree**: a binary search tree ordered by `L`.
//! - **Right tree**: a binary search tree ordered by `R`, over the same
//!   records.
//!
//! Insert and erase update both trees before returning, so the two trees
//! always hold the same set of records. Because both halves of a record live
//! in one arena slot, a [`Cursor`] on one side [`flip`](Cursor::flip)s to the
//! other in O(1).
//!
//! "Pointers" are `Option<u32>` slot handles rather than references, and
//! slot 0 is a sentinel anchoring both roots and doubling as the `end`
//! position.
//!
//! ```
//! use bimap_forest::BiTreeMap;
//!
//! let mut ids = BiTreeMap::new();
//! ids.insert(1, "a".to_string());
//! ids.insert(2, "b".to_string());
//!
//! let by_id = ids.find_left(&2);
//! assert_eq!(ids.right(by_id.flip()).map(String::as_str), Some("b"));
//! assert_eq!(ids.get_by_right("a"), Some(&1));
//! ```
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`types`] | [`Side`] markers, [`Linkage`] and the [`Node`] accessor trait |
//! | [`record`] | [`Record`], the two-linkage storage unit, and the sentinel slot |
//! | [`util`] | Search tree routines (`locate`, `attach`, `erase`, `next`, …) |
//! | [`bimap`] | [`BiTreeMap`], [`Cursor`] and [`Iter`] |
//! | [`error`] | [`Error`] and [`InvariantError`] |
//!
//! # Features
//!
//! - `check-invariants`: validate both trees after every insert and erase.
//! - `serde`: (de)serialize as a sequence of `(left, right)` pairs.

pub mod bimap;
pub mod error;
pub mod record;
pub mod types;
pub mod util;

#[cfg(feature = "serde")]
mod serde_impl;

pub use bimap::{BiTreeMap, Cursor, Iter, LeftCursor, RightCursor};
pub use error::{Error, InvariantError};
pub use record::{Record, SENTINEL};
pub use types::{Left, Linkage, Node, Right, Side, SideKind};

//! Generic data structures: a configurable binary heap and an id-indexed tree
//!
//! This crate provides two small, independent structures:
//!
//! - **[`Heap`]**: an array-backed binary heap whose ordering direction
//!   (min or max) and compared field are runtime configuration rather than
//!   type-level choices. Supports batched extraction, in-place heapsort,
//!   O(n) bulk loading, and reconfiguration with automatic re-heapify.
//! - **[`Tree`]**: a rooted n-ary tree built from a nested, JSON-like
//!   record format, with O(1) id lookup through a side index, single-node
//!   insert/delete, and depth-first/breadth-first traversal with early
//!   stop. Diagnostics flow through an injectable [`Notifier`] seam.
//!
//! Both structures are single-threaded and synchronous; no operation
//! performs I/O or suspends.
//!
//! # Example
//!
//! ```rust
//! use dskit::{Heap, HeapOrder, NodeRecord, Tree};
//!
//! let mut heap = Heap::new(HeapOrder::Min);
//! heap.insert_all([5, 3, 8, 1, 9, 2]);
//! heap.pop(3, |items| assert_eq!(items, vec![1, 2, 3]));
//!
//! let tree = Tree::from_record(NodeRecord::with_children(
//!     "root",
//!     vec![NodeRecord::new("left"), NodeRecord::new("right")],
//! ));
//! assert_eq!(tree.find("left").unwrap().depth, 1);
//! ```

pub mod heap;
pub mod traits;
pub mod tree;

pub use heap::{Heap, HeapOrder};
pub use traits::Keyed;
pub use tree::{
    LogNotifier, NodeId, NodeKey, NodeRecord, NoticeKind, Notifier, Tree, TreeError, TreeNode,
    TreeNotice,
};

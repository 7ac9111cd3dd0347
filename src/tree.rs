//! Id-indexed n-ary tree
//!
//! A rooted, multi-child tree materialized from a nested record format
//! (see [`NodeRecord`]) with O(1) id-based lookup through a side index.
//!
//! # Design
//!
//! Nodes live in a generational arena ([`slotmap`]) and reference each
//! other by [`NodeKey`]. The children list is the sole ownership edge;
//! the `parent` field is a non-owning back-reference used only for
//! unlinking. An [`FxHashMap`] keeps the id → key index that `find`,
//! `insert` and `delete` go through.
//!
//! The index and the reachable node set stay in bijection, with two
//! documented exceptions carried over from the tree's contract:
//!
//! - A duplicate id in the construction input is reported through the
//!   [`Notifier`] and the later record overwrites the earlier index
//!   entry. Both nodes remain structurally linked.
//! - `delete` removes only the named node from the index. Its
//!   descendants stay indexed (and findable) even though no traversal
//!   reaches them anymore. Nothing cascades.
//!
//! Diagnostics are structured [`TreeNotice`] values pushed through the
//! injected [`Notifier`]; the default [`LogNotifier`] hands them to the
//! `log` facade. Presentation is entirely the host's concern.
//!
//! # Example
//!
//! ```rust
//! use dskit::{NodeRecord, Tree};
//!
//! let record: NodeRecord = serde_json::from_value(serde_json::json!({
//!     "id": "root",
//!     "children": [
//!         { "id": "a", "children": [{ "id": "a1" }] },
//!         { "id": "b" },
//!     ],
//! }))
//! .unwrap();
//!
//! let tree = Tree::from_record(record);
//! assert_eq!(tree.size(), 4);
//! assert_eq!(tree.height(), 2);
//! assert_eq!(tree.find("a1").unwrap().depth, 2);
//! ```

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use thiserror::Error;

new_key_type! {
    /// Generational arena key addressing one [`TreeNode`].
    pub struct NodeKey;
}

/// A node id from the construction input: a JSON string or number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    /// Numeric id.
    Num(i64),
    /// String id.
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Num(n) => write!(f, "{n}"),
            NodeId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Num(n)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Text(s.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Text(s)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

/// One record of the nested construction input.
///
/// The wire shape is `{ "id": ..., "children": [...], ...payload }`:
/// `children` may be omitted, and every unrecognized field is captured
/// into `payload` verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Caller-supplied id, expected to be unique across the tree.
    pub id: NodeId,
    /// Nested child records, outermost first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeRecord>,
    /// Arbitrary caller payload fields.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl NodeRecord {
    /// A childless record with an empty payload.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            payload: Map::new(),
        }
    }

    /// A record with the given children.
    pub fn with_children(id: impl Into<NodeId>, children: Vec<NodeRecord>) -> Self {
        Self {
            id: id.into(),
            children,
            payload: Map::new(),
        }
    }
}

/// Non-fatal fault raised by tree operations.
///
/// Neither variant aborts anything: construction continues past a
/// duplicate id, and a failed insert leaves the tree untouched. They are
/// reported through the [`Notifier`] instead of being returned as
/// `Err` values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// `insert` named a parent id the index does not know.
    #[error("id {0} not found in the tree, insert failed")]
    ParentNotFound(NodeId),
    /// Two construction records carried the same id; the later one wins
    /// the index slot.
    #[error("repeated id {0} in construction input")]
    DuplicateId(NodeId),
}

/// Coarse classification of a [`TreeNotice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The operation went through.
    Ready,
    /// Something was off; see the notice message.
    Error,
}

/// A structured diagnostic emitted by the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNotice {
    /// A single-node insert succeeded.
    Inserted(NodeId),
    /// An operation hit a non-fatal fault.
    Failed(TreeError),
}

impl TreeNotice {
    /// The notice's classification, for routing to a presentation layer.
    pub fn kind(&self) -> NoticeKind {
        match self {
            TreeNotice::Inserted(_) => NoticeKind::Ready,
            TreeNotice::Failed(_) => NoticeKind::Error,
        }
    }
}

impl fmt::Display for TreeNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeNotice::Inserted(id) => write!(f, "insert {id} success"),
            TreeNotice::Failed(err) => err.fmt(f),
        }
    }
}

/// Sink for tree diagnostics, injected at construction time.
pub trait Notifier {
    /// Receives one notice. Implementations decide presentation.
    fn notify(&self, notice: &TreeNotice);
}

/// Default [`Notifier`] routing notices to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: &TreeNotice) {
        match notice.kind() {
            NoticeKind::Ready => log::info!("{notice}"),
            NoticeKind::Error => log::error!("{notice}"),
        }
    }
}

/// One materialized tree entity.
///
/// Fields are read-only from the outside; the owning [`Tree`] hands out
/// shared references only.
#[derive(Debug)]
pub struct TreeNode {
    /// Caller-supplied id.
    pub id: NodeId,
    /// Arbitrary payload fields from the construction record.
    pub payload: Map<String, Value>,
    /// Non-owning back-reference, `None` for the root.
    pub parent: Option<NodeKey>,
    /// Ordered child keys; the ownership edge.
    pub children: SmallVec<[NodeKey; 4]>,
    /// Distance from the root, root = 0.
    pub depth: usize,
    /// True iff the source record had no children. Reflects only the
    /// initial shape; later inserts under this node do not clear it.
    pub leaf: bool,
}

/// A rooted n-ary tree with O(1) id lookup.
///
/// See the [module documentation](self) for the index/graph contract.
pub struct Tree {
    nodes: SlotMap<NodeKey, TreeNode>,
    root: Option<NodeKey>,
    index: FxHashMap<NodeId, NodeKey>,
    notifier: Box<dyn Notifier>,
}

impl Tree {
    /// Builds a tree from a nested record, reporting through the default
    /// [`LogNotifier`].
    pub fn from_record(record: NodeRecord) -> Self {
        Self::with_notifier(record, Box::new(LogNotifier))
    }

    /// Builds a tree from a nested record with an injected notifier.
    ///
    /// Records are materialized depth-first, children in input order,
    /// and registered into the index as they are created. A duplicate id
    /// is reported and then overwrites the earlier entry; the build
    /// never aborts.
    pub fn with_notifier(record: NodeRecord, notifier: Box<dyn Notifier>) -> Self {
        let mut tree = Self {
            nodes: SlotMap::with_key(),
            root: None,
            index: FxHashMap::default(),
            notifier,
        };
        tree.materialize(record, None, 0);
        tree
    }

    /// Number of indexed nodes.
    pub fn size(&self) -> usize {
        self.index.len()
    }

    /// Maximum depth over all indexed nodes; 0 for an empty tree.
    ///
    /// Computed by scanning the index, so detached-but-indexed nodes
    /// still count.
    pub fn height(&self) -> usize {
        self.index
            .values()
            .filter_map(|&key| self.nodes.get(key))
            .map(|node| node.depth)
            .max()
            .unwrap_or(0)
    }

    /// The root node, if the tree is populated.
    pub fn root(&self) -> Option<&TreeNode> {
        self.root.and_then(|key| self.nodes.get(key))
    }

    /// Resolves an arena key, for following `parent`/`children` links.
    pub fn node(&self, key: NodeKey) -> Option<&TreeNode> {
        self.nodes.get(key)
    }

    /// O(1) lookup by id.
    pub fn find(&self, id: impl Into<NodeId>) -> Option<&TreeNode> {
        self.index.get(&id.into()).and_then(|&key| self.nodes.get(key))
    }

    /// Appends one node under `parent_id`.
    ///
    /// An unknown parent is reported as [`TreeError::ParentNotFound`] and
    /// nothing is mutated. On success the node is linked into the
    /// parent's child list and the index, an [`TreeNotice::Inserted`]
    /// notice fires, and the new node's key is returned.
    ///
    /// Nested children inside `record` are NOT materialized here; only
    /// the initial construction path recurses. The record's child list
    /// still decides the new node's `leaf` flag.
    pub fn insert(&mut self, parent_id: impl Into<NodeId>, record: NodeRecord) -> Option<NodeKey> {
        let parent_id = parent_id.into();
        let parent_key = match self.index.get(&parent_id) {
            Some(&key) => key,
            None => {
                self.notifier
                    .notify(&TreeNotice::Failed(TreeError::ParentNotFound(parent_id)));
                return None;
            }
        };
        let depth = self.nodes[parent_key].depth + 1;

        let NodeRecord { id, children, payload } = record;
        let key = self.nodes.insert(TreeNode {
            id: id.clone(),
            payload,
            parent: Some(parent_key),
            children: SmallVec::new(),
            depth,
            leaf: children.is_empty(),
        });
        self.nodes[parent_key].children.push(key);
        self.index.insert(id.clone(), key);
        self.notifier.notify(&TreeNotice::Inserted(id));
        Some(key)
    }

    /// Detaches the node with `id` and drops it from the index.
    ///
    /// A non-root node is unlinked from its parent's child list (first
    /// exact match by position); deleting the root clears it and leaves
    /// the tree in its empty macro-state. Descendants of the deleted
    /// node keep their index entries: they stay findable by id while no
    /// traversal reaches them. Unknown ids are a silent no-op.
    pub fn delete(&mut self, id: impl Into<NodeId>) {
        let id = id.into();
        let key = match self.index.get(&id) {
            Some(&key) => key,
            None => return,
        };
        match self.nodes.get(key).and_then(|node| node.parent) {
            Some(parent_key) => {
                if let Some(parent) = self.nodes.get_mut(parent_key) {
                    if let Some(pos) = parent.children.iter().position(|&child| child == key) {
                        parent.children.remove(pos);
                    }
                }
            }
            None => self.root = None,
        }
        self.index.remove(&id);
    }

    /// Pre-order traversal: parent before children, children in list
    /// order. `visit` returning `true` stops the whole walk immediately,
    /// across all levels.
    pub fn depth_first_traversal(&self, mut visit: impl FnMut(&TreeNode) -> bool) {
        let mut stack: Vec<NodeKey> = Vec::new();
        stack.extend(self.root);
        while let Some(key) = stack.pop() {
            let node = match self.nodes.get(key) {
                Some(node) => node,
                None => continue,
            };
            if visit(node) {
                return;
            }
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Level-order traversal through a FIFO queue seeded with the root.
    /// Same early-stop contract as [`depth_first_traversal`](Self::depth_first_traversal).
    pub fn breadth_first_traversal(&self, mut visit: impl FnMut(&TreeNode) -> bool) {
        let mut queue: VecDeque<NodeKey> = VecDeque::new();
        queue.extend(self.root);
        while let Some(key) = queue.pop_front() {
            let node = match self.nodes.get(key) {
                Some(node) => node,
                None => continue,
            };
            if visit(node) {
                return;
            }
            queue.extend(node.children.iter().copied());
        }
    }

    fn materialize(&mut self, record: NodeRecord, parent: Option<NodeKey>, depth: usize) {
        let NodeRecord { id, children, payload } = record;
        if self.index.contains_key(&id) {
            self.notifier
                .notify(&TreeNotice::Failed(TreeError::DuplicateId(id.clone())));
        }
        let key = self.nodes.insert(TreeNode {
            id: id.clone(),
            payload,
            parent,
            children: SmallVec::new(),
            depth,
            leaf: children.is_empty(),
        });
        if let Some(parent_key) = parent {
            self.nodes[parent_key].children.push(key);
        }
        // Later records win the slot on id collisions.
        self.index.insert(id, key);
        if self.root.is_none() {
            self.root = Some(key);
        }
        for child in children {
            self.materialize(child, Some(key), depth + 1);
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("size", &self.index.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Notifier that records everything it sees.
    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<TreeNotice>>>);

    impl Notifier for Recorder {
        fn notify(&self, notice: &TreeNotice) {
            self.0.borrow_mut().push(notice.clone());
        }
    }

    fn sample_record() -> NodeRecord {
        NodeRecord::with_children(
            "root",
            vec![
                NodeRecord::with_children("a", vec![NodeRecord::new("a1"), NodeRecord::new("a2")]),
                NodeRecord::new("b"),
            ],
        )
    }

    #[test]
    fn construction_indexes_every_record() {
        let tree = Tree::from_record(sample_record());
        assert_eq!(tree.size(), 5);
        assert_eq!(tree.height(), 2);
        for (id, depth) in [("root", 0), ("a", 1), ("b", 1), ("a1", 2), ("a2", 2)] {
            let node = tree.find(id).unwrap();
            assert_eq!(node.depth, depth);
            assert_eq!(node.id, NodeId::from(id));
        }
        assert!(tree.find("missing").is_none());
    }

    #[test]
    fn leaf_reflects_initial_shape_only() {
        let mut tree = Tree::from_record(sample_record());
        assert!(tree.find("b").unwrap().leaf);
        assert!(!tree.find("a").unwrap().leaf);

        tree.insert("b", NodeRecord::new("b1"));
        // Still flagged from construction time.
        assert!(tree.find("b").unwrap().leaf);
    }

    #[test]
    fn duplicate_ids_are_reported_and_last_wins() {
        let recorder = Recorder::default();
        let record = NodeRecord::with_children(
            "root",
            vec![
                NodeRecord::with_children("dup", vec![NodeRecord::new("x")]),
                NodeRecord::new("dup"),
            ],
        );
        let tree = Tree::with_notifier(record, Box::new(recorder.clone()));

        let notices = recorder.0.borrow();
        assert_eq!(
            notices.as_slice(),
            &[TreeNotice::Failed(TreeError::DuplicateId(NodeId::from("dup")))]
        );
        // The later record owns the index slot: it was built childless.
        assert!(tree.find("dup").unwrap().leaf);
        // Both nodes are still linked under the root.
        assert_eq!(tree.root().unwrap().children.len(), 2);
        assert_eq!(tree.size(), 3);
    }

    #[test]
    fn payload_fields_are_kept() {
        let record: NodeRecord = serde_json::from_value(serde_json::json!({
            "id": 1,
            "label": "top",
            "weight": 10,
            "children": [{ "id": 2, "label": "kid" }],
        }))
        .unwrap();
        let tree = Tree::from_record(record);

        let root = tree.find(1i64).unwrap();
        assert_eq!(root.payload["label"], "top");
        assert_eq!(root.payload["weight"], 10);
        assert_eq!(tree.find(2i64).unwrap().payload["label"], "kid");
    }
}

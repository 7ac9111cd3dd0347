//! Configurable binary heap
//!
//! An array-backed binary heap over any [`Keyed`] element type. The heap is
//! configured with a [`HeapOrder`] (min or max) and, for record elements, an
//! optional priority key naming the field comparisons go through.
//!
//! Unlike `std::collections::BinaryHeap`, which fixes the ordering at the
//! type level through `Ord`, this heap keeps both the direction and the
//! compared field as runtime configuration. Changing either through
//! [`set_order`](Heap::set_order) or [`set_priority_key`](Heap::set_priority_key)
//! invalidates the existing layout, so those setters re-heapify as part of
//! their contract; setting a value equal to the current one is a no-op.
//!
//! # Time Complexity
//!
//! | Operation   | Complexity |
//! |-------------|------------|
//! | `insert`    | O(log n)   |
//! | `pop` (one) | O(log n)   |
//! | `rebuild`   | O(n)       |
//! | `sort`      | O(n log n) |
//! | `peek`      | O(1)       |
//!
//! # Example
//!
//! ```rust
//! use dskit::{Heap, HeapOrder};
//!
//! let mut heap = Heap::new(HeapOrder::Min);
//! heap.insert_all([5, 3, 8, 1]);
//!
//! let mut drained = Vec::new();
//! heap.pop(2, |items| drained = items);
//! assert_eq!(drained, vec![1, 3]);
//! ```

use crate::traits::Keyed;

/// Which end of a comparison wins the top slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOrder {
    /// The smallest priority sits at the root.
    Min,
    /// The largest priority sits at the root.
    Max,
}

/// An array-backed binary heap with runtime-configurable ordering.
///
/// Elements are kept in a `Vec` read as a complete binary tree:
/// `parent(i) = (i - 1) / 2`, `left(i) = 2i + 1`, `right(i) = 2i + 2`.
/// After every public mutating call returns, no parent is worse than
/// either of its children under the active order — except after
/// [`sort`](Heap::sort), which trades the heap shape for a fully sorted
/// array.
///
/// Ties never displace: a node keeps the top spot against an equal child,
/// and a left child beats an equal right child. This makes extraction
/// deterministic when priorities collide.
#[derive(Debug, Clone)]
pub struct Heap<T: Keyed> {
    data: Vec<T>,
    order: HeapOrder,
    priority_key: Option<String>,
}

impl<T: Keyed> Heap<T> {
    /// Creates an empty heap with the given order and no priority key.
    pub fn new(order: HeapOrder) -> Self {
        Self {
            data: Vec::new(),
            order,
            priority_key: None,
        }
    }

    /// Creates an empty heap that compares record elements by `key`.
    pub fn with_key(order: HeapOrder, key: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            order,
            priority_key: Some(key.into()),
        }
    }

    /// Returns the number of stored elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the heap holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the current extremum without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Returns the backing storage in heap layout (or sorted layout,
    /// directly after [`sort`](Heap::sort)).
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the active ordering.
    pub fn order(&self) -> HeapOrder {
        self.order
    }

    /// Returns the active priority key, if any.
    pub fn priority_key(&self) -> Option<&str> {
        self.priority_key.as_deref()
    }

    /// Switches between min and max ordering.
    ///
    /// A changed order re-heapifies the current contents; setting the
    /// order already in effect does nothing.
    pub fn set_order(&mut self, order: HeapOrder) -> &mut Self {
        if self.order != order {
            self.order = order;
            self.rebuild();
        }
        self
    }

    /// Selects the record field comparisons go through.
    ///
    /// A changed key re-heapifies the current contents; re-selecting the
    /// key already in effect does nothing. The selector cannot be
    /// cleared once set, only replaced.
    pub fn set_priority_key(&mut self, key: impl Into<String>) -> &mut Self {
        let key = key.into();
        if self.priority_key.as_deref() != Some(key.as_str()) {
            self.priority_key = Some(key);
            self.rebuild();
        }
        self
    }

    /// Inserts one element, restoring the heap invariant by sifting it up
    /// from the end of the array.
    pub fn insert(&mut self, value: T) -> &mut Self {
        self.data.push(value);
        self.sift_up(self.data.len() - 1, 0);
        self
    }

    /// Inserts each element in turn, sifting up after every single one.
    ///
    /// This is exactly repeated [`insert`](Heap::insert), not a bulk
    /// rebuild; use [`fill`](Heap::fill) to load a whole dataset in O(n).
    pub fn insert_all(&mut self, values: impl IntoIterator<Item = T>) -> &mut Self {
        for value in values {
            self.insert(value);
        }
        self
    }

    /// Removes up to `count` extrema and hands them to `visit` in
    /// extraction order.
    ///
    /// `count` is clamped to the current size. `visit` is invoked exactly
    /// once with everything extracted — including an empty vector when the
    /// heap has nothing to give.
    pub fn pop(&mut self, count: usize, visit: impl FnOnce(Vec<T>)) -> &mut Self {
        let count = count.min(self.data.len());
        let mut taken = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(top) = self.extract_top() {
                taken.push(top);
            }
        }
        visit(taken);
        self
    }

    /// Sorts the backing storage in place by repeated extraction.
    ///
    /// Each round moves the current root past the end of the array and
    /// re-heapifies the remaining prefix, so the finished array reads in
    /// extraction order: ascending for a min-heap, descending for a
    /// max-heap. The result is no longer heap-shaped; mutate through
    /// [`rebuild`](Heap::rebuild) or [`fill`](Heap::fill) before relying
    /// on the invariant again.
    pub fn sort(&mut self) -> &mut Self {
        let n = self.data.len();
        for len in (1..=n).rev() {
            let last = len - 1;
            self.data.swap(0, last);
            // The extracted root travels past the already-finalized tail.
            self.data[last..].rotate_left(1);
            if last > 0 {
                self.sift_down(0, last - 1);
            }
        }
        self
    }

    /// Replaces the entire contents with `data`, optionally switching the
    /// priority key, and heapifies the result.
    ///
    /// Exactly one rebuild happens regardless of whether `key` is given,
    /// new, or equal to the current selector.
    pub fn fill(&mut self, data: impl IntoIterator<Item = T>, key: Option<&str>) -> &mut Self {
        self.data.clear();
        self.data.extend(data);
        if let Some(key) = key {
            if self.priority_key.as_deref() != Some(key) {
                self.priority_key = Some(key.to_owned());
            }
        }
        self.rebuild()
    }

    /// Removes every element.
    pub fn clear(&mut self) -> &mut Self {
        self.data.clear();
        self
    }

    /// Re-establishes the heap invariant over the current contents in
    /// O(n), sifting down from the last internal node through the root.
    pub fn rebuild(&mut self) -> &mut Self {
        if self.data.len() > 1 {
            let end = self.data.len() - 1;
            for start in (0..=(end - 1) / 2).rev() {
                self.sift_down(start, end);
            }
        }
        self
    }

    /// Removes and returns the root, repairing the heap afterwards.
    fn extract_top(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let top = self.data.pop();
        if !self.data.is_empty() {
            self.sift_down(0, self.data.len() - 1);
        }
        top
    }

    /// Sinks the element at `start` until the invariant holds inside the
    /// `[start, end]` window. `sort` shrinks the window as the tail fills
    /// with finalized elements.
    fn sift_down(&mut self, mut start: usize, end: usize) {
        loop {
            let target = self.top_of_family(start, end);
            if target == start {
                break;
            }
            self.data.swap(start, target);
            start = target;
        }
    }

    /// Floats the element at `start` toward the root, stopping early at
    /// `end` or as soon as its parent already wins the comparison.
    fn sift_up(&mut self, mut start: usize, end: usize) {
        while start > 0 {
            let parent = (start - 1) / 2;
            if parent < end || !self.outranks(start, parent) {
                break;
            }
            self.data.swap(start, parent);
            start = parent;
        }
    }

    /// Picks the preferred index among a node and its in-window children.
    ///
    /// Strict inequality is required to displace: the node beats a tied
    /// child and the left child beats a tied right child.
    fn top_of_family(&self, start: usize, end: usize) -> usize {
        let mut top = start;
        let left = 2 * start + 1;
        let right = left + 1;
        if left <= end && self.outranks(left, top) {
            top = left;
        }
        if right <= end && self.outranks(right, top) {
            top = right;
        }
        top
    }

    /// True if the element at `a` strictly wins against the element at
    /// `b` under the active order.
    fn outranks(&self, a: usize, b: usize) -> bool {
        let key = self.priority_key.as_deref();
        let pa = self.data[a].priority(key);
        let pb = self.data[b].priority(key);
        match self.order {
            HeapOrder::Min => pa < pb,
            HeapOrder::Max => pa > pb,
        }
    }
}

impl<T: Keyed> Default for Heap<T> {
    fn default() -> Self {
        Self::new(HeapOrder::Min)
    }
}

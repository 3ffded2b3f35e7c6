//! # avl-wordlist
//!
//! A word frequency table backed by a height-balanced (AVL) binary search tree.
//!
//! Words are keyed by exact string equality and kept in lexicographic order.
//! Each distinct word carries an occurrence count; re-inserting a word bumps
//! its count instead of adding a node.
//!
//! Nodes live in an arena and are addressed by index handles. Children are
//! owned through those handles; every node also records its parent so that
//! rebalancing can walk from a mutation point back up to the root.
//!
//! ## Example
//!
//! ```rust
//! use avl_wordlist::WordList;
//!
//! let mut list = WordList::new();
//! list.extend("the cat and the hat".split_whitespace());
//!
//! assert_eq!(list.different_words(), 4);
//! assert_eq!(list.total_words(), 5);
//! assert_eq!(list.get_count("the"), 2);
//! assert_eq!(list.most_frequent(), Ok(("the", 2)));
//! assert_eq!(list.singletons(), 3);
//! ```

#![deny(unsafe_code)]

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};

mod error;
mod report;

pub use error::{Result, WordListError};
pub use report::{Statistics, WordListing};

// =============================================================================
// Node handles
// =============================================================================

/// Handle to a slot in the [`NodeArena`].
///
/// `NULL` stands for an absent child, and for the parent of the root.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct NodeIdx(u32);

impl NodeIdx {
    const NULL: NodeIdx = NodeIdx(u32::MAX);

    #[inline]
    fn is_null(self) -> bool {
        self == Self::NULL
    }

    #[inline]
    fn slot(self) -> usize {
        debug_assert!(!self.is_null(), "dereferencing a NULL node handle");
        self.0 as usize
    }
}

/// Height of an absent subtree. A lone leaf has height 0.
const EMPTY_HEIGHT: i32 = -1;

#[derive(Clone, Debug)]
struct Node {
    word: String,
    count: usize,
    height: i32,
    parent: NodeIdx,
    left: NodeIdx,
    right: NodeIdx,
}

impl Node {
    fn leaf(word: String, parent: NodeIdx) -> Self {
        Self {
            word,
            count: 1,
            height: 0,
            parent,
            left: NodeIdx::NULL,
            right: NodeIdx::NULL,
        }
    }

    fn vacant() -> Self {
        Self {
            word: String::new(),
            count: 0,
            height: EMPTY_HEIGHT,
            parent: NodeIdx::NULL,
            left: NodeIdx::NULL,
            right: NodeIdx::NULL,
        }
    }
}

// =============================================================================
// Node Arena
// =============================================================================

/// Slot storage for tree nodes, with a free list of recycled slots.
///
/// A freed slot is reset to a vacant node so its word is dropped immediately.
#[derive(Default)]
struct NodeArena {
    slots: Vec<Node>,
    free: Vec<NodeIdx>,
}

impl NodeArena {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    /// Number of occupied slots.
    fn live(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn alloc(&mut self, node: Node) -> NodeIdx {
        if let Some(idx) = self.free.pop() {
            self.slots[idx.slot()] = node;
            return idx;
        }
        assert!(
            self.slots.len() < NodeIdx::NULL.0 as usize,
            "node arena exhausted"
        );
        let idx = NodeIdx(self.slots.len() as u32);
        self.slots.push(node);
        idx
    }

    fn free(&mut self, idx: NodeIdx) {
        self.slots[idx.slot()] = Node::vacant();
        self.free.push(idx);
    }

    #[inline]
    fn height(&self, idx: NodeIdx) -> i32 {
        if idx.is_null() {
            EMPTY_HEIGHT
        } else {
            self[idx].height
        }
    }

    /// `height(left) - height(right)`; positive means left-heavy.
    #[inline]
    fn balance_factor(&self, idx: NodeIdx) -> i32 {
        let node = &self[idx];
        self.height(node.left) - self.height(node.right)
    }

    fn update_height(&mut self, idx: NodeIdx) {
        let node = &self[idx];
        let height = 1 + self.height(node.left).max(self.height(node.right));
        self[idx].height = height;
    }
}

impl Index<NodeIdx> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, idx: NodeIdx) -> &Node {
        &self.slots[idx.slot()]
    }
}

impl IndexMut<NodeIdx> for NodeArena {
    #[inline]
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Node {
        &mut self.slots[idx.slot()]
    }
}

// =============================================================================
// WordList
// =============================================================================

/// An ordered word frequency table.
///
/// Invariants, restored before every public method returns:
/// - in-order traversal yields strictly ascending words;
/// - every node's subtrees differ in height by at most one;
/// - every cached height is `1 + max(child heights)`, with absent children at -1;
/// - every non-root node's parent handle names the node holding it as a child;
/// - `total_words()` is the sum of all counts and `different_words()` the
///   number of nodes.
pub struct WordList {
    nodes: NodeArena,
    root: NodeIdx,
    distinct: usize,
    total: usize,
}

impl WordList {
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::default(),
            root: NodeIdx::NULL,
            distinct: 0,
            total: 0,
        }
    }

    /// Number of distinct words.
    #[inline]
    pub fn different_words(&self) -> usize {
        self.distinct
    }

    /// Sum of the counts of all words.
    #[inline]
    pub fn total_words(&self) -> usize {
        self.total
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.distinct
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_null()
    }

    /// Height of the tree, or `None` when empty. A single word has height 0.
    pub fn height(&self) -> Option<usize> {
        NodeRef::new(self, self.root).map(|root| root.height())
    }

    /// Read-only handle on the root node.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        NodeRef::new(self, self.root)
    }

    fn find(&self, word: &str) -> NodeIdx {
        let mut current = self.root;
        while !current.is_null() {
            let node = &self.nodes[current];
            current = match word.cmp(node.word.as_str()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => break,
            };
        }
        current
    }

    /// Occurrence count of `word`, or 0 if it is absent.
    pub fn get_count(&self, word: &str) -> usize {
        let idx = self.find(word);
        if idx.is_null() {
            0
        } else {
            self.nodes[idx].count
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.get_count(word) > 0
    }

    /// Records one occurrence of `word`.
    ///
    /// Returns `true` if the word was new, `false` if only its count was
    /// incremented. The total count grows by one either way.
    pub fn insert(&mut self, word: &str) -> bool {
        self.total += 1;

        let mut parent = NodeIdx::NULL;
        let mut current = self.root;
        let mut went_left = false;
        while !current.is_null() {
            let node = &mut self.nodes[current];
            parent = current;
            match word.cmp(node.word.as_str()) {
                Ordering::Less => {
                    went_left = true;
                    current = node.left;
                }
                Ordering::Greater => {
                    went_left = false;
                    current = node.right;
                }
                Ordering::Equal => {
                    node.count += 1;
                    return false;
                }
            }
        }

        let idx = self.nodes.alloc(Node::leaf(word.to_owned(), parent));
        self.distinct += 1;
        debug_assert_eq!(self.nodes.live(), self.distinct);
        if parent.is_null() {
            self.root = idx;
        } else if went_left {
            self.nodes[parent].left = idx;
        } else {
            self.nodes[parent].right = idx;
        }

        self.rebalance(parent);
        true
    }

    /// Deletes `word` outright, whatever its count.
    ///
    /// Returns `false` without touching the list if the word is absent.
    pub fn remove(&mut self, word: &str) -> bool {
        let target = self.find(word);
        if target.is_null() {
            return false;
        }

        let node = &self.nodes[target];
        let (left, right) = (node.left, node.right);
        self.total -= node.count;
        self.distinct -= 1;

        // With two children, the in-order predecessor donates its payload to
        // the target and is unlinked in its place. It has no right child.
        let doomed = if !left.is_null() && !right.is_null() {
            let donor = self.max_node(left);
            let word = std::mem::take(&mut self.nodes[donor].word);
            let count = self.nodes[donor].count;
            tracing::debug!(removed = %self.nodes[target].word, donor = %word, "splicing predecessor");
            let node = &mut self.nodes[target];
            node.word = word;
            node.count = count;
            donor
        } else {
            target
        };

        let parent = self.unlink(doomed);
        debug_assert_eq!(self.nodes.live(), self.distinct);
        self.rebalance(parent);
        true
    }

    fn max_node(&self, mut idx: NodeIdx) -> NodeIdx {
        loop {
            let right = self.nodes[idx].right;
            if right.is_null() {
                return idx;
            }
            idx = right;
        }
    }

    /// Splices out a node with at most one child and frees its slot.
    /// Returns the node's former parent.
    fn unlink(&mut self, idx: NodeIdx) -> NodeIdx {
        let node = &self.nodes[idx];
        debug_assert!(node.left.is_null() || node.right.is_null());
        let child = if node.left.is_null() {
            node.right
        } else {
            node.left
        };
        let parent = node.parent;
        self.replace_child(parent, idx, child);
        self.nodes.free(idx);
        parent
    }

    /// Points `parent`'s slot holding `from` at `to` (or the root slot, if
    /// `parent` is NULL), and points `to` back at `parent`.
    fn replace_child(&mut self, parent: NodeIdx, from: NodeIdx, to: NodeIdx) {
        if parent.is_null() {
            self.root = to;
        } else {
            let p = &mut self.nodes[parent];
            if p.left == from {
                p.left = to;
            } else {
                debug_assert_eq!(p.right, from, "parent does not hold the replaced child");
                p.right = to;
            }
        }
        if !to.is_null() {
            self.nodes[to].parent = parent;
        }
    }
}

// =============================================================================
// Rotations and rebalancing
// =============================================================================

impl WordList {
    /// Promotes `x`'s right child into `x`'s position.
    fn rotate_left(&mut self, x: NodeIdx) {
        let y = self.nodes[x].right;
        debug_assert!(!y.is_null(), "rotate_left needs a right child");
        tracing::trace!(pivot = %self.nodes[x].word, "rotate left");

        let parent = self.nodes[x].parent;
        self.replace_child(parent, x, y);

        let moved = self.nodes[y].left;
        self.nodes[x].right = moved;
        if !moved.is_null() {
            self.nodes[moved].parent = x;
        }

        self.nodes[y].left = x;
        self.nodes[x].parent = y;

        // x is now below y.
        self.nodes.update_height(x);
        self.nodes.update_height(y);
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    fn rotate_right(&mut self, x: NodeIdx) {
        let y = self.nodes[x].left;
        debug_assert!(!y.is_null(), "rotate_right needs a left child");
        tracing::trace!(pivot = %self.nodes[x].word, "rotate right");

        let parent = self.nodes[x].parent;
        self.replace_child(parent, x, y);

        let moved = self.nodes[y].right;
        self.nodes[x].left = moved;
        if !moved.is_null() {
            self.nodes[moved].parent = x;
        }

        self.nodes[y].right = x;
        self.nodes[x].parent = y;

        self.nodes.update_height(x);
        self.nodes.update_height(y);
    }

    /// Walks from `start` to the root, refreshing heights and rotating away
    /// any imbalance found on the way.
    fn rebalance(&mut self, start: NodeIdx) {
        let mut x = start;
        while !x.is_null() {
            self.nodes.update_height(x);
            let balance = self.nodes.balance_factor(x);
            debug_assert!(balance.abs() <= 2, "balance factor {balance} out of range");

            if balance == 2 {
                let left = self.nodes[x].left;
                if self.nodes.balance_factor(left) < 0 {
                    self.rotate_left(left);
                }
                self.rotate_right(x);
            } else if balance == -2 {
                let right = self.nodes[x].right;
                if self.nodes.balance_factor(right) > 0 {
                    self.rotate_right(right);
                }
                self.rotate_left(x);
            }

            // After a rotation x sits below the subtree's new root, which is
            // its parent now; the walk continues from there.
            x = self.nodes[x].parent;
        }
    }
}

// =============================================================================
// Aggregate queries and traversal
// =============================================================================

impl WordList {
    /// The word with the highest count, and that count.
    ///
    /// Ties go to the lexicographically smallest word. Fails with
    /// [`WordListError::EmptyCollection`] on an empty list.
    pub fn most_frequent(&self) -> Result<(&str, usize)> {
        // In-order visits words in ascending order, so keeping the first of
        // equal counts keeps the smallest word.
        self.iter()
            .reduce(|best, entry| if entry.1 > best.1 { entry } else { best })
            .ok_or(WordListError::EmptyCollection)
    }

    /// Number of words that occur exactly once.
    pub fn singletons(&self) -> usize {
        self.iter().filter(|&(_, count)| count == 1).count()
    }

    /// In-order iterator over `(word, count)` pairs, in ascending word order.
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: Vec::new(),
            remaining: self.distinct,
        };
        iter.push_left_spine(self.root);
        iter
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WordList {
    /// Deep copy into a fresh, compacted arena.
    fn clone(&self) -> Self {
        let mut nodes = NodeArena::with_capacity(self.distinct);
        let mut root = NodeIdx::NULL;

        // (source node, parent in the copy, attach as left child)
        let mut stack: Vec<(NodeIdx, NodeIdx, bool)> = Vec::new();
        if !self.root.is_null() {
            stack.push((self.root, NodeIdx::NULL, false));
        }
        while let Some((src, parent, is_left)) = stack.pop() {
            let source = &self.nodes[src];
            let mut node = Node::leaf(source.word.clone(), parent);
            node.count = source.count;
            let idx = nodes.alloc(node);

            if parent.is_null() {
                root = idx;
            } else if is_left {
                nodes[parent].left = idx;
            } else {
                nodes[parent].right = idx;
            }

            if !source.right.is_null() {
                stack.push((source.right, idx, false));
            }
            if !source.left.is_null() {
                stack.push((source.left, idx, true));
            }
        }

        // Children are allocated after their parents, so walking slots in
        // reverse computes heights bottom-up.
        for slot in (0..nodes.slots.len()).rev() {
            nodes.update_height(NodeIdx(slot as u32));
        }

        Self {
            nodes,
            root,
            distinct: self.distinct,
            total: self.total,
        }
    }
}

impl PartialEq for WordList {
    fn eq(&self, other: &Self) -> bool {
        self.distinct == other.distinct && self.total == other.total && self.iter().eq(other.iter())
    }
}

impl Eq for WordList {}

impl fmt::Debug for WordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<S: AsRef<str>> Extend<S> for WordList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, words: I) {
        for word in words {
            self.insert(word.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for WordList {
    fn from_iter<I: IntoIterator<Item = S>>(words: I) -> Self {
        let mut list = Self::new();
        list.extend(words);
        list
    }
}

impl<'a> IntoIterator for &'a WordList {
    type Item = (&'a str, usize);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// In-order iterator returned by [`WordList::iter`].
pub struct Iter<'a> {
    nodes: &'a NodeArena,
    stack: Vec<NodeIdx>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn push_left_spine(&mut self, mut idx: NodeIdx) {
        while !idx.is_null() {
            self.stack.push(idx);
            idx = self.nodes[idx].left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = &self.nodes[idx];
        self.push_left_spine(node.right);
        self.remaining -= 1;
        Some((node.word.as_str(), node.count))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

// =============================================================================
// Node inspection
// =============================================================================

/// Read-only view of one node, for inspecting the tree's shape.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    list: &'a WordList,
    idx: NodeIdx,
}

impl<'a> NodeRef<'a> {
    fn new(list: &'a WordList, idx: NodeIdx) -> Option<Self> {
        (!idx.is_null()).then_some(Self { list, idx })
    }

    fn node(&self) -> &'a Node {
        &self.list.nodes[self.idx]
    }

    pub fn word(&self) -> &'a str {
        &self.node().word
    }

    pub fn count(&self) -> usize {
        self.node().count
    }

    /// Height of the subtree rooted here; a leaf has height 0.
    pub fn height(&self) -> usize {
        self.node().height as usize
    }

    /// Left subtree height minus right subtree height.
    pub fn balance_factor(&self) -> i32 {
        self.list.nodes.balance_factor(self.idx)
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        Self::new(self.list, self.node().left)
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        Self::new(self.list, self.node().right)
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        Self::new(self.list, self.node().parent)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("word", &self.word())
            .field("count", &self.count())
            .field("height", &self.height())
            .finish()
    }
}


#[cfg(test)]
mod proptests;

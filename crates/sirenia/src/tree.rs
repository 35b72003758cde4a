//! Counting trees shared by the crossing counters.

use std::ops::{Deref, DerefMut};

/// Multiset of integer keys in `0..max_key` with rank queries, backed by a binary indexed
/// (Fenwick) tree.
///
/// Besides the prefix sums the tree keeps a counter per key, so every copy of a key can be
/// removed in one `O(log max_key)` update.
#[derive(Debug, Clone, Default)]
pub struct OrderStatisticsTree {
    /// One-based prefix sums; slot 0 is unused.
    sums: Vec<usize>,
    counts: Vec<usize>,
    size: usize,
}

impl OrderStatisticsTree {
    pub fn new(max_key: usize) -> Self {
        Self {
            sums: vec![0; max_key + 1],
            counts: vec![0; max_key],
            size: 0,
        }
    }

    /// Exclusive upper bound of the accepted keys.
    pub fn max_key(&self) -> usize {
        self.counts.len()
    }

    pub fn add(&mut self, key: usize) {
        self.add_many(key, 1);
    }

    /// Inserts `copies` copies of `key`.
    pub fn add_many(&mut self, key: usize, copies: usize) {
        self.check_key(key);
        if copies == 0 {
            return;
        }
        self.counts[key] += copies;
        self.size += copies;
        let mut i = key + 1;
        while i < self.sums.len() {
            self.sums[i] += copies;
            i += i & i.wrapping_neg();
        }
    }

    /// Removes every copy of `key` and returns how many there were.
    pub fn remove_all(&mut self, key: usize) -> usize {
        self.check_key(key);
        let copies = std::mem::take(&mut self.counts[key]);
        if copies == 0 {
            return 0;
        }
        self.size -= copies;
        let mut i = key + 1;
        while i < self.sums.len() {
            self.sums[i] -= copies;
            i += i & i.wrapping_neg();
        }
        copies
    }

    /// Number of stored keys strictly less than `key`. `key` may equal [`Self::max_key`].
    pub fn rank(&self, key: usize) -> usize {
        assert!(
            key <= self.max_key(),
            "rank query {key} outside the tree's key range 0..={}",
            self.max_key()
        );
        let mut sum = 0;
        let mut i = key;
        while i > 0 {
            sum += self.sums[i];
            i &= i - 1;
        }
        sum
    }

    pub fn count(&self, key: usize) -> usize {
        self.check_key(key);
        self.counts[key]
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn clear(&mut self) {
        // All sums are zero whenever all counts are.
        if self.size == 0 {
            return;
        }
        self.sums.fill(0);
        self.counts.fill(0);
        self.size = 0;
    }

    /// Empties the tree and resizes it for keys in `0..max_key`, reusing its storage.
    pub fn reset(&mut self, max_key: usize) {
        self.sums.clear();
        self.sums.resize(max_key + 1, 0);
        self.counts.clear();
        self.counts.resize(max_key, 0);
        self.size = 0;
    }

    /// Borrows the tree for one counting pass. The tree is cleared when the guard drops, so a
    /// pass that leaves keys behind cannot leak them into the next one.
    pub fn scratch(&mut self) -> ScratchTree<'_> {
        self.clear();
        ScratchTree { tree: self }
    }

    #[inline]
    fn check_key(&self, key: usize) {
        assert!(
            key < self.max_key(),
            "key {key} outside the tree's key range 0..{}",
            self.max_key()
        );
    }
}

/// Exclusive borrow of an [`OrderStatisticsTree`] that clears it on drop.
#[derive(Debug)]
pub struct ScratchTree<'a> {
    tree: &'a mut OrderStatisticsTree,
}

impl Deref for ScratchTree<'_> {
    type Target = OrderStatisticsTree;

    fn deref(&self) -> &Self::Target {
        &*self.tree
    }
}

impl DerefMut for ScratchTree<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.tree
    }
}

impl Drop for ScratchTree<'_> {
    fn drop(&mut self) {
        self.tree.clear();
    }
}

/// Complete binary tree over `leaves` slots that counts, for a stream of inserted slots, how
/// many earlier insertions landed on a strictly greater slot.
///
/// Summing [`AccumulatorTree::insert`] over a sequence yields its inversion count.
#[derive(Debug, Clone, Default)]
pub struct AccumulatorTree {
    tree: Vec<usize>,
    first_index: usize,
}

impl AccumulatorTree {
    pub fn new(leaves: usize) -> Self {
        let mut tree = Self::default();
        tree.reset(leaves);
        tree
    }

    /// Empties the tree and sizes it for at least `leaves` slots.
    pub fn reset(&mut self, leaves: usize) {
        let mut first_index: usize = 1;
        while first_index < leaves {
            first_index <<= 1;
        }
        let tree_size = 2 * first_index - 1;
        self.tree.clear();
        self.tree.resize(tree_size, 0);
        self.first_index = first_index - 1;
    }

    /// Number of slots (a power of two).
    pub fn leaves(&self) -> usize {
        self.first_index + 1
    }

    pub fn insert(&mut self, slot: usize) -> usize {
        assert!(
            slot < self.leaves(),
            "slot {slot} outside the accumulator's {} leaves",
            self.leaves()
        );
        let mut index = slot + self.first_index;
        self.tree[index] += 1;
        let mut greater = 0;
        while index > 0 {
            if index % 2 == 1 {
                greater += self.tree[index + 1];
            }
            index = (index - 1) >> 1;
            self.tree[index] += 1;
        }
        greater
    }
}

//! Bitwise PATRICIA trie over byte-string keys.
//!
//! Branches test a single key bit and own exactly two children; only leaves
//! store keys. Deletion only sets a tombstone on the leaf, so the structure
//! never shrinks until [`PatriciaTrie::clear`].
//!
//! Node layout:
//! - Leaf: 12 bytes (8-byte key span + tombstone flag), key bytes in an arena
//! - Branch: 12 bytes (4-byte bit index + two 4-byte child refs)
//!
//! All walks are loops over explicit stacks, so prefix chains such as
//! `a, aa, aaa, ...` (one branch level per key) cannot exhaust the call stack.

pub mod bits;
mod debug;
mod node;

use smallvec::SmallVec;

use crate::error::{Result, TrieError};
use bits::{bit_at, critical_bit};
use node::{Branch, KeyArena, Leaf, NodeRef};

pub use node::NODE_FOOTPRINT;

/// Where a split branch is linked in when a new key collides with a leaf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitPlacement {
    /// Replace the leaf reached by the descent. Bit indexes along a path are
    /// not monotone and the shape depends on insertion order.
    #[default]
    Leaf,
    /// Link the branch above the first node on the key's path that tests a
    /// later bit, keeping bit indexes increasing along every path. Iteration
    /// is then always byte-lexicographic.
    CritBit,
}

/// Configuration for a [`PatriciaTrie`].
#[derive(Debug, Clone, Copy)]
pub struct TrieConfig {
    /// Split placement policy.
    pub placement: SplitPlacement,
    /// Number of keys to reserve room for up front.
    pub initial_capacity: usize,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            placement: SplitPlacement::Leaf,
            initial_capacity: 0,
        }
    }
}

/// What an [`PatriciaTrie::insert`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new leaf was created for the key.
    Added,
    /// The key had been deleted; its tombstone was cleared.
    Reactivated,
    /// The key was already active. Nothing changed.
    AlreadyActive,
}

/// Depth figures over active leaves, measured in branch edges from the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthStats {
    /// Sum of the depths of all active leaves.
    pub depth_sum: u64,
    /// Number of active leaves visited.
    pub active_leaves: usize,
    /// Greatest depth of any active leaf (the height).
    pub max_depth: usize,
}

impl DepthStats {
    /// Average active-leaf depth, `None` when there are no active leaves.
    pub fn average(&self) -> Option<f64> {
        (self.active_leaves > 0).then(|| self.depth_sum as f64 / self.active_leaves as f64)
    }
}

/// Counters and estimates reported by [`PatriciaTrie::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrieStats {
    /// Leaves plus branches.
    pub node_count: usize,
    /// Active (non-tombstoned) words.
    pub active_words: usize,
    /// Tombstoned words.
    pub deleted_words: usize,
    /// Depth figures over active leaves.
    pub depth: DepthStats,
    /// `node_count * NODE_FOOTPRINT`; ignores key payload.
    pub estimated_node_bytes: usize,
    /// Bytes of owned key payload.
    pub key_bytes: usize,
    /// Node estimate plus key payload.
    pub estimated_total_bytes: usize,
}

/// A binary PATRICIA trie used as a string dictionary.
///
/// ```rust
/// use patricia_dict::PatriciaTrie;
///
/// let mut trie = PatriciaTrie::new();
/// trie.insert("banana").unwrap();
/// trie.insert("apple").unwrap();
/// trie.insert("cherry").unwrap();
///
/// assert!(trie.search("apple"));
/// assert!(trie.delete("banana"));
/// assert!(!trie.search("banana"));
///
/// let words: Vec<&[u8]> = trie.iter().collect();
/// assert_eq!(words, [&b"apple"[..], b"cherry"]);
/// ```
#[derive(Clone)]
pub struct PatriciaTrie {
    keys: KeyArena,
    leaves: Vec<Leaf>,
    branches: Vec<Branch>,
    root: NodeRef,
    node_count: usize,
    active: usize,
    deleted: usize,
    config: TrieConfig,
}

/// Child slot a new subtree is written into.
#[derive(Clone, Copy)]
enum Slot {
    Root,
    Child { branch: usize, dir: usize },
}

impl PatriciaTrie {
    /// Create a new empty trie with default configuration.
    pub fn new() -> Self {
        Self::with_config(TrieConfig::default())
    }

    /// Create a new empty trie with the given configuration.
    ///
    /// `initial_capacity` is a hint here: if the room cannot be reserved the
    /// trie starts empty and grows on demand. Use
    /// [`PatriciaTrie::try_with_config`] to see the failure.
    pub fn with_config(config: TrieConfig) -> Self {
        Self::try_with_config(config).unwrap_or_else(|_| Self::empty(config))
    }

    /// Create a new empty trie, reserving room for `initial_capacity` keys.
    ///
    /// Fails with [`TrieError::CapacityExceeded`] if that many keys could
    /// never be addressed, or [`TrieError::OutOfMemory`] if the reservation
    /// itself fails.
    pub fn try_with_config(config: TrieConfig) -> Result<Self> {
        let n = config.initial_capacity;
        if n > NodeRef::MAX_INDEX + 1 {
            return Err(TrieError::CapacityExceeded);
        }

        let mut trie = Self::empty(config);
        trie.keys
            .try_reserve(n.saturating_mul(8).min(u32::MAX as usize))?;
        trie.leaves.try_reserve(n)?;
        trie.branches.try_reserve(n.saturating_sub(1))?;
        Ok(trie)
    }

    fn empty(config: TrieConfig) -> Self {
        Self {
            keys: KeyArena::default(),
            leaves: Vec::new(),
            branches: Vec::new(),
            root: NodeRef::NULL,
            node_count: 0,
            active: 0,
            deleted: 0,
            config,
        }
    }

    /// The configuration this trie was built with.
    pub fn config(&self) -> TrieConfig {
        self.config
    }

    /// Number of active words.
    #[inline]
    pub fn len(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Number of tombstoned words.
    #[inline]
    pub fn deleted_count(&self) -> usize {
        self.deleted
    }

    /// Leaves plus branches.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Leaves, active and tombstoned.
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.active + self.deleted
    }

    #[inline]
    pub fn branch_count(&self) -> usize {
        self.node_count - self.leaf_count()
    }

    /// Insert `key`, reactivating it if it was deleted.
    ///
    /// Fails without touching the trie if `key` contains a 0x00 byte or if
    /// room for the new nodes cannot be allocated.
    pub fn insert(&mut self, key: impl AsRef<[u8]>) -> Result<InsertOutcome> {
        let key = key.as_ref();
        if let Some(offset) = key.iter().position(|&b| b == 0) {
            return Err(TrieError::NulByte { offset });
        }

        if self.root.is_null() {
            self.reserve_for(key, false)?;
            self.root = self.push_leaf(key);
            self.node_count += 1;
            self.active += 1;
            return Ok(InsertOutcome::Added);
        }

        let (slot, found) = self.descend(key);
        let leaf_idx = found.leaf_idx();
        let existing = self.keys.get(self.leaves[leaf_idx].key);

        if existing == key {
            let leaf = &mut self.leaves[leaf_idx];
            if !leaf.deleted {
                return Ok(InsertOutcome::AlreadyActive);
            }
            leaf.deleted = false;
            self.active += 1;
            self.deleted -= 1;
            return Ok(InsertOutcome::Reactivated);
        }

        let split = critical_bit(key, existing)
            .expect("distinct NUL-free keys differ at some bit");
        let split_bit = u32::try_from(split).map_err(|_| TrieError::CapacityExceeded)?;
        self.reserve_for(key, true)?;

        let (slot, sibling) = match self.config.placement {
            SplitPlacement::Leaf => (slot, found),
            SplitPlacement::CritBit => self.descend_until(key, split_bit),
        };

        let new_leaf = self.push_leaf(key);
        let children = if bit_at(key, split) == 0 {
            [new_leaf, sibling]
        } else {
            [sibling, new_leaf]
        };
        let branch = NodeRef::branch(self.branches.len() as u32);
        self.branches.push(Branch {
            bit: split_bit,
            children,
        });
        self.set_slot(slot, branch);

        self.node_count += 2;
        self.active += 1;
        Ok(InsertOutcome::Added)
    }

    /// Whether `key` is present and not deleted.
    pub fn search(&self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        self.find_leaf(key)
            .is_some_and(|idx| !self.leaves[idx].deleted)
    }

    /// Mark `key` deleted. Returns `false` if it is absent or already deleted.
    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> bool {
        let key = key.as_ref();
        let Some(idx) = self.find_leaf(key) else {
            return false;
        };
        let leaf = &mut self.leaves[idx];
        if leaf.deleted {
            return false;
        }
        leaf.deleted = true;
        self.active -= 1;
        self.deleted += 1;
        true
    }

    /// Iterate over active keys, visiting every bit-0 subtree before its
    /// bit-1 sibling.
    pub fn iter(&self) -> Iter<'_> {
        let mut stack = SmallVec::new();
        if !self.root.is_null() {
            stack.push(self.root);
        }
        Iter { trie: self, stack }
    }

    /// Depth sum, active-leaf count and height over active leaves.
    pub fn depth_stats(&self) -> DepthStats {
        let mut stats = DepthStats::default();
        let mut stack: SmallVec<[(NodeRef, usize); 32]> = SmallVec::new();
        if !self.root.is_null() {
            stack.push((self.root, 0));
        }

        while let Some((r, depth)) = stack.pop() {
            if r.is_leaf() {
                if !self.leaves[r.leaf_idx()].deleted {
                    stats.depth_sum += depth as u64;
                    stats.active_leaves += 1;
                    stats.max_depth = stats.max_depth.max(depth);
                }
                continue;
            }
            let branch = &self.branches[r.branch_idx()];
            stack.push((branch.children[1], depth + 1));
            stack.push((branch.children[0], depth + 1));
        }
        stats
    }

    /// Maintained counters together with depth figures and memory estimates.
    pub fn stats(&self) -> TrieStats {
        let estimated_node_bytes = self.node_count * NODE_FOOTPRINT;
        let key_bytes = self.keys.len();
        TrieStats {
            node_count: self.node_count,
            active_words: self.active,
            deleted_words: self.deleted,
            depth: self.depth_stats(),
            estimated_node_bytes,
            key_bytes,
            estimated_total_bytes: estimated_node_bytes + key_bytes,
        }
    }

    /// Release every node and key and reset all counters.
    pub fn clear(&mut self) {
        *self = Self::empty(self.config);
    }

    // === internals ===

    /// Walk `key`'s bit path down to a leaf. The trie must be non-empty.
    fn descend(&self, key: &[u8]) -> (Slot, NodeRef) {
        let mut slot = Slot::Root;
        let mut r = self.root;
        while !r.is_leaf() {
            let idx = r.branch_idx();
            let branch = &self.branches[idx];
            let dir = bit_at(key, branch.bit as usize);
            slot = Slot::Child { branch: idx, dir };
            r = branch.children[dir];
        }
        (slot, r)
    }

    /// Walk `key`'s bit path until a leaf or a branch testing a bit past `bit`.
    fn descend_until(&self, key: &[u8], bit: u32) -> (Slot, NodeRef) {
        let mut slot = Slot::Root;
        let mut r = self.root;
        while !r.is_leaf() {
            let idx = r.branch_idx();
            let branch = &self.branches[idx];
            if branch.bit > bit {
                break;
            }
            let dir = bit_at(key, branch.bit as usize);
            slot = Slot::Child { branch: idx, dir };
            r = branch.children[dir];
        }
        (slot, r)
    }

    fn find_leaf(&self, key: &[u8]) -> Option<usize> {
        if self.root.is_null() {
            return None;
        }
        let (_, r) = self.descend(key);
        let idx = r.leaf_idx();
        (self.keys.get(self.leaves[idx].key) == key).then_some(idx)
    }

    fn set_slot(&mut self, slot: Slot, r: NodeRef) {
        match slot {
            Slot::Root => self.root = r,
            Slot::Child { branch, dir } => self.branches[branch].children[dir] = r,
        }
    }

    /// Reserve room for one leaf (and a branch when splitting) so the pushes
    /// that follow cannot fail half way.
    fn reserve_for(&mut self, key: &[u8], with_branch: bool) -> Result<()> {
        if self.leaves.len() > NodeRef::MAX_INDEX
            || self.branches.len() > NodeRef::MAX_INDEX
            || !self.keys.fits(key.len())
        {
            return Err(TrieError::CapacityExceeded);
        }
        self.keys.try_reserve(key.len())?;
        self.leaves.try_reserve(1)?;
        if with_branch {
            self.branches.try_reserve(1)?;
        }
        Ok(())
    }

    fn push_leaf(&mut self, key: &[u8]) -> NodeRef {
        let span = self.keys.add(key);
        let r = NodeRef::leaf(self.leaves.len() as u32);
        self.leaves.push(Leaf {
            key: span,
            deleted: false,
        });
        r
    }
}

impl Default for PatriciaTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PatriciaTrie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.iter().map(String::from_utf8_lossy))
            .finish()
    }
}

impl<'a> IntoIterator for &'a PatriciaTrie {
    type Item = &'a [u8];
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over the active keys of a [`PatriciaTrie`].
#[derive(Clone)]
pub struct Iter<'a> {
    trie: &'a PatriciaTrie,
    stack: SmallVec<[NodeRef; 32]>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(r) = self.stack.pop() {
            if r.is_leaf() {
                let leaf = &self.trie.leaves[r.leaf_idx()];
                if leaf.deleted {
                    continue;
                }
                return Some(self.trie.keys.get(leaf.key));
            }

            let branch = &self.trie.branches[r.branch_idx()];
            self.stack.push(branch.children[1]);
            self.stack.push(branch.children[0]);
        }
        None
    }
}

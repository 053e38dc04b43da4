//! Node records and the key arena.
//!
//! Leaves and branches live in separate arenas owned by the trie. A child
//! link is a 4-byte [`NodeRef`]: the high bit tags leaves, the remaining 31
//! bits index into the matching arena.

use std::collections::TryReserveError;

/// 4-byte reference with tag bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub(crate) struct NodeRef(u32);

impl NodeRef {
    pub(crate) const NULL: Self = NodeRef(0xFFFF_FFFF);
    const LEAF_TAG: u32 = 0x8000_0000;

    /// Largest arena index a reference can carry.
    pub(crate) const MAX_INDEX: usize = (Self::LEAF_TAG - 1) as usize - 1;

    #[inline]
    pub(crate) fn leaf(idx: u32) -> Self {
        debug_assert!(idx as usize <= Self::MAX_INDEX);
        NodeRef(idx | Self::LEAF_TAG)
    }

    #[inline]
    pub(crate) fn branch(idx: u32) -> Self {
        debug_assert!(idx as usize <= Self::MAX_INDEX);
        NodeRef(idx)
    }

    #[inline]
    pub(crate) fn is_null(self) -> bool {
        self == Self::NULL
    }

    #[inline]
    pub(crate) fn is_leaf(self) -> bool {
        !self.is_null() && (self.0 & Self::LEAF_TAG) != 0
    }

    #[inline]
    pub(crate) fn leaf_idx(self) -> usize {
        debug_assert!(self.is_leaf());
        (self.0 & !Self::LEAF_TAG) as usize
    }

    #[inline]
    pub(crate) fn branch_idx(self) -> usize {
        debug_assert!(!self.is_null() && !self.is_leaf());
        self.0 as usize
    }
}

/// Location of a key inside the [`KeyArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct KeySpan {
    offset: u32,
    len: u32,
}

/// Terminal node: one complete key and its tombstone flag.
#[derive(Clone, Debug)]
pub(crate) struct Leaf {
    pub(crate) key: KeySpan,
    pub(crate) deleted: bool,
}

/// Internal node: tests one bit, index 0 = bit value 0, index 1 = bit value 1.
#[derive(Clone, Debug)]
pub(crate) struct Branch {
    pub(crate) bit: u32,
    pub(crate) children: [NodeRef; 2],
}

/// Size charged per node by the coarse memory estimate.
pub const NODE_FOOTPRINT: usize = {
    let leaf = std::mem::size_of::<Leaf>();
    let branch = std::mem::size_of::<Branch>();
    if leaf > branch {
        leaf
    } else {
        branch
    }
};

/// Key storage arena
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyArena {
    data: Vec<u8>,
}

impl KeyArena {
    /// Whether `extra` more bytes still fit in 32-bit offsets.
    pub(crate) fn fits(&self, extra: usize) -> bool {
        self.data
            .len()
            .checked_add(extra)
            .is_some_and(|end| end <= u32::MAX as usize)
    }

    pub(crate) fn try_reserve(&mut self, extra: usize) -> Result<(), TryReserveError> {
        self.data.try_reserve(extra)
    }

    /// Appends `key`. Callers check [`KeyArena::fits`] and reserve first.
    pub(crate) fn add(&mut self, key: &[u8]) -> KeySpan {
        let offset = self.data.len() as u32;
        self.data.extend_from_slice(key);
        KeySpan {
            offset,
            len: key.len() as u32,
        }
    }

    #[inline]
    pub(crate) fn get(&self, span: KeySpan) -> &[u8] {
        let start = span.offset as usize;
        &self.data[start..start + span.len as usize]
    }

    /// Bytes of key payload stored.
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }
}

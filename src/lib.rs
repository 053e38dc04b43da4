//! # patricia-dict
//!
//! An in-memory string dictionary on a binary (bitwise) PATRICIA trie.
//!
//! ## Features
//!
//! - **Bit-level branching**: every internal node tests one key bit, MSB first
//! - **Tombstone deletion**: deleting marks the leaf, re-inserting revives it
//! - **Ordered enumeration**: bit-0 subtrees before bit-1 subtrees
//! - **Maintained counters**: node, active and deleted counts kept incrementally
//! - **Fallible allocation**: out-of-memory fails one insert, never aborts
//!
//! ## Example
//!
//! ```rust
//! use patricia_dict::{PatriciaTrie, InsertOutcome};
//!
//! let mut trie = PatriciaTrie::new();
//! assert_eq!(trie.insert("a").unwrap(), InsertOutcome::Added);
//! assert_eq!(trie.insert("ab").unwrap(), InsertOutcome::Added);
//!
//! assert!(trie.search("a"));
//! assert!(trie.delete("a"));
//! assert_eq!(trie.insert("a").unwrap(), InsertOutcome::Reactivated);
//!
//! for word in &trie {
//!     println!("{}", String::from_utf8_lossy(word));
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod loader;
pub mod patricia;
pub mod shell;

pub use error::{LoadError, Result, TrieError};
pub use patricia::{
    DepthStats, InsertOutcome, Iter, PatriciaTrie, SplitPlacement, TrieConfig, TrieStats,
    NODE_FOOTPRINT,
};

use std::path::Path;

use parking_lot::RwLock;

/// A [`PatriciaTrie`] behind a single reader-writer lock.
///
/// Mutations take the lock exclusively for the whole operation; searches and
/// snapshots share it.
pub struct SharedTrie {
    inner: RwLock<PatriciaTrie>,
}

impl SharedTrie {
    /// Create a new empty shared trie with default configuration.
    pub fn new() -> Self {
        Self::with_config(TrieConfig::default())
    }

    /// Create a new shared trie with the given configuration.
    pub fn with_config(config: TrieConfig) -> Self {
        Self {
            inner: RwLock::new(PatriciaTrie::with_config(config)),
        }
    }

    pub fn insert(&self, key: impl AsRef<[u8]>) -> Result<InsertOutcome> {
        self.inner.write().insert(key)
    }

    pub fn search(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.read().search(key)
    }

    pub fn delete(&self, key: impl AsRef<[u8]>) -> bool {
        self.inner.write().delete(key)
    }

    /// Snapshot of the active keys in enumeration order.
    pub fn keys(&self) -> Vec<Vec<u8>> {
        self.inner.read().iter().map(<[u8]>::to_vec).collect()
    }

    pub fn stats(&self) -> TrieStats {
        self.inner.read().stats()
    }

    /// Number of active words.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Load a word list while holding the write lock for the whole file.
    pub fn load_path(&self, path: impl AsRef<Path>) -> std::result::Result<usize, LoadError> {
        loader::load_path(&mut *self.inner.write(), path)
    }

    /// Run `f` with shared access to the trie.
    pub fn read<T>(&self, f: impl FnOnce(&PatriciaTrie) -> T) -> T {
        f(&*self.inner.read())
    }

    /// Run `f` with exclusive access to the trie.
    pub fn write<T>(&self, f: impl FnOnce(&mut PatriciaTrie) -> T) -> T {
        f(&mut *self.inner.write())
    }

    /// Consume the handle, returning the trie.
    pub fn into_inner(self) -> PatriciaTrie {
        self.inner.into_inner()
    }
}

impl Default for SharedTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl From<PatriciaTrie> for SharedTrie {
    fn from(trie: PatriciaTrie) -> Self {
        Self {
            inner: RwLock::new(trie),
        }
    }
}

#[cfg(test)]
mod proptests;

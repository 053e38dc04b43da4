//! Error types for trie mutation and bulk loading.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

/// Error type for trie operations.
#[derive(Debug)]
pub enum TrieError {
    /// An allocation for a node or key failed. The trie is unchanged.
    OutOfMemory(TryReserveError),
    /// The key contains a 0x00 byte, which the bit addressing cannot tell
    /// apart from the zero padding past the end of a key.
    NulByte {
        /// Offset of the first 0x00 byte in the key.
        offset: usize,
    },
    /// The node arenas or the key arena reached their addressable limit.
    CapacityExceeded,
}

impl From<TryReserveError> for TrieError {
    fn from(e: TryReserveError) -> Self {
        TrieError::OutOfMemory(e)
    }
}

impl std::fmt::Display for TrieError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrieError::OutOfMemory(e) => write!(f, "out of memory: {}", e),
            TrieError::NulByte { offset } => {
                write!(f, "key contains a NUL byte at offset {}", offset)
            }
            TrieError::CapacityExceeded => write!(f, "trie capacity exceeded"),
        }
    }
}

impl std::error::Error for TrieError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrieError::OutOfMemory(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for trie operations.
pub type Result<T> = std::result::Result<T, TrieError>;

/// Error type for bulk loading a word list.
#[derive(Debug)]
pub enum LoadError {
    /// The source could not be opened. Nothing was inserted.
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Reading failed part way through the source.
    Read {
        /// Tokens inserted before the failure.
        loaded: usize,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A token could not be inserted.
    Insert {
        /// Tokens inserted before the failure.
        loaded: usize,
        /// The insertion error.
        source: TrieError,
    },
}

impl LoadError {
    /// Number of tokens inserted before the error, zero for [`LoadError::Open`].
    pub fn loaded(&self) -> usize {
        match self {
            LoadError::Open { .. } => 0,
            LoadError::Read { loaded, .. } | LoadError::Insert { loaded, .. } => *loaded,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Open { path, source } => {
                write!(f, "could not open {}: {}", path.display(), source)
            }
            LoadError::Read { loaded, source } => {
                write!(f, "read failed after {} tokens: {}", loaded, source)
            }
            LoadError::Insert { loaded, source } => {
                write!(f, "insert failed after {} tokens: {}", loaded, source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Open { source, .. } | LoadError::Read { source, .. } => Some(source),
            LoadError::Insert { source, .. } => Some(source),
        }
    }
}

//! Bulk loading of whitespace-delimited word lists.
//!
//! The word list is consumed once: every token is inserted in file order and
//! the number of tokens read is reported, duplicates included.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::LoadError;
use crate::PatriciaTrie;

/// Longest token the loader and the shell accept, in bytes.
pub const MAX_TOKEN_LEN: usize = 255;

/// What happens to the bytes of a token past the length limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Emit the remainder as further tokens of at most the limit each.
    Split,
    /// Drop the remainder.
    Truncate,
}

/// ASCII whitespace as C `isspace` sees it (vertical tab included), or NUL.
#[inline]
fn is_delimiter(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0B || byte == 0
}

/// Splits a byte stream into whitespace-delimited tokens.
pub struct TokenReader<R> {
    inner: R,
    max_len: usize,
    overflow: Overflow,
}

impl<R: BufRead> TokenReader<R> {
    /// Tokens of at most [`MAX_TOKEN_LEN`] bytes, split on overflow.
    pub fn new(inner: R) -> Self {
        Self::with_limit(inner, MAX_TOKEN_LEN, Overflow::Split)
    }

    pub fn with_limit(inner: R, max_len: usize, overflow: Overflow) -> Self {
        Self {
            inner,
            max_len: max_len.max(1),
            overflow,
        }
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut token = Vec::new();
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if buf.is_empty() {
                return Ok((!token.is_empty()).then_some(token));
            }

            let mut used = 0;
            let mut done = false;
            for &byte in buf {
                if is_delimiter(byte) {
                    used += 1;
                    if !token.is_empty() {
                        done = true;
                        break;
                    }
                    continue;
                }
                if token.len() == self.max_len {
                    match self.overflow {
                        // Leave this byte for the next token.
                        Overflow::Split => {
                            done = true;
                            break;
                        }
                        Overflow::Truncate => {
                            used += 1;
                            continue;
                        }
                    }
                }
                token.push(byte);
                used += 1;
            }
            self.inner.consume(used);
            if done {
                return Ok(Some(token));
            }
        }
    }

    /// Consume the reader, returning the wrapped source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead> Iterator for TokenReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Insert every token of `reader` into `trie`, returning the tokens read.
pub fn load_reader(trie: &mut PatriciaTrie, reader: impl BufRead) -> Result<usize, LoadError> {
    let mut loaded = 0;
    for token in TokenReader::new(reader) {
        let token = token.map_err(|source| LoadError::Read { loaded, source })?;
        trie.insert(&token)
            .map_err(|source| LoadError::Insert { loaded, source })?;
        loaded += 1;
    }
    Ok(loaded)
}

/// Open `path` and load its words. An unopenable file leaves `trie` as it was.
pub fn load_path(trie: &mut PatriciaTrie, path: impl AsRef<Path>) -> Result<usize, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        tracing::warn!(path = %path.display(), error = %source, "could not open word list");
        LoadError::Open {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let loaded = load_reader(trie, BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        loaded,
        active = trie.len(),
        nodes = trie.node_count(),
        "loaded word list"
    );
    Ok(loaded)
}

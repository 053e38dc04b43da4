//! Interactive menu driving a [`PatriciaTrie`].
//!
//! Reads whitespace-delimited tokens from any `BufRead`: first a menu option,
//! then the word or file name it asks for. Each option calls exactly one trie
//! operation and writes its result as text.

use std::io::{self, BufRead, Write};

use crate::loader::{self, Overflow, TokenReader, MAX_TOKEN_LEN};
use crate::PatriciaTrie;

/// Menu entries, numbered as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Insert,
    Search,
    Delete,
    List,
    Stats,
    Load,
    Exit,
}

impl MenuOption {
    /// Parse a menu token such as `"3"`.
    pub fn parse(token: &[u8]) -> Option<Self> {
        let n: u32 = std::str::from_utf8(token).ok()?.parse().ok()?;
        Some(match n {
            1 => MenuOption::Insert,
            2 => MenuOption::Search,
            3 => MenuOption::Delete,
            4 => MenuOption::List,
            5 => MenuOption::Stats,
            6 => MenuOption::Load,
            0 => MenuOption::Exit,
            _ => return None,
        })
    }

    /// Prompt for the argument this option reads, if any.
    fn prompt(self) -> Option<&'static str> {
        match self {
            MenuOption::Insert => Some("Word to insert: "),
            MenuOption::Search => Some("Word to search: "),
            MenuOption::Delete => Some("Word to delete: "),
            MenuOption::Load => Some("Name of the .txt file: "),
            MenuOption::List | MenuOption::Stats | MenuOption::Exit => None,
        }
    }
}

fn show_menu(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== PATRICIA Trie Dictionary (bitwise) ===")?;
    writeln!(out, "1. Insert word")?;
    writeln!(out, "2. Search word")?;
    writeln!(out, "3. Delete word (mark)")?;
    writeln!(out, "4. List words (ordered)")?;
    writeln!(out, "5. Show statistics")?;
    writeln!(out, "6. Load words from .txt file")?;
    writeln!(out, "0. Exit")?;
    write!(out, "Choose an option: ")?;
    out.flush()
}

/// Write the counters, depth figures and memory estimates of `trie`.
pub fn print_stats(trie: &PatriciaTrie, out: &mut impl Write) -> io::Result<()> {
    let stats = trie.stats();
    writeln!(out)?;
    writeln!(out, "=== PATRICIA Trie Statistics ===")?;
    writeln!(out, "Total nodes: {}", stats.node_count)?;
    writeln!(out, "Active words: {}", stats.active_words)?;
    writeln!(out, "Deleted words (marked): {}", stats.deleted_words)?;

    if stats.node_count == 0 {
        return writeln!(out, "Trie is empty.");
    }

    if let Some(avg) = stats.depth.average() {
        writeln!(out, "Average word depth: {:.2}", avg)?;
        writeln!(out, "Maximum depth (height): {}", stats.depth.max_depth)?;
    }
    writeln!(out, "Estimated node memory: {} bytes", stats.estimated_node_bytes)?;
    writeln!(out, "Key payload: {} bytes", stats.key_bytes)?;
    writeln!(out, "Estimated total: {} bytes", stats.estimated_total_bytes)
}

/// Write every active word, one per line.
pub fn print_words(trie: &PatriciaTrie, out: &mut impl Write) -> io::Result<()> {
    if trie.node_count() == 0 {
        return writeln!(out, "Trie is empty.");
    }
    writeln!(out, "Words in order:")?;
    for word in trie.iter() {
        out.write_all(word)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Run the menu loop until option 0 or end of input, then tear the trie down.
pub fn run(trie: &mut PatriciaTrie, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
    let mut tokens = TokenReader::with_limit(input, MAX_TOKEN_LEN, Overflow::Truncate);
    writeln!(out, "Welcome to the PATRICIA trie dictionary.")?;

    loop {
        show_menu(&mut out)?;
        let Some(choice) = tokens.next_token()? else {
            writeln!(out)?;
            break;
        };
        writeln!(out)?;

        let Some(option) = MenuOption::parse(&choice) else {
            writeln!(out, "Invalid option! Try again.")?;
            continue;
        };

        let arg = match option.prompt() {
            Some(prompt) => {
                write!(out, "{}", prompt)?;
                out.flush()?;
                match tokens.next_token()? {
                    Some(token) => {
                        writeln!(out)?;
                        token
                    }
                    None => {
                        writeln!(out)?;
                        break;
                    }
                }
            }
            None => Vec::new(),
        };
        let word = String::from_utf8_lossy(&arg);
        tracing::debug!(?option, arg = %word, "menu option");

        match option {
            MenuOption::Insert => match trie.insert(&arg) {
                Ok(_) => writeln!(out, "Word '{}' inserted!", word)?,
                Err(e) => writeln!(out, "Could not insert '{}': {}", word, e)?,
            },
            MenuOption::Search => {
                if trie.search(&arg) {
                    writeln!(out, "Word '{}' FOUND.", word)?;
                } else {
                    writeln!(out, "Word '{}' NOT found.", word)?;
                }
            }
            MenuOption::Delete => {
                if trie.delete(&arg) {
                    writeln!(out, "Word '{}' marked as deleted.", word)?;
                } else {
                    writeln!(out, "Word '{}' not found or already deleted.", word)?;
                }
            }
            MenuOption::List => print_words(trie, &mut out)?,
            MenuOption::Stats => print_stats(trie, &mut out)?,
            MenuOption::Load => {
                let path = word.into_owned();
                match loader::load_path(trie, &path) {
                    Ok(n) => writeln!(out, "{} words loaded from '{}'.", n, path)?,
                    Err(e) => {
                        writeln!(out, "Error: {}", e)?;
                        writeln!(out, "{} words loaded from '{}'.", e.loaded(), path)?;
                    }
                }
            }
            MenuOption::Exit => {
                writeln!(out, "Exiting...")?;
                break;
            }
        }
    }

    trie.clear();
    writeln!(out, "Memory released. Goodbye.")?;
    out.flush()
}

//! Debug utilities for trie troubleshooting.

use std::collections::HashSet;
use std::io::{self, Write};

use super::bits::bit_at;
use super::node::NodeRef;
use super::{PatriciaTrie, SplitPlacement};

impl PatriciaTrie {
    /// Write the tree structure, one node per line, indented by depth.
    pub fn debug_print(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "=== PATRICIA Debug ===")?;
        writeln!(
            out,
            "Nodes: {}, active: {}, deleted: {}",
            self.node_count, self.active, self.deleted
        )?;
        if self.root.is_null() {
            writeln!(out, "(empty)")?;
        }

        let mut stack: Vec<(NodeRef, usize, &str)> = Vec::new();
        if !self.root.is_null() {
            stack.push((self.root, 0, ""));
        }
        while let Some((r, depth, edge)) = stack.pop() {
            let indent = "  ".repeat(depth);
            if r.is_leaf() {
                let leaf = &self.leaves[r.leaf_idx()];
                let key = String::from_utf8_lossy(self.keys.get(leaf.key));
                let mark = if leaf.deleted { " (deleted)" } else { "" };
                writeln!(out, "{}{}Leaf: {:?}{}", indent, edge, key, mark)?;
            } else {
                let branch = &self.branches[r.branch_idx()];
                writeln!(out, "{}{}Branch (bit={})", indent, edge, branch.bit)?;
                stack.push((branch.children[1], depth + 1, "[1] "));
                stack.push((branch.children[0], depth + 1, "[0] "));
            }
        }
        writeln!(out, "======================")
    }

    /// Verify tree integrity by a full walk - returns list of issues found.
    ///
    /// Recounts leaves, branches and tombstones against the maintained
    /// counters, checks that every leaf agrees with the bit decisions of all
    /// its ancestors, that no key is stored twice, and under
    /// [`SplitPlacement::CritBit`] that bit indexes increase along each path.
    pub fn verify_integrity(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut leaves = 0usize;
        let mut branches = 0usize;
        let mut active = 0usize;
        let mut deleted = 0usize;
        let mut seen: HashSet<&[u8]> = HashSet::new();

        // Each entry carries the (bit, direction) decisions taken to reach it.
        let mut stack: Vec<(NodeRef, Vec<(u32, usize)>)> = Vec::new();
        if !self.root.is_null() {
            stack.push((self.root, Vec::new()));
        }

        while let Some((r, path)) = stack.pop() {
            if r.is_null() {
                issues.push(format!("NULL child below path {:?}", path));
                continue;
            }

            if r.is_leaf() {
                let idx = r.leaf_idx();
                if idx >= self.leaves.len() {
                    issues.push(format!("leaf index {} out of bounds", idx));
                    continue;
                }
                leaves += 1;
                let leaf = &self.leaves[idx];
                if leaf.deleted {
                    deleted += 1;
                } else {
                    active += 1;
                }

                let key = self.keys.get(leaf.key);
                if !seen.insert(key) {
                    issues.push(format!("duplicate leaf for key {:?}", key));
                }
                for &(bit, dir) in &path {
                    if bit_at(key, bit as usize) != dir {
                        issues.push(format!(
                            "key {:?} reads {} at bit {} but sits under child {}",
                            key,
                            1 - dir,
                            bit,
                            dir
                        ));
                    }
                }
                continue;
            }

            let idx = r.branch_idx();
            if idx >= self.branches.len() {
                issues.push(format!("branch index {} out of bounds", idx));
                continue;
            }
            branches += 1;
            let branch = &self.branches[idx];
            if self.config.placement == SplitPlacement::CritBit {
                if let Some(&(parent_bit, _)) = path.last() {
                    if branch.bit <= parent_bit {
                        issues.push(format!(
                            "branch bit {} not after parent bit {}",
                            branch.bit, parent_bit
                        ));
                    }
                }
            }
            for dir in [1, 0] {
                let mut child_path = path.clone();
                child_path.push((branch.bit, dir));
                stack.push((branch.children[dir], child_path));
            }
        }

        if leaves + branches != self.node_count {
            issues.push(format!(
                "node_count={} but {} nodes reachable",
                self.node_count,
                leaves + branches
            ));
        }
        if active != self.active {
            issues.push(format!("active={} but {} active leaves", self.active, active));
        }
        if deleted != self.deleted {
            issues.push(format!("deleted={} but {} tombstones", self.deleted, deleted));
        }
        if leaves > 0 && branches != leaves - 1 {
            issues.push(format!("{} branches for {} leaves", branches, leaves));
        }
        issues
    }
}

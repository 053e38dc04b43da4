use super::*;

use proptest::prelude::*;
use std::collections::BTreeSet;

fn validate_trie(t: &PatriciaTrie) {
    let issues = t.verify_integrity();
    assert!(issues.is_empty(), "integrity issues: {:?}", issues);
    assert_eq!(t.node_count(), t.leaf_count() + t.branch_count());
    if t.leaf_count() > 0 {
        assert_eq!(t.branch_count(), t.leaf_count() - 1);
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(Vec<u8>),
    Delete(Vec<u8>),
    Search(Vec<u8>),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // 0x00 bytes are rejected by insert: a trailing NUL reads exactly like the
    // zero padding past the end of a key.
    prop::collection::vec(1u8..=255, 0..=24)
}

fn ascii_key_strategy() -> impl Strategy<Value = Vec<u8>> + Clone {
    // Small alphabet so keys share prefixes and collide often.
    prop::collection::vec(prop::sample::select(b"abc ".to_vec()), 0..=6)
}

fn ops_strategy(key: impl Strategy<Value = Vec<u8>> + Clone) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        50 => key.clone().prop_map(Op::Insert),
        25 => key.clone().prop_map(Op::Delete),
        25 => key.prop_map(Op::Search),
    ];
    prop::collection::vec(op, 0..=600)
}

fn placement_strategy() -> impl Strategy<Value = SplitPlacement> {
    prop_oneof![Just(SplitPlacement::Leaf), Just(SplitPlacement::CritBit)]
}

/// Apply `ops` to a trie and to a model of active keys plus every key ever
/// inserted, checking each result and the counters after each step.
fn run_ops(placement: SplitPlacement, ops: Vec<Op>) -> (PatriciaTrie, BTreeSet<Vec<u8>>) {
    let mut t = PatriciaTrie::with_config(TrieConfig {
        placement,
        ..TrieConfig::default()
    });
    let mut active: BTreeSet<Vec<u8>> = BTreeSet::new();
    let mut ever: BTreeSet<Vec<u8>> = BTreeSet::new();

    for op in ops {
        match op {
            Op::Insert(key) => {
                let expected = if active.contains(&key) {
                    InsertOutcome::AlreadyActive
                } else if ever.contains(&key) {
                    InsertOutcome::Reactivated
                } else {
                    InsertOutcome::Added
                };
                assert_eq!(t.insert(&key).unwrap(), expected);
                assert!(t.search(&key));
                active.insert(key.clone());
                ever.insert(key);
            }
            Op::Delete(key) => {
                assert_eq!(t.delete(&key), active.remove(&key));
                assert!(!t.search(&key));
            }
            Op::Search(key) => {
                assert_eq!(t.search(&key), active.contains(&key));
            }
        }

        assert_eq!(t.len(), active.len());
        assert_eq!(t.leaf_count(), ever.len());
        assert_eq!(t.deleted_count(), ever.len() - active.len());
    }
    (t, active)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(placement in placement_strategy(), ops in ops_strategy(key_strategy())) {
        let (t, active) = run_ops(placement, ops);
        validate_trie(&t);

        let got: BTreeSet<Vec<u8>> = t.iter().map(<[u8]>::to_vec).collect();
        prop_assert_eq!(got, active.clone());
        prop_assert_eq!(t.iter().count(), active.len());
        prop_assert_eq!(t.depth_stats().active_leaves, active.len());
    }

    #[test]
    fn prop_crit_bit_order_is_lexicographic(ops in ops_strategy(ascii_key_strategy())) {
        let (t, active) = run_ops(SplitPlacement::CritBit, ops);
        validate_trie(&t);

        let got: Vec<Vec<u8>> = t.iter().map(<[u8]>::to_vec).collect();
        let expected: Vec<Vec<u8>> = active.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_rebuild_from_active_keys(ops in ops_strategy(key_strategy())) {
        let (t, active) = run_ops(SplitPlacement::Leaf, ops);

        let mut rebuilt = PatriciaTrie::new();
        for key in &t {
            prop_assert_eq!(rebuilt.insert(key).unwrap(), InsertOutcome::Added);
        }
        validate_trie(&rebuilt);
        prop_assert_eq!(rebuilt.deleted_count(), 0);
        prop_assert_eq!(rebuilt.len(), active.len());
        let original: BTreeSet<&[u8]> = t.iter().collect();
        let copied: BTreeSet<&[u8]> = rebuilt.iter().collect();
        prop_assert_eq!(original, copied);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [&str; 6] = ["a", "b", "c", "aa", "ab", "ba"];

#[test]
fn exhaustive_insert_order_small_set() {
    let expected: Vec<&str> = SMALL_SET.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

    for_each_permutation(&SMALL_SET, |perm| {
        for placement in [SplitPlacement::Leaf, SplitPlacement::CritBit] {
            let mut t = PatriciaTrie::with_config(TrieConfig {
                placement,
                ..TrieConfig::default()
            });
            for k in &perm {
                assert_eq!(t.insert(k).unwrap(), InsertOutcome::Added);
            }
            validate_trie(&t);
            for k in &perm {
                assert!(t.search(k), "{k} missing after {perm:?}");
            }
            assert_eq!(t.node_count(), 2 * SMALL_SET.len() - 1);

            let got: BTreeSet<&[u8]> = t.iter().collect();
            assert_eq!(got.len(), SMALL_SET.len());
            if placement == SplitPlacement::CritBit {
                let got: Vec<&[u8]> = t.iter().collect();
                let want: Vec<&[u8]> = expected.iter().map(|k| k.as_bytes()).collect();
                assert_eq!(got, want, "order after {perm:?}");
            }
        }
    });
}

#[test]
fn exhaustive_delete_order_small_set() {
    let mut base = PatriciaTrie::new();
    for k in SMALL_SET {
        base.insert(k).unwrap();
    }
    let nodes = base.node_count();

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base.clone();
        for (i, k) in perm.iter().enumerate() {
            assert!(t.delete(k));
            assert!(!t.delete(k));
            assert_eq!(t.len(), SMALL_SET.len() - i - 1);
            assert_eq!(t.deleted_count(), i + 1);
            assert_eq!(t.node_count(), nodes);
            validate_trie(&t);
        }
        assert_eq!(t.iter().count(), 0);
        assert!(t.depth_stats().average().is_none());
    });
}

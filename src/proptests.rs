use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Checks every structural invariant of `t`, panicking on the first violation.
pub(crate) fn validate_tree(t: &WordList) {
    if t.root.is_null() {
        assert_eq!(t.distinct, 0, "empty tree must have no distinct words");
        assert_eq!(t.total, 0, "empty tree must have no occurrences");
    } else {
        assert!(t.nodes[t.root].parent.is_null(), "root must have no parent");
    }

    // (node, exclusive lower bound, exclusive upper bound)
    let mut stack: Vec<(NodeIdx, Option<&str>, Option<&str>)> = Vec::new();
    if !t.root.is_null() {
        stack.push((t.root, None, None));
    }

    let mut node_count = 0usize;
    let mut total = 0usize;
    while let Some((idx, lower, upper)) = stack.pop() {
        let node = &t.nodes[idx];
        node_count += 1;
        total += node.count;
        assert!(node.count >= 1, "live node {:?} has count 0", node.word);

        if let Some(lower) = lower {
            assert!(node.word.as_str() > lower, "{:?} not above {:?}", node.word, lower);
        }
        if let Some(upper) = upper {
            assert!(node.word.as_str() < upper, "{:?} not below {:?}", node.word, upper);
        }

        let lh = t.nodes.height(node.left);
        let rh = t.nodes.height(node.right);
        assert_eq!(node.height, 1 + lh.max(rh), "stale height at {:?}", node.word);
        assert!((lh - rh).abs() <= 1, "unbalanced at {:?}: {lh} vs {rh}", node.word);

        for child in [node.left, node.right] {
            if !child.is_null() {
                assert_eq!(
                    t.nodes[child].parent, idx,
                    "child of {:?} does not point back at it",
                    node.word
                );
            }
        }

        if !node.left.is_null() {
            stack.push((node.left, lower, Some(node.word.as_str())));
        }
        if !node.right.is_null() {
            stack.push((node.right, Some(node.word.as_str()), upper));
        }
    }

    assert_eq!(node_count, t.distinct, "reachable nodes must match different_words");
    assert_eq!(total, t.total, "sum of counts must match total_words");
    assert_eq!(t.nodes.live(), t.distinct, "arena live slots must match node count");
}

fn word_strategy() -> impl Strategy<Value = String> {
    // A small alphabet keeps collisions (duplicates and hits on removal) frequent.
    "[a-dA-D]{0,3}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Insert(#[proptest(strategy = "word_strategy()")] String),
    #[proptest(weight = 25)]
    Remove(#[proptest(strategy = "word_strategy()")] String),
    #[proptest(weight = 24)]
    Count(#[proptest(strategy = "word_strategy()")] String),
    #[proptest(weight = 1)]
    Snapshot,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(any::<Op>(), 0..=1000)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in ops_strategy()) {
        let mut t = WordList::new();
        let mut m: BTreeMap<String, usize> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(word) => {
                    let before = t.total_words();
                    let was_new = !m.contains_key(&word);
                    *m.entry(word.clone()).or_insert(0) += 1;
                    prop_assert_eq!(t.insert(&word), was_new);
                    prop_assert_eq!(t.total_words(), before + 1);
                    prop_assert_eq!(t.get_count(&word), m[&word]);
                }
                Op::Remove(word) => {
                    prop_assert_eq!(t.remove(&word), m.remove(&word).is_some());
                    prop_assert!(!t.contains(&word));
                }
                Op::Count(word) => {
                    prop_assert_eq!(t.get_count(&word), m.get(&word).copied().unwrap_or(0));
                }
                Op::Snapshot => {
                    let copy = t.clone();
                    validate_tree(&copy);
                    prop_assert_eq!(&copy, &t);
                    t = copy;
                }
            }

            validate_tree(&t);
            prop_assert_eq!(t.different_words(), m.len());
            prop_assert!(t.total_words() >= t.different_words());
        }

        let got: Vec<(String, usize)> = t.iter().map(|(w, c)| (w.to_owned(), c)).collect();
        let expected: Vec<(String, usize)> = m.iter().map(|(w, c)| (w.clone(), *c)).collect();
        prop_assert_eq!(got, expected);

        let singletons = m.values().filter(|&&c| c == 1).count();
        prop_assert_eq!(t.singletons(), singletons);
        prop_assert_eq!(
            t.total_words() == t.different_words(),
            m.values().all(|&c| c == 1)
        );

        // Highest count, smallest word among ties.
        let best = m.iter().fold(None, |best: Option<(&String, usize)>, (w, &c)| match best {
            Some((_, bc)) if bc >= c => best,
            _ => Some((w, c)),
        });
        match best {
            Some((w, c)) => {
                prop_assert_eq!(t.most_frequent(), Ok((w.as_str(), c)));
            }
            None => {
                prop_assert_eq!(t.most_frequent(), Err(WordListError::EmptyCollection));
            }
        }
    }

    #[test]
    fn prop_iter_strictly_ascending(words in prop::collection::vec(word_strategy(), 1..200)) {
        let t: WordList = words.iter().collect();
        let keys: Vec<&str> = t.iter().map(|(w, _)| w).collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(t.total_words(), words.len());
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

const SMALL_SET: [&str; 7] = ["a", "b", "c", "d", "e", "f", "g"];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = WordList::new();
        for word in &perm {
            assert!(t.insert(word));
            validate_tree(&t);
        }
        let got: Vec<&str> = t.iter().map(|(w, _)| w).collect();
        assert_eq!(got, SMALL_SET);
        // Seven nodes never need more than three levels under AVL balance.
        assert!(t.height().expect("non-empty") <= 3, "order {perm:?}");
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Insert in a fixed order, then remove in all permutations.
    let base: WordList = SMALL_SET.iter().chain(["d", "d", "a"].iter()).collect();
    validate_tree(&base);

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base.clone();
        let mut remaining = t.total_words();

        for word in perm {
            let count = t.get_count(word);
            assert!(t.remove(word));
            remaining -= count;
            assert_eq!(t.total_words(), remaining);
            assert!(!t.remove(word));
            validate_tree(&t);
        }
        assert!(t.is_empty());
        assert!(t.root.is_null());
        assert_eq!(t.nodes.live(), 0);
    });
}

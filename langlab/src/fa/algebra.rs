//! # FA algebra
//!
//! Structural operations on [`Fa`] values: reachability pruning, dead-state
//! removal, partition-refinement minimization, the ε-NFA union
//! construction, the general product construction (which backs
//! intersection/difference/symmetric-difference too), and subset-construction
//! determinization. Every function here takes `&Fa` and returns a fresh
//! `Fa`, renumbering states to a contiguous `1..=n` range as it goes.

use super::{Fa, Symbol, EPSILON};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Renumbers a set of surviving old-state-ids to `1..=n`, in ascending
/// order of the old id, and returns the old->new map together with the
/// new transition table (built by filtering+remapping `old_transitions`).
fn renumber(
    keep: &BTreeSet<usize>,
    old_transitions: &BTreeMap<(usize, usize), BTreeSet<Symbol>>,
) -> (BTreeMap<usize, usize>, BTreeMap<(usize, usize), BTreeSet<Symbol>>) {
    let map: BTreeMap<usize, usize> = keep
        .iter()
        .enumerate()
        .map(|(i, &old)| (old, i + 1))
        .collect();
    let mut transitions = BTreeMap::new();
    for (&(src, dst), syms) in old_transitions {
        if let (Some(&new_src), Some(&new_dst)) = (map.get(&src), map.get(&dst)) {
            transitions
                .entry((new_src, new_dst))
                .or_insert_with(BTreeSet::new)
                .extend(syms.iter().cloned());
        }
    }
    (map, transitions)
}

/// Depth-first from `q0` following every edge (any symbol); states and
/// transitions not reached are dropped, the accepting set is intersected
/// with what remains.
pub fn reachable(fa: &Fa) -> Fa {
    let mut seen = BTreeSet::new();
    let mut stack = vec![fa.start()];
    while let Some(q) = stack.pop() {
        if seen.insert(q) {
            for q2 in fa.all_successors(q) {
                if !seen.contains(&q2) {
                    stack.push(q2);
                }
            }
        }
    }
    let (map, transitions) = renumber(&seen, fa.transitions());
    let start = map[&fa.start()];
    let accepting = fa
        .accepting()
        .iter()
        .filter_map(|q| map.get(q).copied())
        .collect();
    Fa::new(seen.len(), start, accepting, transitions).expect("renumbering preserves invariants")
}

/// Reverse-reachability from `F`: states that cannot reach any accepting
/// state are dropped. `q0` is always retained even if dead, so the result
/// still has a well-defined start state (possibly with an empty language).
pub fn prune_dead(fa: &Fa) -> Fa {
    let mut reverse: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for &(src, dst) in fa.transitions().keys() {
        reverse.entry(dst).or_default().push(src);
    }
    let mut live: BTreeSet<usize> = BTreeSet::new();
    let mut queue: VecDeque<usize> = fa.accepting().iter().copied().collect();
    for &q in fa.accepting() {
        live.insert(q);
    }
    while let Some(q) = queue.pop_front() {
        if let Some(preds) = reverse.get(&q) {
            for &p in preds {
                if live.insert(p) {
                    queue.push_back(p);
                }
            }
        }
    }
    live.insert(fa.start());

    let (map, transitions) = renumber(&live, fa.transitions());
    let start = map[&fa.start()];
    let accepting = fa
        .accepting()
        .iter()
        .filter_map(|q| map.get(q).copied())
        .collect();
    Fa::new(live.len(), start, accepting, transitions).expect("renumbering preserves invariants")
}

/// A state's signature for one round of partition refinement: its current
/// class, followed by (for every symbol of `Σ` in sorted order) the sorted
/// list of successor classes, or `None` if there is no successor on that
/// symbol (the sentinel class).
type Signature = (usize, Vec<Option<Vec<usize>>>);

/// Partition refinement: states start split into `{States \ F, F}` and are
/// repeatedly refined by signature until stable. Assumes `fa` is already
/// reachable/dead-pruned (callers go through [`minimize`] for the full
/// pipeline).
pub fn partition_refine(fa: &Fa) -> Fa {
    if fa.state_count() == 0 {
        return fa.clone();
    }
    let alphabet: Vec<Symbol> = fa.alphabet().into_iter().collect();
    let states: Vec<usize> = fa.states().collect();

    let mut class: BTreeMap<usize, usize> = states
        .iter()
        .map(|&q| (q, if fa.is_accepting(q) { 1 } else { 0 }))
        .collect();

    loop {
        let signatures: BTreeMap<usize, Signature> = states
            .iter()
            .map(|&q| {
                let per_symbol = alphabet
                    .iter()
                    .map(|sym| {
                        let succs = fa.successors(q, sym);
                        if succs.is_empty() {
                            None
                        } else {
                            let mut classes: Vec<usize> =
                                succs.iter().map(|s| class[s]).collect();
                            classes.sort_unstable();
                            Some(classes)
                        }
                    })
                    .collect();
                (q, (class[&q], per_symbol))
            })
            .collect();

        let mut next_id: BTreeMap<Signature, usize> = BTreeMap::new();
        let mut sorted_sigs: Vec<Signature> = signatures.values().cloned().collect();
        sorted_sigs.sort();
        sorted_sigs.dedup();
        for (i, sig) in sorted_sigs.into_iter().enumerate() {
            next_id.insert(sig, i);
        }

        let new_class: BTreeMap<usize, usize> = states
            .iter()
            .map(|&q| (q, next_id[&signatures[&q]]))
            .collect();

        if new_class == class {
            break;
        }
        class = new_class;
    }

    let num_classes = class.values().copied().max().map_or(0, |m| m + 1);
    let new_start = class[&fa.start()] + 1;
    let new_accepting: BTreeSet<usize> = fa
        .accepting()
        .iter()
        .map(|q| class[q] + 1)
        .collect();
    let mut transitions: BTreeMap<(usize, usize), BTreeSet<Symbol>> = BTreeMap::new();
    for (&(src, dst), syms) in fa.transitions() {
        let key = (class[&src] + 1, class[&dst] + 1);
        transitions
            .entry(key)
            .or_insert_with(BTreeSet::new)
            .extend(syms.iter().cloned());
    }

    Fa::new(num_classes, new_start, new_accepting, transitions)
        .expect("partition refinement preserves invariants")
}

/// `reachable ∘ dead-prune ∘ partition-refinement`, in execution order:
/// prune unreachable states, then dead states, then merge
/// indistinguishable ones. Running reachability/dead pruning first keeps
/// the partition-refinement signatures meaningful (no unreachable noise)
/// and matches the natural reading of §4.B's component order.
pub fn minimize(fa: &Fa) -> Fa {
    let step1 = reachable(fa);
    let step2 = prune_dead(&step1);
    partition_refine(&step2)
}

/// ε-NFA union: a fresh start state with ε-edges to both original starts.
/// `b`'s states are offset by `a.state_count() + 1` to make the state sets
/// disjoint.
pub fn union(a: &Fa, b: &Fa) -> Fa {
    let offset = a.state_count();
    let new_start = a.state_count() + b.state_count() + 1;
    let mut transitions = a.transitions().clone();
    for (&(src, dst), syms) in b.transitions() {
        transitions.insert((src + offset, dst + offset), syms.clone());
    }
    let eps: Symbol = Symbol::from(EPSILON);
    transitions
        .entry((new_start, a.start()))
        .or_insert_with(BTreeSet::new)
        .insert(eps.clone());
    transitions
        .entry((new_start, b.start() + offset))
        .or_insert_with(BTreeSet::new)
        .insert(eps);

    let mut accepting: BTreeSet<usize> = a.accepting().clone();
    accepting.extend(b.accepting().iter().map(|q| q + offset));

    Fa::new(new_start, new_start, accepting, transitions).expect("union preserves invariants")
}

/// General product construction over all `|a| * |b|` pairs (not just the
/// reachable ones - callers can run [`reachable`] afterward if they want
/// that). Pair `(p, q)` gets id `(p - 1) * |b| + q`. `accept(p_accepts,
/// q_accepts)` decides which pairs are accepting, so this one function
/// backs union, intersection, difference and symmetric difference.
pub fn product(a: &Fa, b: &Fa, accept: impl Fn(bool, bool) -> bool) -> Fa {
    let bn = b.state_count();
    let pair_id = |p: usize, q: usize| (p - 1) * bn + q;

    let alphabet: BTreeSet<Symbol> = a
        .alphabet()
        .into_iter()
        .chain(b.alphabet())
        .filter(|s| s.as_ref() != EPSILON)
        .collect();
    let eps: Symbol = Symbol::from(EPSILON);

    let mut transitions: BTreeMap<(usize, usize), BTreeSet<Symbol>> = BTreeMap::new();
    for p in a.states() {
        for q in b.states() {
            let here = pair_id(p, q);
            for p2 in a.successors(p, EPSILON) {
                transitions
                    .entry((here, pair_id(p2, q)))
                    .or_insert_with(BTreeSet::new)
                    .insert(eps.clone());
            }
            for q2 in b.successors(q, EPSILON) {
                transitions
                    .entry((here, pair_id(p, q2)))
                    .or_insert_with(BTreeSet::new)
                    .insert(eps.clone());
            }
            for symbol in &alphabet {
                let a_succ = a.successors(p, symbol);
                let b_succ = b.successors(q, symbol);
                for &p2 in &a_succ {
                    for &q2 in &b_succ {
                        transitions
                            .entry((here, pair_id(p2, q2)))
                            .or_insert_with(BTreeSet::new)
                            .insert(symbol.clone());
                    }
                }
            }
        }
    }

    let accepting: BTreeSet<usize> = a
        .states()
        .flat_map(|p| {
            b.states().filter_map(move |q| {
                accept(a.is_accepting(p), b.is_accepting(q)).then(|| pair_id(p, q))
            })
        })
        .collect();

    let state_count = a.state_count() * bn;
    let start = pair_id(a.start(), b.start());
    Fa::new(state_count, start, accepting, transitions).expect("product preserves invariants")
}

/// Subset construction: the initial D-state is `ε-closure({q0})`; from
/// there, a worklist of D-states is expanded by `move(S, a) = ⋃ ε-closure
/// (succ(q, a))` over non-ε symbols. D-states are numbered in discovery
/// order starting at 1. A D-state is accepting iff it intersects `F`.
pub fn determinize(fa: &Fa) -> Fa {
    let alphabet: Vec<Symbol> = fa
        .alphabet()
        .into_iter()
        .filter(|s| s.as_ref() != EPSILON)
        .collect();

    let start_set = fa.epsilon_closure(fa.start());
    let mut ids: BTreeMap<BTreeSet<usize>, usize> = BTreeMap::new();
    ids.insert(start_set.clone(), 1);
    let mut queue: VecDeque<BTreeSet<usize>> = VecDeque::from([start_set]);
    let mut transitions: BTreeMap<(usize, usize), BTreeSet<Symbol>> = BTreeMap::new();

    while let Some(set) = queue.pop_front() {
        let here = ids[&set];
        for symbol in &alphabet {
            let mut moved = BTreeSet::new();
            for &q in &set {
                for q2 in fa.successors(q, symbol) {
                    moved.extend(fa.epsilon_closure(q2));
                }
            }
            if moved.is_empty() {
                continue;
            }
            let id = ids.len() + 1;
            let next_id = *ids.entry(moved.clone()).or_insert_with(|| {
                queue.push_back(moved.clone());
                id
            });
            transitions
                .entry((here, next_id))
                .or_insert_with(BTreeSet::new)
                .insert(symbol.clone());
        }
    }

    let accepting: BTreeSet<usize> = ids
        .iter()
        .filter(|(set, _)| set.iter().any(|q| fa.is_accepting(*q)))
        .map(|(_, &id)| id)
        .collect();

    Fa::new(ids.len(), 1, accepting, transitions).expect("determinize preserves invariants")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fa::{Dfa, Nfa};
    use std::rc::Rc;

    fn sym(s: &str) -> Symbol {
        Rc::from(s)
    }

    /// Scenario 2: textbook NFA for (a|b)*abb, determinized.
    fn nfa_ab_star_abb() -> Nfa {
        // states 1..=11 ~ McNaughton-Yamada-Thompson build for (a|b)*abb
        let mut t: BTreeMap<(usize, usize), BTreeSet<Symbol>> = BTreeMap::new();
        let mut edge = |src: usize, dst: usize, s: &str| {
            t.entry((src, dst)).or_default().insert(sym(s));
        };
        // 1 splits into the star loop (2) and the abb tail (8)
        edge(1, 2, EPSILON);
        edge(1, 8, EPSILON);
        // loop body: 2 -(a|b)-> 3/4 -eps-> 5, 5 -eps-> back to 2 or out to 8
        edge(2, 3, "a");
        edge(2, 4, "b");
        edge(3, 5, EPSILON);
        edge(4, 5, EPSILON);
        edge(5, 2, EPSILON);
        edge(5, 8, EPSILON);
        // abb tail: 8 -a-> 9 -b-> 10 -b-> 11 (accepting)
        edge(8, 9, "a");
        edge(9, 10, "b");
        edge(10, 11, "b");

        let fa = Fa::new(11, 1, BTreeSet::from([11]), t).unwrap();
        Nfa::from(fa)
    }

    #[test]
    fn scenario_2_subset_construction() {
        let nfa = nfa_ab_star_abb();
        assert!(nfa.accepts(&["a", "b", "b"]));
        assert!(nfa.accepts(&["a", "b", "a", "b", "b"]));
        assert!(!nfa.accepts(&["a", "b"]));
        assert!(!nfa.accepts(&["a", "b", "b", "a"]));

        let dfa = nfa.to_dfa();
        assert!(dfa.accepts(&["a", "b", "b"]));
        assert!(dfa.accepts(&["a", "b", "a", "b", "b"]));
        assert!(!dfa.accepts(&["a", "b"]));
        assert!(!dfa.accepts(&["a", "b", "b", "a"]));

        let minimized = dfa.minimize();
        assert_eq!(minimized.inner().state_count(), 4);
    }

    /// Scenario 3: two equivalent accepting sink states merge to one.
    #[test]
    fn scenario_3_minimization() {
        let mut t: BTreeMap<(usize, usize), BTreeSet<Symbol>> = BTreeMap::new();
        t.insert((1, 2), BTreeSet::from([sym("a")]));
        t.insert((1, 3), BTreeSet::from([sym("b")]));
        t.insert((2, 2), BTreeSet::from([sym("a"), sym("b")]));
        t.insert((3, 3), BTreeSet::from([sym("a"), sym("b")]));
        let fa = Fa::new(3, 1, BTreeSet::from([2, 3]), t).unwrap();
        let dfa = Dfa::try_from(fa).unwrap();
        let minimized = dfa.minimize();
        assert!(minimized.inner().state_count() < dfa.inner().state_count());
        assert_eq!(minimized.inner().state_count(), 2);

        for w in ["a", "b", "aa", "ab", "ba", "bb", "aaaa", "bbbb"] {
            let word: Vec<&str> = w.chars().map(|c| match c {
                'a' => "a",
                _ => "b",
            }).collect();
            assert_eq!(dfa.accepts(&word), minimized.accepts(&word));
        }
    }

    #[test]
    fn minimize_is_idempotent() {
        let nfa = nfa_ab_star_abb();
        let once = nfa.to_dfa().minimize();
        let twice = once.minimize();
        assert_eq!(once.inner().state_count(), twice.inner().state_count());
    }

    #[test]
    fn dead_state_may_swallow_start() {
        // state 1 (start) only reaches state 2, which is a dead end; no accepting state.
        let mut t = BTreeMap::new();
        t.insert((1, 2), BTreeSet::from([sym("a")]));
        let fa = Fa::new(2, 1, BTreeSet::new(), t).unwrap();
        let pruned = prune_dead(&fa);
        assert_eq!(pruned.state_count(), 1);
        assert!(pruned.accepting().is_empty());
    }
}
